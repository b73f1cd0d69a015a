//! The permitted-roles table.
//!
//! Visibility is declared per destination, as the set of roles that may
//! open it. Navigation tabs are declared per role on top of that; a tab the
//! grants withhold is never listed. A role with no declared tabs gets every
//! permitted destination in canonical order.

use bizflow_core::Role;
use serde::Serialize;

use crate::destination::Destination;

/// Roles allowed to open one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grant {
    pub destination: Destination,
    pub roles: Vec<Role>,
}

/// Ordered navigation tabs for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabList {
    pub role: Role,
    pub destinations: Vec<Destination>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewPolicy {
    grants: Vec<Grant>,
    tabs: Vec<TabList>,
}

impl Default for ViewPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl ViewPolicy {
    /// A policy that grants nothing.
    pub fn empty() -> Self {
        Self {
            grants: Destination::ALL
                .iter()
                .map(|&destination| Grant {
                    destination,
                    roles: Vec::new(),
                })
                .collect(),
            tabs: Vec::new(),
        }
    }

    /// The BizFlow dashboard policy.
    ///
    /// Point of sale is granted to the cashier and, separately, to the
    /// platform admin, who may open it without having a tab for it. The
    /// inventory manager may open transactions but has no tab for it either.
    pub fn standard() -> Self {
        use Destination::*;
        use Role::*;

        Self::empty()
            .grant(SystemOverview, &[PlatformAdmin])
            .grant(Dashboard, &[PlatformAdmin, BusinessOwner, InventoryManager])
            .grant(PointOfSale, &[Cashier])
            .grant(PointOfSale, &[PlatformAdmin])
            .grant(CashFlow, &[PlatformAdmin, BusinessOwner])
            .grant(Inventory, &[PlatformAdmin, BusinessOwner, InventoryManager])
            .grant(Transactions, &[PlatformAdmin, BusinessOwner, Cashier, InventoryManager])
            .grant(Reports, &[PlatformAdmin, BusinessOwner])
            .tabs(
                PlatformAdmin,
                &[SystemOverview, Dashboard, CashFlow, Inventory, Transactions, Reports],
            )
            .tabs(BusinessOwner, &[Dashboard, CashFlow, Inventory, Transactions, Reports])
            .tabs(Cashier, &[PointOfSale, Transactions])
            .tabs(InventoryManager, &[Dashboard, Inventory])
    }

    /// Add `roles` to the grant for `destination`. Grants are a union;
    /// granting twice is harmless.
    pub fn grant(mut self, destination: Destination, roles: &[Role]) -> Self {
        if let Some(g) = self.grants.iter_mut().find(|g| g.destination == destination) {
            for role in roles {
                if !g.roles.contains(role) {
                    g.roles.push(*role);
                }
            }
        }
        self
    }

    /// Declare the navigation tabs for `role`, replacing any earlier list.
    pub fn tabs(mut self, role: Role, destinations: &[Destination]) -> Self {
        let mut list: Vec<Destination> = Vec::with_capacity(destinations.len());
        for d in destinations {
            if !list.contains(d) {
                list.push(*d);
            }
        }
        match self.tabs.iter_mut().find(|t| t.role == role) {
            Some(t) => t.destinations = list,
            None => self.tabs.push(TabList {
                role,
                destinations: list,
            }),
        }
        self
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    pub fn permitted_roles(&self, destination: Destination) -> &[Role] {
        self.grants
            .iter()
            .find(|g| g.destination == destination)
            .map(|g| g.roles.as_slice())
            .unwrap_or(&[])
    }

    pub fn may_render(&self, role: Role, destination: Destination) -> bool {
        self.permitted_roles(destination).contains(&role)
    }

    /// Same as [`may_render`](Self::may_render) for a role given by name.
    /// Unknown names may render nothing.
    pub fn may_render_named(&self, role: &str, destination: Destination) -> bool {
        Role::parse(role).is_some_and(|r| self.may_render(r, destination))
    }

    /// Navigation tabs for `role`, limited to what it may render.
    pub fn destinations_for(&self, role: Role) -> Vec<Destination> {
        match self.tabs.iter().find(|t| t.role == role) {
            Some(t) => t
                .destinations
                .iter()
                .copied()
                .filter(|d| self.may_render(role, *d))
                .collect(),
            None => self.permitted_destinations(role),
        }
    }

    /// Every destination `role` may render, in canonical order.
    pub fn permitted_destinations(&self, role: Role) -> Vec<Destination> {
        Destination::ALL
            .into_iter()
            .filter(|d| self.may_render(role, *d))
            .collect()
    }

    /// Visible destinations for a role given by name; empty when the name
    /// is not a known role.
    pub fn destinations_for_named(&self, role: &str) -> Vec<Destination> {
        Role::parse(role)
            .map(|r| self.destinations_for(r))
            .unwrap_or_default()
    }

    /// Where `role` lands after login.
    ///
    /// Platform admin opens the system overview, the cashier the point of
    /// sale, everyone else the dashboard. If the policy withholds that
    /// destination the first tab is used instead, then the first permitted
    /// destination.
    pub fn default_destination(&self, role: Role) -> Option<Destination> {
        let preferred = match role {
            Role::PlatformAdmin => Destination::SystemOverview,
            Role::Cashier => Destination::PointOfSale,
            Role::BusinessOwner | Role::InventoryManager => Destination::Dashboard,
        };
        if self.may_render(role, preferred) {
            return Some(preferred);
        }
        self.destinations_for(role)
            .into_iter()
            .next()
            .or_else(|| self.permitted_destinations(role).into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Destination::*;
    use Role::*;

    #[test]
    fn role_tab_lists() {
        let policy = ViewPolicy::standard();
        assert_eq!(
            policy.destinations_for(PlatformAdmin),
            vec![SystemOverview, Dashboard, CashFlow, Inventory, Transactions, Reports]
        );
        assert_eq!(
            policy.destinations_for(BusinessOwner),
            vec![Dashboard, CashFlow, Inventory, Transactions, Reports]
        );
        assert_eq!(policy.destinations_for(Cashier), vec![PointOfSale, Transactions]);
        assert_eq!(policy.destinations_for(InventoryManager), vec![Dashboard, Inventory]);
    }

    #[test]
    fn default_destinations() {
        let policy = ViewPolicy::standard();
        assert_eq!(policy.default_destination(PlatformAdmin), Some(SystemOverview));
        assert_eq!(policy.default_destination(Cashier), Some(PointOfSale));
        assert_eq!(policy.default_destination(BusinessOwner), Some(Dashboard));
        assert_eq!(policy.default_destination(InventoryManager), Some(Dashboard));
    }

    #[test]
    fn default_falls_back_when_withheld() {
        let policy = ViewPolicy::empty().grant(Transactions, &[Cashier]);
        assert_eq!(policy.default_destination(Cashier), Some(Transactions));
        assert_eq!(policy.default_destination(BusinessOwner), None);
    }

    #[test]
    fn unknown_role_names_see_nothing() {
        let policy = ViewPolicy::standard();
        assert!(policy.destinations_for_named("auditor").is_empty());
        assert!(!policy.may_render_named("", Transactions));
        assert_eq!(policy.destinations_for_named("super_admin").len(), 6);
        assert!(policy.may_render_named("cashier", PointOfSale));
    }

    #[test]
    fn tabs_are_a_subset_of_grants() {
        let policy = ViewPolicy::standard();
        assert!(policy.may_render(PlatformAdmin, PointOfSale));
        assert!(!policy.destinations_for(PlatformAdmin).contains(&PointOfSale));
        assert!(policy.may_render(InventoryManager, Transactions));

        let narrowed = ViewPolicy::empty()
            .grant(Dashboard, &[Cashier])
            .tabs(Cashier, &[Reports, Dashboard, Dashboard]);
        assert_eq!(narrowed.destinations_for(Cashier), vec![Dashboard]);
        assert_eq!(narrowed.default_destination(Cashier), Some(Dashboard));
    }

    #[test]
    fn undeclared_tabs_follow_grants() {
        let policy = ViewPolicy::empty().grant(Reports, &[Cashier]).grant(Dashboard, &[Cashier]);
        assert_eq!(policy.destinations_for(Cashier), vec![Dashboard, Reports]);
    }

    #[test]
    fn duplicate_grants_are_merged() {
        let policy = ViewPolicy::standard().grant(PointOfSale, &[Cashier, PlatformAdmin]);
        assert_eq!(policy.permitted_roles(PointOfSale), &[Cashier, PlatformAdmin]);
    }
}
