//! Role-based view resolver.

use bizflow_core::{BusinessType, Role, Session, Tenant, TenantId};
use serde::Serialize;
use tracing::debug;

use crate::destination::Destination;
use crate::policy::ViewPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavTab {
    pub destination: Destination,
    pub label: &'static str,
}

/// Whether the panel behind a destination may be mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelVisibility {
    pub destination: Destination,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantSummary {
    pub id: TenantId,
    pub name: String,
    pub business_type: BusinessType,
    pub active: bool,
}

impl From<&Tenant> for TenantSummary {
    fn from(t: &Tenant) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            business_type: t.business_type,
            active: t.active,
        }
    }
}

/// Business picker, shown to the platform admin only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantSelector {
    pub current: Option<TenantId>,
    pub options: Vec<TenantSummary>,
}

/// Everything a signed-in render needs to decide what to mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub role: Role,
    pub tabs: Vec<NavTab>,
    pub active: Option<Destination>,
    pub panels: Vec<PanelVisibility>,
    pub tenant: Option<TenantSummary>,
    pub tenant_selector: Option<TenantSelector>,
}

impl Navigation {
    pub fn destinations(&self) -> Vec<Destination> {
        self.tabs.iter().map(|t| t.destination).collect()
    }

    pub fn is_visible(&self, destination: Destination) -> bool {
        self.panels
            .iter()
            .any(|p| p.destination == destination && p.visible)
    }
}

/// Turns a session into navigation: tabs from the role's tab list, panel
/// visibility from the grants.
#[derive(Debug, Clone, Default)]
pub struct ViewResolver {
    policy: ViewPolicy,
}

impl ViewResolver {
    pub fn new(policy: ViewPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ViewPolicy {
        &self.policy
    }

    pub fn may_render(&self, role: Role, destination: Destination) -> bool {
        self.policy.may_render(role, destination)
    }

    pub fn destinations_for(&self, role: Role) -> Vec<Destination> {
        self.policy.destinations_for(role)
    }

    pub fn default_destination(&self, role: Role) -> Option<Destination> {
        self.policy.default_destination(role)
    }

    /// Navigation for `session`, or `None` when nobody is signed in.
    ///
    /// `requested` becomes the active destination when the role may render
    /// it; otherwise the role's default is used.
    pub fn resolve(&self, session: &Session<'_>, requested: Option<Destination>) -> Option<Navigation> {
        let role = session.role()?;

        let panels: Vec<PanelVisibility> = Destination::ALL
            .iter()
            .map(|&destination| PanelVisibility {
                destination,
                visible: self.policy.may_render(role, destination),
            })
            .collect();

        let tabs: Vec<NavTab> = self
            .policy
            .destinations_for(role)
            .into_iter()
            .map(|destination| NavTab {
                destination,
                label: destination.label_for(role),
            })
            .collect();

        let active = match requested {
            Some(d) if self.policy.may_render(role, d) => Some(d),
            Some(d) => {
                debug!(%role, destination = %d, "requested destination not permitted; using default");
                self.policy.default_destination(role)
            }
            None => self.policy.default_destination(role),
        };

        let tenant_selector = role.is_platform_admin().then(|| TenantSelector {
            current: session.current_tenant.map(|t| t.id.clone()),
            options: session.tenants.iter().map(TenantSummary::from).collect(),
        });

        Some(Navigation {
            role,
            tabs,
            active,
            panels,
            tenant: session.current_tenant.map(TenantSummary::from),
            tenant_selector,
        })
    }
}
