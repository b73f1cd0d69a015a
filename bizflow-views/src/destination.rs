use std::fmt;

use bizflow_core::Role;
use serde::{Deserialize, Serialize};

/// A navigation target / panel of the dashboard.
///
/// Variant order is the canonical tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    #[serde(alias = "system")]
    SystemOverview,
    Dashboard,
    #[serde(alias = "pos")]
    PointOfSale,
    #[serde(alias = "cash")]
    CashFlow,
    Inventory,
    Transactions,
    Reports,
}

impl Destination {
    pub const ALL: [Destination; 7] = [
        Destination::SystemOverview,
        Destination::Dashboard,
        Destination::PointOfSale,
        Destination::CashFlow,
        Destination::Inventory,
        Destination::Transactions,
        Destination::Reports,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Destination::SystemOverview => "system-overview",
            Destination::Dashboard => "dashboard",
            Destination::PointOfSale => "point-of-sale",
            Destination::CashFlow => "cash-flow",
            Destination::Inventory => "inventory",
            Destination::Transactions => "transactions",
            Destination::Reports => "reports",
        }
    }

    /// Parse a slug; the short tab values `system`, `pos` and `cash` are
    /// accepted too.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "system-overview" | "system" => Some(Destination::SystemOverview),
            "dashboard" => Some(Destination::Dashboard),
            "point-of-sale" | "pos" => Some(Destination::PointOfSale),
            "cash-flow" | "cash" => Some(Destination::CashFlow),
            "inventory" => Some(Destination::Inventory),
            "transactions" => Some(Destination::Transactions),
            "reports" => Some(Destination::Reports),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Destination::SystemOverview => "System",
            Destination::Dashboard => "Dashboard",
            Destination::PointOfSale => "POS",
            Destination::CashFlow => "Cash Flow",
            Destination::Inventory => "Inventory",
            Destination::Transactions => "Transactions",
            Destination::Reports => "Reports",
        }
    }

    /// Tab label as shown to `role`. Cashiers only see their own sales.
    pub fn label_for(&self, role: Role) -> &'static str {
        match (self, role) {
            (Destination::Transactions, Role::Cashier) => "My Transactions",
            _ => self.label(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
