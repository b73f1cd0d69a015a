//! Roles and users.

use std::fmt;

use uuid::Uuid;

use crate::tenant::TenantId;

/// Fixed category of user; decides which destinations are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Role {
    #[cfg_attr(feature = "serde", serde(alias = "super_admin"))]
    PlatformAdmin,
    #[cfg_attr(feature = "serde", serde(alias = "owner"))]
    BusinessOwner,
    Cashier,
    #[cfg_attr(feature = "serde", serde(alias = "inventory_manager"))]
    InventoryManager,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::PlatformAdmin,
        Role::BusinessOwner,
        Role::Cashier,
        Role::InventoryManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PlatformAdmin => "platform-admin",
            Role::BusinessOwner => "business-owner",
            Role::Cashier => "cashier",
            Role::InventoryManager => "inventory-manager",
        }
    }

    /// Parse a role name. Accepts the kebab-case names and the legacy
    /// snake_case ones (`super_admin`, `owner`, `inventory_manager`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "platform-admin" | "super_admin" => Some(Role::PlatformAdmin),
            "business-owner" | "owner" => Some(Role::BusinessOwner),
            "cashier" => Some(Role::Cashier),
            "inventory-manager" | "inventory_manager" => Some(Role::InventoryManager),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::PlatformAdmin => "Super Administrator",
            Role::BusinessOwner => "Business Owner",
            Role::Cashier => "Cashier",
            Role::InventoryManager => "Inventory Manager",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::PlatformAdmin => "Full system access",
            Role::BusinessOwner => "Business management",
            Role::Cashier => "Sales and transactions",
            Role::InventoryManager => "Stock management",
        }
    }

    /// Only the platform admin works across tenants.
    pub fn is_platform_admin(&self) -> bool {
        matches!(self, Role::PlatformAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one login; minted fresh on every successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An authenticated user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    tenant_id: Option<TenantId>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        tenant_id: Option<TenantId>,
    ) -> Self {
        Self {
            id: UserId(id.into()),
            name: name.into(),
            email: email.into(),
            role,
            tenant_id,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The tenant this user belongs to; `None` for the platform admin.
    pub fn tenant_id(&self) -> Option<&TenantId> {
        self.tenant_id.as_ref()
    }
}
