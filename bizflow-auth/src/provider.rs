//! Identity providers: where `login` turns an email into a user.

use std::collections::HashMap;

use anyhow::Result;
use bcrypt::{hash, verify};
use bizflow_core::errors::BizError;
use bizflow_core::{Role, TenantId, User};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::options::LocalOptions;

/// What the login form submits.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One entry of the quick-login panel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickLogin {
    pub role: Role,
    pub label: String,
    pub description: String,
    pub email: String,
}

impl QuickLogin {
    pub fn for_role(role: Role, email: impl Into<String>) -> Self {
        Self {
            role,
            label: role.label().to_string(),
            description: role.description().to_string(),
            email: email.into(),
        }
    }
}

/// Resolves credentials to a user.
///
/// `Ok(None)` means the credentials were not accepted; `Err` is reserved for
/// the provider itself failing. A remote identity service plugs in here.
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &str;

    fn resolve(&self, credentials: &Credentials) -> Result<Option<User>>;

    /// Accounts offered for one-click sign in, if any.
    fn quick_logins(&self) -> Vec<QuickLogin> {
        Vec::new()
    }
}

/// The four fixed demo accounts. Passwords are accepted unconditionally;
/// this is a demo seam, not a security boundary.
#[derive(Clone, Debug)]
pub struct DemoDirectory {
    accounts: Vec<User>,
}

impl Default for DemoDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoDirectory {
    pub fn new() -> Self {
        let hotel = Some(TenantId::from("1"));
        Self {
            accounts: vec![
                User::new("1", "Super Admin", "admin@saas.com", Role::PlatformAdmin, None),
                User::new("2", "Hotel Owner", "owner@hotel.com", Role::BusinessOwner, hotel.clone()),
                User::new("3", "Hotel Cashier", "cashier@hotel.com", Role::Cashier, hotel.clone()),
                User::new("4", "Inventory Manager", "inventory@hotel.com", Role::InventoryManager, hotel),
            ],
        }
    }

    pub fn accounts(&self) -> &[User] {
        &self.accounts
    }

    pub fn email_for(&self, role: Role) -> Option<&str> {
        self.accounts
            .iter()
            .find(|u| u.role() == role)
            .map(User::email)
    }
}

impl IdentityProvider for DemoDirectory {
    fn name(&self) -> &str {
        "demo"
    }

    fn resolve(&self, credentials: &Credentials) -> Result<Option<User>> {
        Ok(self
            .accounts
            .iter()
            .find(|u| u.email() == credentials.email)
            .cloned())
    }

    fn quick_logins(&self) -> Vec<QuickLogin> {
        self.accounts
            .iter()
            .map(|u| QuickLogin::for_role(u.role(), u.email()))
            .collect()
    }
}

struct LocalAccount {
    user: User,
    password_hash: String,
}

/// Accounts with bcrypt-hashed passwords, verified on every login.
pub struct LocalDirectory {
    options: LocalOptions,
    accounts: HashMap<String, LocalAccount>,
}

impl LocalDirectory {
    pub fn new(options: LocalOptions) -> Self {
        Self {
            options,
            accounts: HashMap::new(),
        }
    }

    /// Directory built from `options`, with the demo accounts registered
    /// when `demo_password` is set.
    pub fn from_options(options: LocalOptions) -> Result<Self> {
        let password = options.demo_password.clone();
        let mut local = Self::new(options);
        if let Some(password) = password {
            for user in DemoDirectory::new().accounts() {
                local.register(user.clone(), &password)?;
            }
            debug!(accounts = local.len(), "local provider: demo accounts registered");
        }
        Ok(local)
    }

    pub fn options(&self) -> &LocalOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        hash(password, self.options.hash_cost).map_err(|e| anyhow::anyhow!(e.to_string()))
    }

    /// Register `user` with a plaintext password that is hashed here.
    pub fn register(&mut self, user: User, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(BizError::bad_request("Password must not be empty").into_anyhow());
        }
        let password_hash = self.hash_password(password)?;
        self.register_hashed(user, password_hash)
    }

    /// Register `user` with an existing bcrypt hash.
    pub fn register_hashed(&mut self, user: User, password_hash: impl Into<String>) -> Result<()> {
        let email = user.email().to_string();
        if self.accounts.contains_key(&email) {
            return Err(BizError::conflict(format!("Account '{email}' already exists")).into_anyhow());
        }
        self.accounts.insert(
            email,
            LocalAccount {
                user,
                password_hash: password_hash.into(),
            },
        );
        Ok(())
    }
}

impl IdentityProvider for LocalDirectory {
    fn name(&self) -> &str {
        "local"
    }

    fn resolve(&self, credentials: &Credentials) -> Result<Option<User>> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Ok(None);
        }

        let Some(account) = self.accounts.get(&credentials.email) else {
            debug!(email = %credentials.email, "local provider: unknown account");
            return Ok(None);
        };

        let ok = verify(&credentials.password, &account.password_hash)
            .map_err(|e| BizError::general_error(e.to_string()).into_anyhow())?;
        if !ok {
            debug!(email = %credentials.email, "local provider: password mismatch");
            return Ok(None);
        }

        Ok(Some(account.user.clone()))
    }

    fn quick_logins(&self) -> Vec<QuickLogin> {
        let mut users: Vec<&User> = self.accounts.values().map(|a| &a.user).collect();
        users.sort_by(|a, b| a.role().cmp(&b.role()).then_with(|| a.email().cmp(b.email())));
        users
            .into_iter()
            .map(|u| QuickLogin::for_role(u.role(), u.email()))
            .collect()
    }
}
