//! Authentication options and configuration.

use bizflow_core::BizConfigSnapshot;
use serde::{Deserialize, Serialize};

/// Which identity provider backs `login`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// The four fixed demo accounts; passwords are not checked.
    Demo,
    /// Registered accounts with bcrypt-hashed passwords.
    Local,
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Demo
    }
}

impl ProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "demo" => Some(Self::Demo),
            "local" => Some(Self::Local),
            _ => None,
        }
    }
}

/// Message of the `InvalidCredentials` rejection unless configured.
pub const DEFAULT_LOGIN_ERROR: &str = "Invalid login";

/// Options for the bcrypt-backed local provider
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalOptions {
    /// bcrypt cost factor
    pub hash_cost: u32,
    /// Message carried by the `InvalidCredentials` rejection
    pub error_message: String,
    /// When set, the four demo accounts are registered with this password.
    #[serde(default, skip_serializing)]
    pub demo_password: Option<String>,
}

impl Default for LocalOptions {
    fn default() -> Self {
        Self {
            hash_cost: 10,
            error_message: DEFAULT_LOGIN_ERROR.to_string(),
            demo_password: None,
        }
    }
}

impl std::fmt::Debug for LocalOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalOptions")
            .field("hash_cost", &self.hash_cost)
            .field("error_message", &self.error_message)
            .field("demo_password", &self.demo_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl LocalOptions {
    pub fn validate(&self) -> Result<(), String> {
        if !(4..=31).contains(&self.hash_cost) {
            return Err(format!("bcrypt cost must be between 4 and 31, got {}", self.hash_cost));
        }
        if self.error_message.trim().is_empty() {
            return Err("Local error message cannot be empty".to_string());
        }
        if self.demo_password.as_deref().is_some_and(str::is_empty) {
            return Err("Local demo password cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Main authentication configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthOptions {
    /// Identity provider used by `login`
    pub provider: ProviderKind,
    /// Local provider settings
    pub local: LocalOptions,
    /// Start with the three demo tenants
    pub seed_tenants: bool,
    /// List the demo accounts on the login screen
    pub quick_login: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            local: LocalOptions::default(),
            seed_tenants: true,
            quick_login: true,
        }
    }
}

impl AuthOptions {
    /// Validate the entire authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.provider == ProviderKind::Local {
            self.local
                .validate()
                .map_err(|e| format!("Local provider validation failed: {}", e))?;
        }
        Ok(())
    }

    /// Read options from `auth.*` keys, falling back to defaults.
    ///
    /// Recognized keys: `auth.provider`, `auth.local.hash_cost`,
    /// `auth.local.error_message`, `auth.local.demo_password`,
    /// `auth.seed_tenants`, `auth.quick_login`.
    pub fn from_config(config: &BizConfigSnapshot) -> Result<Self, String> {
        let mut builder = AuthOptions::builder();

        if let Some(raw) = config.get("auth.provider") {
            let kind = ProviderKind::parse(raw)
                .ok_or_else(|| format!("Unknown auth provider '{}'", raw.trim()))?;
            builder = builder.provider(kind);
        }

        let mut local = LocalOptions::default();
        if let Some(raw) = config.get("auth.local.hash_cost") {
            local.hash_cost = raw
                .trim()
                .parse()
                .map_err(|_| format!("auth.local.hash_cost must be a number, got '{}'", raw.trim()))?;
        }
        if let Some(msg) = config.get_string("auth.local.error_message") {
            local.error_message = msg;
        }
        if let Some(password) = config.get_string("auth.local.demo_password") {
            local.demo_password = Some(password);
        }
        builder = builder.local(local);

        if let Some(seed) = config.get_bool("auth.seed_tenants") {
            builder = builder.seed_tenants(seed);
        }
        if let Some(quick) = config.get_bool("auth.quick_login") {
            builder = builder.quick_login(quick);
        }

        builder.build_validated()
    }

    /// Create a new AuthOptions builder
    pub fn builder() -> AuthOptionsBuilder {
        AuthOptionsBuilder::new()
    }
}

/// Builder pattern for AuthOptions configuration
#[derive(Clone, Debug, Default)]
pub struct AuthOptionsBuilder {
    provider: Option<ProviderKind>,
    local: Option<LocalOptions>,
    seed_tenants: Option<bool>,
    quick_login: Option<bool>,
}

impl AuthOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn local(mut self, local: LocalOptions) -> Self {
        self.local = Some(local);
        self
    }

    pub fn seed_tenants(mut self, seed: bool) -> Self {
        self.seed_tenants = Some(seed);
        self
    }

    pub fn quick_login(mut self, quick: bool) -> Self {
        self.quick_login = Some(quick);
        self
    }

    pub fn build(self) -> AuthOptions {
        let defaults = AuthOptions::default();
        AuthOptions {
            provider: self.provider.unwrap_or(defaults.provider),
            local: self.local.unwrap_or(defaults.local),
            seed_tenants: self.seed_tenants.unwrap_or(defaults.seed_tenants),
            quick_login: self.quick_login.unwrap_or(defaults.quick_login),
        }
    }

    /// Build and validate the AuthOptions configuration
    pub fn build_validated(self) -> Result<AuthOptions, String> {
        let options = self.build();
        options.validate()?;
        Ok(options)
    }
}
