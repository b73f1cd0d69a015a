use anyhow::{anyhow, Result};
use bizflow_auth::AuthOptions;
use bizflow_core::{BizConfig, BizConfigSnapshot};

/// Env prefix: `BIZFLOW__AUTH__PROVIDER=local` sets `auth.provider`.
pub const ENV_PREFIX: &str = "BIZFLOW__";

/// Typed settings resolved from the key/value store.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub auth: AuthOptions,
    pub log_filter: String,
    pub raw: BizConfigSnapshot,
}

/// Defaults, then environment overrides.
pub fn load() -> Result<AppConfig> {
    let mut config = BizConfig::new();
    config.load_env(ENV_PREFIX);
    resolve(config)
}

/// Apply defaults to `config` and parse the typed settings.
pub fn resolve(mut config: BizConfig) -> Result<AppConfig> {
    configure_defaults(&mut config);

    let raw = config.snapshot();
    let auth = AuthOptions::from_config(&raw).map_err(|e| anyhow!("Invalid auth configuration: {e}"))?;
    let log_filter = raw
        .get_string("log.filter")
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| "info".to_string());

    Ok(AppConfig {
        auth,
        log_filter,
        raw,
    })
}

fn configure_defaults(config: &mut BizConfig) {
    config.set_default("auth.provider", "demo");
    config.set_default("auth.seed_tenants", "true");
    config.set_default("auth.quick_login", "true");
    config.set_default("log.filter", "info");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizflow_auth::ProviderKind;

    #[test]
    fn defaults_resolve_to_demo() {
        let cfg = resolve(BizConfig::new()).unwrap();
        assert_eq!(cfg.auth.provider, ProviderKind::Demo);
        assert_eq!(cfg.log_filter, "info");
        assert_eq!(cfg.raw.get("auth.seed_tenants"), Some("true"));
    }

    #[test]
    fn overrides_from_vars() {
        let mut config = BizConfig::new();
        config.load_vars(
            ENV_PREFIX,
            vec![
                ("BIZFLOW__AUTH__PROVIDER".to_string(), "local".to_string()),
                ("BIZFLOW__LOG__FILTER".to_string(), "bizflow_auth=debug".to_string()),
            ],
        );
        let cfg = resolve(config).unwrap();
        assert_eq!(cfg.auth.provider, ProviderKind::Local);
        assert_eq!(cfg.log_filter, "bizflow_auth=debug");
    }

    #[test]
    fn bad_provider_is_an_error() {
        let mut config = BizConfig::new();
        config.set("auth.provider", "kerberos");
        let err = resolve(config).unwrap_err();
        assert!(err.to_string().contains("Unknown auth provider 'kerberos'"));
    }
}
