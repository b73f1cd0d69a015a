//! # BizFlow Configuration
//!
//! A minimal string key/value store. Applications layer values on top of it
//! however they like; the bundled env loader maps variables with a prefix
//! onto dotted keys:
//!
//! ```rust
//! use bizflow_core::BizConfig;
//!
//! let mut config = BizConfig::new();
//! config.set("auth.provider", "demo");
//! assert_eq!(config.get("auth.provider"), Some("demo"));
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get_string("auth.provider").as_deref(), Some("demo"));
//! ```
//!
//! `BIZFLOW__AUTH__PROVIDER=local` becomes `auth.provider = "local"` once
//! [`BizConfig::load_env`] runs with prefix `BIZFLOW__`.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct BizConfig {
    values: HashMap<String, String>,
}

impl BizConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Set a key only when nothing is stored under it yet.
    pub fn set_default<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Copy every variable starting with `prefix` into the store.
    ///
    /// `PREFIX` + `AUTH__DEMO_PASSWORDS` maps to `auth.demo_passwords`.
    /// Returns how many keys were written.
    pub fn load_env(&mut self, prefix: &str) -> usize {
        self.load_vars(prefix, std::env::vars())
    }

    /// Same as [`load_env`](Self::load_env) over an explicit variable list.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut written = 0;
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                if stripped.is_empty() {
                    continue;
                }
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.values.insert(normalized, value);
                written += 1;
            }
        }
        written
    }

    pub fn snapshot(&self) -> BizConfigSnapshot {
        BizConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BizConfigSnapshot {
    map: HashMap<String, String>,
}

impl BizConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| match v.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
    }
}
