//! # Environment Sources
//!
//! The live process environment is process-wide mutable state. Everything in
//! this crate reaches it through [`ProcessEnv`], so the base layer can be
//! injected in tests and embedding hosts can supply their own view.

use std::collections::BTreeMap;

/// Flat, ordered mapping of configuration key to string value.
pub type EnvMap = BTreeMap<String, String>;

/// Read/append access to an environment.
///
/// This is the base layer only. `${VAR}` expansion inside the override file
/// is done by `dotenvy`, which reads `std::env` directly.
pub trait ProcessEnv {
    /// Snapshot of every variable currently set.
    fn vars(&self) -> EnvMap;

    fn var(&self, key: &str) -> Option<String>;

    fn set_var(&mut self, key: &str, value: &str);
}

/// The real process environment, backed by `std::env`.
///
/// Variables whose name or value is not valid unicode are left out of
/// snapshots.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl ProcessEnv for SystemEnv {
    fn vars(&self) -> EnvMap {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set_var(&mut self, key: &str, value: &str) {
        // SAFETY: contract loading runs once at startup, before the host
        // spawns threads that read the environment.
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

/// In-memory environment, used by tests and by hosts that keep
/// configuration out of the process-wide table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: EnvMap,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<EnvMap> for MemoryEnv {
    fn from(vars: EnvMap) -> Self {
        Self { vars }
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ProcessEnv for MemoryEnv {
    fn vars(&self) -> EnvMap {
        self.vars.clone()
    }

    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set_var(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}
