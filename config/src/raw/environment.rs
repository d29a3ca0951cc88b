//! A snapshot of the process environment.

use std::collections::HashMap;

/// Environment variables captured when a [`RawConfig`](super::RawConfig) is created.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
#[derive(Debug, Clone, Default)]
pub(crate) struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    /// Captures the current process environment.
    pub(crate) fn new() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Creates an environment from an explicit map.
    #[cfg(test)]
    pub(crate) fn from_map(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Gets an environment variable.
    pub(crate) fn get_str(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Returns all environment variable names.
    pub(crate) fn keys_str(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }
}
