//! Key type for querying/merging configuration values.
//
// ## LICENSING
//
// Based on Cargo's [`config` module](https://github.com/rust-lang/cargo/tree/master/src/cargo/util/config)
// with substantial modifications.

use std::borrow::Cow;
use std::fmt;

/// The prefix shared by every configuration environment variable.
pub(crate) const ENV_PREFIX: &str = "DIEYIELD";

/// Key for a configuration variable.
///
/// Tracks both the dotted TOML name and the corresponding environment
/// variable, which looks like `DIEYIELD_FOO_BAR` after pushing `foo` and
/// then `bar`.
#[derive(Debug, Clone)]
pub(crate) struct ConfigKey {
    env: String,
    parts: Vec<String>,
}

impl ConfigKey {
    /// Creates a key for the root table.
    #[allow(clippy::new_without_default)]
    pub(crate) fn new() -> ConfigKey {
        ConfigKey {
            env: ENV_PREFIX.to_string(),
            parts: Vec::new(),
        }
    }

    /// Creates a [`ConfigKey`] from a period-separated TOML key.
    #[allow(clippy::should_implement_trait)]
    pub(crate) fn from_str(key: &str) -> ConfigKey {
        let mut cfg = ConfigKey::new();
        for part in key.split('.').filter(|part| !part.is_empty()) {
            cfg.push(part);
        }
        cfg
    }

    /// Pushes a new sub-key, equivalent to accessing a sub-table in TOML.
    ///
    /// The environment key gets `name` uppercased with dashes replaced by underscores.
    pub(crate) fn push(&mut self, name: &str) {
        self.env.push('_');
        self.env.push_str(&name.replace('-', "_").to_uppercase());
        self.parts.push(name.to_string());
    }

    /// Returns a copy of this key with `name` pushed onto it.
    pub(crate) fn child(&self, name: &str) -> ConfigKey {
        let mut key = self.clone();
        key.push(name);
        key
    }

    /// Returns the corresponding environment variable key.
    pub(crate) fn as_env_key(&self) -> &str {
        &self.env
    }

    /// Returns an iterator of the key parts as strings.
    pub(crate) fn parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(String::as_str)
    }

    /// Returns whether or not this is a key for the root table.
    pub(crate) fn is_root(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<_> = self.parts().map(escape_key_part).collect();
        parts.join(".").fmt(f)
    }
}

fn escape_key_part(part: &str) -> Cow<'_, str> {
    let ok = part
        .chars()
        .all(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_'));
    if ok {
        Cow::Borrowed(part)
    } else {
        Cow::Owned(toml::Value::from(part).to_string())
    }
}
