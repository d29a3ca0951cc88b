//! Raw configuration values and file discovery.
//!
//! The [`RawConfig`] object knows where to look for dieyield's configuration
//! files and the environment variables that override them.
//!
//! ## Config value API
//!
//! The primary API for fetching config values is [`RawConfig::get`]. It
//! merges file values with environment variables and uses `serde` to
//! translate the result into the caller's target type.
//!
//! ## Internal API
//!
//! Config values are stored as [`ConfigValue`]s after they have been loaded
//! from disk. This is similar to the `toml::Value` type, but records where
//! each value was defined so that merging can respect priorities.
//
// ## LICENSING
//
// Based on Cargo's [`config` module](https://github.com/rust-lang/cargo/tree/master/src/cargo/util/config)
// with substantial modifications.

use std::collections::hash_map::Entry::{Occupied, Vacant};
use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt;
use std::mem;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context as _, Result};
use lazycell::LazyCell;
use serde::de::DeserializeOwned;

use self::ConfigValue as CV;
use crate::paths;

pub(crate) use environment::Env;
pub(crate) use key::ConfigKey;

mod environment;
mod key;

/// Raw configuration information for dieyield.
#[derive(Debug)]
pub(crate) struct RawConfig {
    /// The location of the user's dieyield home directory.
    home_path: PathBuf,
    /// Merged values from every configuration file, loaded lazily.
    values: LazyCell<HashMap<String, ConfigValue>>,
    /// The directory from which configuration discovery starts.
    cwd: PathBuf,
    /// Directory where config file searching should stop (inclusive).
    search_stop_path: Option<PathBuf>,
    /// Explicitly requested files, which outrank discovered ones.
    extra_files: Vec<PathBuf>,
    /// Environment variable snapshot.
    env: Env,
}

impl RawConfig {
    /// Creates a new [`RawConfig`] instance.
    ///
    /// This does not load any config files from disk. Those will be loaded
    /// lazily as needed.
    pub(crate) fn new(cwd: PathBuf, homedir: PathBuf) -> RawConfig {
        RawConfig {
            home_path: homedir,
            cwd,
            search_stop_path: None,
            extra_files: Vec::new(),
            values: LazyCell::new(),
            env: Env::new(),
        }
    }

    /// Creates a new [`RawConfig`] instance for the current process.
    #[allow(clippy::should_implement_trait)]
    pub(crate) fn default() -> Result<RawConfig> {
        let cwd = env::current_dir()
            .with_context(|| "couldn't get the current directory of the process")?;
        let homedir = homedir(&cwd).ok_or_else(|| {
            anyhow!(
                "dieyield couldn't find your home directory. \
                 This probably means that $HOME was not set."
            )
        })?;
        Ok(RawConfig::new(cwd, homedir))
    }

    /// The current working directory.
    pub(crate) fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Sets the path where ancestor config file searching will stop. The
    /// given path is included, but its ancestors are not.
    #[allow(dead_code)]
    pub(crate) fn set_search_stop_path<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        debug_assert!(self.cwd.starts_with(&path));
        self.search_stop_path = Some(path);
        self.values = LazyCell::new();
    }

    /// Adds a file that is merged with priority over every discovered file.
    ///
    /// Files added later take priority over files added earlier.
    pub(crate) fn add_file(&mut self, path: impl Into<PathBuf>) {
        self.extra_files.push(path.into());
        self.values = LazyCell::new();
    }

    /// Helper for testing.
    #[cfg(test)]
    pub(crate) fn set_env(&mut self, env: HashMap<String, String>) {
        self.env = Env::from_map(env);
    }

    /// Gets all config values from disk, loading them if necessary.
    fn values(&self) -> Result<&HashMap<String, ConfigValue>> {
        self.values.try_borrow_with(|| self.load_values())
    }

    /// Gets a configuration value by key.
    ///
    /// This does NOT look at environment variables.
    fn get_cv(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        let vals = self.values()?;
        log::trace!("get cv {:?}", key);
        if key.is_root() {
            return Ok(Some(CV::Table(
                vals.clone(),
                Definition::Path(PathBuf::new()),
            )));
        }
        let mut parts = key.parts().enumerate();
        let mut val = match parts.next().and_then(|(_, part)| vals.get(part)) {
            Some(val) => val,
            None => return Ok(None),
        };
        for (i, part) in parts {
            match val {
                CV::Table(map, _) => {
                    val = match map.get(part) {
                        Some(val) => val,
                        None => return Ok(None),
                    }
                }
                _ => {
                    let mut key_so_far = ConfigKey::new();
                    for part in key.parts().take(i) {
                        key_so_far.push(part);
                    }
                    bail!(
                        "expected table for configuration key `{}`, but found {} in {}",
                        key_so_far,
                        val.desc(),
                        val.definition()
                    )
                }
            }
        }
        Ok(Some(val.clone()))
    }

    /// Gets a configuration value by key, with environment overrides applied.
    fn get_cv_with_env(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        match self.get_cv(key)? {
            Some(cv) => Ok(Some(self.with_env(key, cv))),
            None => {
                if let Some(env) = self.env_value(key) {
                    return Ok(Some(env));
                }
                let def = Definition::Environment(key.as_env_key().to_string());
                match self.with_env(key, CV::Table(HashMap::new(), def)) {
                    CV::Table(map, _) if map.is_empty() => Ok(None),
                    table => Ok(Some(table)),
                }
            }
        }
    }

    /// Reads the environment variable for `key`, if it is set.
    fn env_value(&self, key: &ConfigKey) -> Option<ConfigValue> {
        if key.is_root() {
            return None;
        }
        self.env.get_str(key.as_env_key()).map(|val| {
            ConfigValue::from_env(val, Definition::Environment(key.as_env_key().to_string()))
        })
    }

    /// Applies environment overrides to `cv` and everything below it.
    ///
    /// Environment variables under a table's prefix that match no existing
    /// key are added to that table as leaf values.
    fn with_env(&self, key: &ConfigKey, cv: ConfigValue) -> ConfigValue {
        match cv {
            CV::Table(map, def) => {
                let mut map: HashMap<String, ConfigValue> = map
                    .into_iter()
                    .map(|(name, value)| {
                        let value = self.with_env(&key.child(&name), value);
                        (name, value)
                    })
                    .collect();
                if key.is_root() {
                    return CV::Table(map, def);
                }
                let prefix = format!("{}_", key.as_env_key());
                let mut added = Vec::new();
                for env_key in self.env.keys_str() {
                    let Some(rest) = env_key.strip_prefix(&prefix) else {
                        continue;
                    };
                    let covered = map.iter().any(|(name, value)| {
                        let child = key.child(name);
                        env_key == child.as_env_key()
                            || matches!(value, CV::Table(..))
                                && env_key.starts_with(&format!("{}_", child.as_env_key()))
                    });
                    if !covered && !rest.is_empty() {
                        added.push(rest.to_lowercase());
                    }
                }
                for name in added {
                    let child = key.child(&name);
                    if let Some(value) = self.env_value(&child) {
                        map.insert(name, value);
                    }
                }
                CV::Table(map, def)
            }
            leaf => match self.env_value(key) {
                Some(env) if env.definition().is_higher_priority(leaf.definition()) => env,
                _ => leaf,
            },
        }
    }

    /// Gets a config value, deserialized into `T`.
    ///
    /// `key` is a dotted TOML key such as `yield.defect_rate`. Environment
    /// variables take priority over values defined in files. Returns `None`
    /// if the key is defined nowhere.
    pub(crate) fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let key = ConfigKey::from_str(key);
        let Some(cv) = self.get_cv_with_env(&key)? else {
            return Ok(None);
        };
        let def = cv.definition().clone();
        let val = cv
            .into_toml()
            .try_into()
            .map_err(anyhow::Error::from)
            .with_context(|| format!("invalid configuration for key `{}` in {}", key, def))?;
        Ok(Some(val))
    }

    pub(crate) fn load_values(&self) -> Result<HashMap<String, ConfigValue>> {
        self.load_values_from(&self.cwd)
    }

    fn load_values_from(&self, path: &Path) -> Result<HashMap<String, ConfigValue>> {
        let mut cfg = CV::Table(HashMap::new(), Definition::Path(PathBuf::from(".")));
        let home = self.home_path.clone();

        self.walk_tree(path, &home, |path| {
            let value = self.load_file(path, false)?;
            cfg.merge(value, false).with_context(|| {
                format!("failed to merge configuration at `{}`", path.display())
            })?;
            Ok(())
        })
        .with_context(|| "could not load dieyield configuration")?;

        // Equal-rank leaves keep the value merged first, so the newest file goes first.
        for path in self.extra_files.iter().rev() {
            let value = self.load_file(path, true)?;
            cfg.merge(value, false).with_context(|| {
                format!("failed to merge configuration at `{}`", path.display())
            })?;
        }

        match cfg {
            CV::Table(map, _) => Ok(map),
            _ => unreachable!(),
        }
    }

    fn load_file(&self, path: &Path, explicit: bool) -> Result<ConfigValue> {
        self._load_file(path, &mut HashSet::new(), explicit)
    }

    fn _load_file(
        &self,
        path: &Path,
        seen: &mut HashSet<PathBuf>,
        explicit: bool,
    ) -> Result<ConfigValue> {
        if !seen.insert(path.to_path_buf()) {
            bail!(
                "config `include` cycle detected with path `{}`",
                path.display()
            );
        }
        log::debug!("loading configuration file `{}`", path.display());
        let contents = paths::read(path)?;
        let toml: toml::Table = contents
            .parse()
            .map_err(|e| anyhow::Error::from(e).context("could not parse input as TOML"))
            .with_context(|| {
                format!("could not parse TOML configuration in `{}`", path.display())
            })?;
        let def = if explicit {
            Definition::Cli(path.into())
        } else {
            Definition::Path(path.into())
        };
        let value = CV::from_toml(def, toml::Value::Table(toml)).with_context(|| {
            format!(
                "failed to load TOML configuration from `{}`",
                path.display()
            )
        })?;
        self.load_includes(value, seen, explicit)
    }

    /// Loads the files named by the `include` key of `value` and merges
    /// `value` over them.
    fn load_includes(
        &self,
        mut value: ConfigValue,
        seen: &mut HashSet<PathBuf>,
        explicit: bool,
    ) -> Result<ConfigValue> {
        let includes = self.include_paths(&mut value)?;
        let mut root = CV::Table(HashMap::new(), value.definition().clone());
        for (path, abs_path, def) in includes {
            self._load_file(&abs_path, seen, explicit)
                .and_then(|include| root.merge(include, true))
                .with_context(|| {
                    format!("failed to load config include `{}` from {}", path, def)
                })?;
        }
        root.merge(value, true)?;
        Ok(root)
    }

    fn include_paths(&self, cv: &mut ConfigValue) -> Result<Vec<(String, PathBuf, Definition)>> {
        let abs = |path: &str, def: &Definition| -> (String, PathBuf, Definition) {
            (path.to_string(), def.root(self.cwd()).join(path), def.clone())
        };
        let CV::Table(table, _) = cv else {
            bail!("expected a table at the root of a configuration file");
        };
        let includes = match table.remove("include") {
            Some(CV::String(s, def)) => vec![abs(&s, &def)],
            Some(CV::List(list, _)) => list.iter().map(|(s, def)| abs(s, def)).collect(),
            Some(other) => bail!(
                "`include` expected a string or list, but found {} in {}",
                other.desc(),
                other.definition()
            ),
            None => Vec::new(),
        };
        Ok(includes)
    }

    /// Calls `walk` on every `.dieyield/config.toml` from `pwd` upwards, then
    /// on the home `config.toml`.
    fn walk_tree<F>(&self, pwd: &Path, home: &Path, mut walk: F) -> Result<()>
    where
        F: FnMut(&Path) -> Result<()>,
    {
        let mut stash: HashSet<PathBuf> = HashSet::new();

        for current in paths::ancestors(pwd, self.search_stop_path.as_deref()) {
            let path = current.join(".dieyield").join("config.toml");
            if path.exists() {
                walk(&path)?;
                stash.insert(path);
            }
        }

        let path = home.join("config.toml");
        if path.exists() && !stash.contains(&path) {
            walk(&path)?;
        }

        Ok(())
    }
}

/// Where a configuration value was defined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Definition {
    /// A discovered configuration file.
    Path(PathBuf),
    /// A file passed explicitly by the caller.
    Cli(PathBuf),
    /// An environment variable.
    Environment(String),
}

impl Definition {
    fn rank(&self) -> u8 {
        match self {
            Definition::Path(_) => 0,
            Definition::Cli(_) => 1,
            Definition::Environment(_) => 2,
        }
    }

    /// Returns `true` if values from `self` override values from `other`.
    pub(crate) fn is_higher_priority(&self, other: &Definition) -> bool {
        self.rank() > other.rank()
    }

    /// The directory that relative paths in this definition are resolved against.
    pub(crate) fn root(&self, cwd: &Path) -> PathBuf {
        match self {
            Definition::Path(p) | Definition::Cli(p) => p
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf()),
            Definition::Environment(_) => cwd.to_path_buf(),
        }
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Path(p) | Definition::Cli(p) => write!(f, "`{}`", p.display()),
            Definition::Environment(key) => write!(f, "environment variable `{}`", key),
        }
    }
}

#[derive(PartialEq, Clone)]
pub(crate) enum ConfigValue {
    Integer(i64, Definition),
    Float(f64, Definition),
    String(String, Definition),
    List(Vec<(String, Definition)>, Definition),
    Table(HashMap<String, ConfigValue>, Definition),
    Boolean(bool, Definition),
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CV::Integer(i, def) => write!(f, "{} (from {})", i, def),
            CV::Float(x, def) => write!(f, "{} (from {})", x, def),
            CV::Boolean(b, def) => write!(f, "{} (from {})", b, def),
            CV::String(s, def) => write!(f, "{} (from {})", s, def),
            CV::List(list, def) => {
                write!(f, "[")?;
                for (i, (s, def)) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} (from {})", s, def)?;
                }
                write!(f, "] (from {})", def)
            }
            CV::Table(table, _) => write!(f, "{:?}", table),
        }
    }
}

impl ConfigValue {
    fn from_toml(def: Definition, toml: toml::Value) -> Result<ConfigValue> {
        match toml {
            toml::Value::String(val) => Ok(CV::String(val, def)),
            toml::Value::Boolean(b) => Ok(CV::Boolean(b, def)),
            toml::Value::Integer(i) => Ok(CV::Integer(i, def)),
            toml::Value::Float(x) => Ok(CV::Float(x, def)),
            toml::Value::Array(val) => Ok(CV::List(
                val.into_iter()
                    .map(|toml| match toml {
                        toml::Value::String(val) => Ok((val, def.clone())),
                        v => bail!("expected string but found {} in list", v.type_str()),
                    })
                    .collect::<Result<_>>()?,
                def,
            )),
            toml::Value::Table(val) => Ok(CV::Table(
                val.into_iter()
                    .map(|(key, value)| {
                        let value = CV::from_toml(def.clone(), value)
                            .with_context(|| format!("failed to parse key `{}`", key))?;
                        Ok((key, value))
                    })
                    .collect::<Result<_>>()?,
                def,
            )),
            v => bail!(
                "found TOML configuration value of unknown type `{}`",
                v.type_str()
            ),
        }
    }

    /// Interprets an environment variable as a boolean, integer, or float,
    /// falling back to a string.
    fn from_env(val: &str, def: Definition) -> ConfigValue {
        if val == "true" {
            CV::Boolean(true, def)
        } else if val == "false" {
            CV::Boolean(false, def)
        } else if let Ok(i) = val.parse::<i64>() {
            CV::Integer(i, def)
        } else if let Ok(x) = val.parse::<f64>() {
            CV::Float(x, def)
        } else {
            CV::String(val.to_string(), def)
        }
    }

    fn into_toml(self) -> toml::Value {
        match self {
            CV::Boolean(s, _) => toml::Value::Boolean(s),
            CV::String(s, _) => toml::Value::String(s),
            CV::Integer(i, _) => toml::Value::Integer(i),
            CV::Float(x, _) => toml::Value::Float(x),
            CV::List(l, _) => {
                toml::Value::Array(l.into_iter().map(|(s, _)| toml::Value::String(s)).collect())
            }
            CV::Table(l, _) => {
                toml::Value::Table(l.into_iter().map(|(k, v)| (k, v.into_toml())).collect())
            }
        }
    }

    /// Merges `from` into `self`.
    ///
    /// Tables are merged key by key and lists are concatenated. Otherwise
    /// `from` replaces `self` if `force` is set or `from` has a higher
    /// priority definition.
    fn merge(&mut self, from: ConfigValue, force: bool) -> Result<()> {
        match (self, from) {
            (&mut CV::List(ref mut old, _), CV::List(ref mut new, _)) => {
                old.extend(mem::take(new));
            }
            (&mut CV::Table(ref mut old, _), CV::Table(new, _)) => {
                for (key, value) in new {
                    match old.entry(key.clone()) {
                        Occupied(mut entry) => {
                            let new_def = value.definition().clone();
                            let entry = entry.get_mut();
                            entry.merge(value, force).with_context(|| {
                                format!(
                                    "failed to merge key `{}` between {} and {}",
                                    key,
                                    entry.definition(),
                                    new_def,
                                )
                            })?;
                        }
                        Vacant(entry) => {
                            entry.insert(value);
                        }
                    };
                }
            }
            (expected @ &mut CV::List(_, _), found)
            | (expected @ &mut CV::Table(_, _), found)
            | (expected, found @ CV::List(_, _))
            | (expected, found @ CV::Table(_, _)) => {
                return Err(anyhow!(
                    "failed to merge config value from {} into {}: expected {}, but found {}",
                    found.definition(),
                    expected.definition(),
                    expected.desc(),
                    found.desc()
                ));
            }
            (old, mut new) => {
                if force || new.definition().is_higher_priority(old.definition()) {
                    mem::swap(old, &mut new);
                }
            }
        }

        Ok(())
    }

    pub(crate) fn desc(&self) -> &'static str {
        match *self {
            CV::Table(..) => "table",
            CV::List(..) => "array",
            CV::String(..) => "string",
            CV::Boolean(..) => "boolean",
            CV::Integer(..) => "integer",
            CV::Float(..) => "float",
        }
    }

    pub(crate) fn definition(&self) -> &Definition {
        match self {
            CV::Boolean(_, def)
            | CV::Integer(_, def)
            | CV::Float(_, def)
            | CV::String(_, def)
            | CV::List(_, def)
            | CV::Table(_, def) => def,
        }
    }
}

pub(crate) fn homedir(cwd: &Path) -> Option<PathBuf> {
    crate::home::dieyield_home_with_cwd(cwd).ok()
}
