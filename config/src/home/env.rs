//! Lower-level utilities for mocking the process environment.
//
// ## LICENSING
//
// Based on Cargo's [`home` crate](https://github.com/rust-lang/cargo/tree/master/crates/home)
// with substantial modifications.

use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use super::DIEYIELD_HOME;

/// Permits parameterizing the home functions via the `_with_env` variants.
pub(crate) trait Env {
    /// Return the path to the user's home dir, or `None` if it cannot be determined.
    fn home_dir(&self) -> Option<PathBuf>;
    /// Return the current working directory.
    fn current_dir(&self) -> io::Result<PathBuf>;
    /// Get an environment variable, as per [`std::env::var_os`].
    fn var_os(&self, key: &str) -> Option<OsString>;
}

/// Implements [`Env`] for the OS context.
pub(crate) struct OsEnv;

impl Env for OsEnv {
    fn home_dir(&self) -> Option<PathBuf> {
        super::home_dir_inner()
    }
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

/// The current OS context.
pub(crate) const OS_ENV: OsEnv = OsEnv;

/// Returns the path of the current user's home directory from [`Env::home_dir`].
pub(crate) fn home_dir_with_env(env: &dyn Env) -> Option<PathBuf> {
    env.home_dir()
}

/// Variant of [`dieyield_home`](super::dieyield_home) where the environment source is parameterized.
pub(crate) fn dieyield_home_with_env(env: &dyn Env) -> io::Result<PathBuf> {
    let cwd = env.current_dir()?;
    dieyield_home_with_cwd_env(env, &cwd)
}

/// Variant of [`dieyield_home_with_cwd`](super::dieyield_home_with_cwd) where
/// the environment source is parameterized.
pub(crate) fn dieyield_home_with_cwd_env(env: &dyn Env, cwd: &Path) -> io::Result<PathBuf> {
    match env.var_os(DIEYIELD_HOME).filter(|h| !h.is_empty()) {
        Some(home) => {
            let home = PathBuf::from(home);
            if home.is_absolute() {
                Ok(home)
            } else {
                Ok(cwd.join(&home))
            }
        }
        _ => home_dir_with_env(env)
            .map(|p| p.join(".dieyield"))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "could not find dieyield home dir")),
    }
}
