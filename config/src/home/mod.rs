//! Canonical definitions of [`home_dir`] and [`dieyield_home`].
//!
//! [`dieyield_home`] is the canonical way to determine where dieyield looks
//! for its user-level `config.toml`. The [`mod@env`] module contains
//! utilities for mocking the process environment.
//
// ## LICENSING
//
// Based on Cargo's [`home` crate](https://github.com/rust-lang/cargo/tree/master/crates/home)
// with substantial modifications.

pub(crate) mod env;

use std::io;
use std::path::{Path, PathBuf};

/// The environment variable that overrides the dieyield home directory.
pub const DIEYIELD_HOME: &str = "DIEYIELD_HOME";

/// Returns the path of the current user's home directory, if known.
pub fn home_dir() -> Option<PathBuf> {
    env::home_dir_with_env(&env::OS_ENV)
}

fn home_dir_inner() -> Option<PathBuf> {
    #[allow(deprecated)]
    std::env::home_dir()
}

/// Returns the storage directory used by dieyield, often known as
/// `.dieyield` or `DIEYIELD_HOME`.
///
/// It returns one of the following values, in this order of
/// preference:
///
/// - The value of the `DIEYIELD_HOME` environment variable, if it is
///   an absolute path.
/// - The value of the current working directory joined with the value
///   of the `DIEYIELD_HOME` environment variable, if `DIEYIELD_HOME` is a
///   relative directory.
/// - The `.dieyield` directory in the user's home directory, as reported
///   by the [`home_dir`] function.
///
/// # Errors
///
/// This function fails if it fails to retrieve the current directory,
/// or if the home directory cannot be determined.
pub fn dieyield_home() -> io::Result<PathBuf> {
    env::dieyield_home_with_env(&env::OS_ENV)
}

/// Returns the storage directory used by dieyield within `cwd`.
/// For more details, see [`dieyield_home`].
pub fn dieyield_home_with_cwd(cwd: &Path) -> io::Result<PathBuf> {
    env::dieyield_home_with_cwd_env(&env::OS_ENV, cwd)
}
