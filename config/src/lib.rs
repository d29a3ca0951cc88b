//! Utilities for discovering, merging, and reading dieyield configuration files.
//!
//! Configuration is read from every `.dieyield/config.toml` between the
//! current directory and the filesystem root, then from `config.toml` in the
//! dieyield home directory (see [`home::dieyield_home`]). Files nearer the
//! current directory take priority. Any key can be overridden with an
//! environment variable: `yield.defect_rate` is read from
//! `DIEYIELD_YIELD_DEFECT_RATE`.
#![warn(missing_docs)]

use std::path::PathBuf;

use anyhow::Result;
use dieyield::SimulationParams;

use crate::raw::RawConfig;

pub mod home;
pub(crate) mod paths;
pub(crate) mod raw;

/// Resolved dieyield configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Config {
    /// Parameters for a simulation run, built from the `[substrate]`,
    /// `[reticle]`, `[yield]`, and `[run]` tables.
    pub simulation: SimulationParams,
}

impl Config {
    /// Loads the configuration visible from `cwd`, with `home` as the dieyield home directory.
    pub fn new(cwd: PathBuf, home: PathBuf) -> Result<Self> {
        Self::with_files(cwd, home, [])
    }

    /// Like [`Config::new`], but also merges `files`, which take priority over discovered files.
    pub fn with_files(
        cwd: PathBuf,
        home: PathBuf,
        files: impl IntoIterator<Item = PathBuf>,
    ) -> Result<Self> {
        let mut raw = RawConfig::new(cwd, home);
        for file in files {
            raw.add_file(file);
        }
        Self::from_raw(&raw)
    }

    /// Loads the configuration for the current process.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_files([])
    }

    /// Like [`Config::from_env`], but also merges `files`, which take priority over discovered files.
    pub fn from_env_with_files(files: impl IntoIterator<Item = PathBuf>) -> Result<Self> {
        let mut raw = RawConfig::default()?;
        for file in files {
            raw.add_file(file);
        }
        Self::from_raw(&raw)
    }

    pub(crate) fn from_raw(raw: &RawConfig) -> Result<Self> {
        let simulation = SimulationParams {
            substrate: raw.get("substrate")?.unwrap_or_default(),
            reticle: raw.get("reticle")?.unwrap_or_default(),
            yield_params: raw.get("yield")?.unwrap_or_default(),
            run: raw.get("run")?.unwrap_or_default(),
        };
        log::debug!("resolved simulation parameters: {:?}", simulation);
        Ok(Self { simulation })
    }
}
