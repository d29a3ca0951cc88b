//! Die-yield estimation for wafers and panels.
//!
//! A substrate is tiled with reticle shots, each shot is filled with a grid
//! of dies separated by scribe lines, every die is classified by how many of
//! its corners lie in the substrate's usable area, and physically good dies
//! are randomly marked defective according to a yield model. Repeating the
//! last step over many seeded trials characterizes yield variability.
//!
//! # Examples
//!
//! ```
//! use dieyield::prelude::*;
//!
//! let params = SimulationParams::default();
//! let report = params.run().unwrap();
//! let tally = report.batch.first().unwrap().tally();
//! assert_eq!(tally.good + tally.defective + tally.partial + tally.lost, tally.total);
//! ```
#![warn(missing_docs)]

pub mod classify;
pub mod error;
pub mod inject;
pub mod layout;
pub mod model;
pub mod params;
pub mod reticle;
pub mod sim;
pub mod substrate;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use params::{RunParams, SimulationParams, SimulationReport};

/// An import prelude that re-exports commonly used items.
pub mod prelude {
    pub use crate::classify::{classify, classify_all, DieStatus};
    pub use crate::error::{Error, Result};
    pub use crate::inject::{inject, inject_seeded};
    pub use crate::layout::{Die, GeometryIssue, Layout};
    pub use crate::model::{yield_fraction, YieldModel, YieldParams};
    pub use crate::params::{RunParams, SimulationParams, SimulationReport};
    pub use crate::reticle::Reticle;
    pub use crate::sim::{run_simulation, Simulation, SimulationBatch, Tally, TrialResult};
    pub use crate::substrate::{Panel, Region, Substrate, SubstrateKind, Wafer};
}
