//! The full set of engine inputs and a one-call entry point.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::model::YieldParams;
use crate::reticle::Reticle;
use crate::sim::{Simulation, SimulationBatch};
use crate::substrate::Substrate;

/// Monte Carlo controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParams {
    /// The number of trials to run.
    pub trials: usize,
    /// The base seed; trial `k` uses `seed + k`. [`None`] draws from OS entropy.
    ///
    /// Serialized as an integer, or `false` when unseeded. Negative integers
    /// wrap to their two's-complement `u64` value.
    #[serde(serialize_with = "serialize_seed", deserialize_with = "deserialize_seed")]
    pub seed: Option<u64>,
    /// Whether to run trials on a thread pool.
    pub parallel: bool,
}

impl Default for RunParams {
    /// One sequential trial seeded with 42.
    fn default() -> Self {
        Self {
            trials: 1,
            seed: Some(42),
            parallel: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeedValue {
    Unsigned(u64),
    Signed(i64),
    Flag(bool),
}

fn serialize_seed<S>(seed: &Option<u64>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match seed {
        Some(seed) => (*seed as i64).serialize(serializer),
        None => false.serialize(serializer),
    }
}

fn deserialize_seed<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match SeedValue::deserialize(deserializer)? {
        SeedValue::Unsigned(seed) => Ok(Some(seed)),
        SeedValue::Signed(seed) => Ok(Some(seed as u64)),
        SeedValue::Flag(false) => Ok(None),
        SeedValue::Flag(true) => Err(serde::de::Error::custom(
            "expected an integer seed, or `false` for an unseeded run",
        )),
    }
}

/// Every input needed to run a yield simulation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// The substrate being tiled.
    pub substrate: Substrate,
    /// Shot, die, and scribe sizes.
    pub reticle: Reticle,
    /// Defect density and yield model.
    #[serde(rename = "yield")]
    pub yield_params: YieldParams,
    /// Monte Carlo controls.
    pub run: RunParams,
}

/// The outputs of [`SimulationParams::run`].
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// The die layout shared by every trial.
    pub layout: Layout,
    /// The probability that a physically good die is defect-free.
    pub yield_fraction: f64,
    /// Per-trial results, in trial order.
    pub batch: SimulationBatch,
}

impl SimulationParams {
    /// Checks every input, so that no work starts on invalid parameters.
    pub fn validate(&self) -> Result<()> {
        self.substrate.validate()?;
        self.reticle.validate()?;
        self.yield_params.validate()?;
        if self.run.trials < 1 {
            return Err(Error::InvalidTrialCount(self.run.trials));
        }
        Ok(())
    }

    /// Builds the layout, computes the yield fraction, and runs every trial.
    pub fn run(&self) -> Result<SimulationReport> {
        self.validate()?;
        let layout = Layout::build(&self.substrate, &self.reticle)?;
        let yield_fraction = self.yield_params.yield_fraction();
        tracing::debug!(
            model = %self.yield_params.model,
            defect_parameter = self.yield_params.defect_parameter(),
            yield_fraction,
            "computed yield fraction"
        );
        let sim = Simulation::new(&layout, &self.substrate, yield_fraction);
        let batch = if self.run.parallel {
            sim.run_parallel(self.run.trials, self.run.seed)?
        } else {
            sim.run(self.run.trials, self.run.seed)?
        };
        Ok(SimulationReport {
            layout,
            yield_fraction,
            batch,
        })
    }
}
