//! Monte Carlo simulation of defect injection.
//!
//! Every trial classifies the shared die geometry afresh into its own status
//! vector and injects defects with its own generator, seeded with
//! `base_seed + trial_index`. Trials share no mutable state, so they may run
//! in any order or in parallel without changing the result.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_all, DieStatus};
use crate::error::{Error, Result};
use crate::inject::{defect_rng, inject};
use crate::layout::{Die, Layout};
use crate::substrate::{Region, Substrate};

/// Die counts for a single trial.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    /// The number of dies placed.
    pub total: usize,
    /// Dies fully inside the usable region (`good + defective`).
    pub good_physical: usize,
    /// Defect-free dies.
    pub good: usize,
    /// Physically good dies with a defect.
    pub defective: usize,
    /// Dies straddling the usable-region boundary.
    pub partial: usize,
    /// Dies entirely outside the usable region.
    pub lost: usize,
    /// `good / (good + defective)`, or 0 if there are no physically good dies.
    pub fab_yield: f64,
}

impl Tally {
    /// Counts statuses after defect injection.
    pub fn from_statuses(statuses: &[DieStatus]) -> Self {
        let mut tally = Self {
            total: statuses.len(),
            ..Default::default()
        };
        for status in statuses {
            match status {
                DieStatus::Good => tally.good += 1,
                DieStatus::Defective => tally.defective += 1,
                DieStatus::Partial => tally.partial += 1,
                DieStatus::Lost => tally.lost += 1,
                DieStatus::Pending | DieStatus::GoodPhysical => (),
            }
        }
        tally.good_physical = tally.good + tally.defective;
        tally.fab_yield = if tally.good_physical > 0 {
            tally.good as f64 / tally.good_physical as f64
        } else {
            0.
        };
        tally
    }
}

/// The outcome of one Monte Carlo trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    index: usize,
    seed: Option<u64>,
    tally: Tally,
    statuses: Vec<DieStatus>,
}

impl TrialResult {
    /// The zero-based trial index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The seed used for defect injection, if any.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The die counts for this trial.
    #[inline]
    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    /// The fab yield for this trial.
    #[inline]
    pub fn fab_yield(&self) -> f64 {
        self.tally.fab_yield
    }

    /// The final status of every die, indexed like [`Layout::dice`].
    #[inline]
    pub fn statuses(&self) -> &[DieStatus] {
        &self.statuses
    }

    /// Pairs each die with its final status in this trial.
    pub fn dice<'a>(&'a self, dice: &'a [Die]) -> impl Iterator<Item = (&'a Die, DieStatus)> + 'a {
        dice.iter().zip(self.statuses.iter().copied())
    }
}

/// The ordered results of a Monte Carlo run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimulationBatch {
    trials: Vec<TrialResult>,
}

impl SimulationBatch {
    /// The number of trials.
    #[inline]
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// Returns `true` if the batch has no trials.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// The first trial.
    #[inline]
    pub fn first(&self) -> Option<&TrialResult> {
        self.trials.first()
    }

    /// The trial with the given index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&TrialResult> {
        self.trials.get(index)
    }

    /// An iterator over the trials, in trial order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, TrialResult> {
        self.trials.iter()
    }

    /// The trials, in trial order.
    #[inline]
    pub fn trials(&self) -> &[TrialResult] {
        &self.trials
    }

    /// The mean fab yield across trials, or 0 for an empty batch.
    pub fn mean_fab_yield(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.;
        }
        self.fab_yields().sum::<f64>() / self.trials.len() as f64
    }

    /// The lowest fab yield of any trial, or 0 for an empty batch.
    pub fn min_fab_yield(&self) -> f64 {
        self.fab_yields().reduce(f64::min).unwrap_or(0.)
    }

    /// The highest fab yield of any trial, or 0 for an empty batch.
    pub fn max_fab_yield(&self) -> f64 {
        self.fab_yields().reduce(f64::max).unwrap_or(0.)
    }

    /// The population standard deviation of fab yield, or 0 for an empty batch.
    pub fn fab_yield_std_dev(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.;
        }
        let mean = self.mean_fab_yield();
        let var = self
            .fab_yields()
            .map(|y| (y - mean) * (y - mean))
            .sum::<f64>()
            / self.trials.len() as f64;
        var.sqrt()
    }

    fn fab_yields(&self) -> impl Iterator<Item = f64> + '_ {
        self.trials.iter().map(TrialResult::fab_yield)
    }
}

impl IntoIterator for SimulationBatch {
    type Item = TrialResult;
    type IntoIter = std::vec::IntoIter<TrialResult>;
    fn into_iter(self) -> Self::IntoIter {
        self.trials.into_iter()
    }
}

impl<'a> IntoIterator for &'a SimulationBatch {
    type Item = &'a TrialResult;
    type IntoIter = std::slice::Iter<'a, TrialResult>;
    fn into_iter(self) -> Self::IntoIter {
        self.trials.iter()
    }
}

impl FromIterator<TrialResult> for SimulationBatch {
    fn from_iter<I: IntoIterator<Item = TrialResult>>(iter: I) -> Self {
        Self {
            trials: iter.into_iter().collect(),
        }
    }
}

/// Returns the seed for trial `index`, `base_seed + index` (wrapping).
///
/// Depends only on the trial index, so adding trials never changes earlier ones.
pub fn trial_seed(base_seed: Option<u64>, index: usize) -> Option<u64> {
    base_seed.map(|seed| seed.wrapping_add(index as u64))
}

/// A Monte Carlo simulation over a fixed die layout.
#[derive(Debug, Clone)]
pub struct Simulation {
    dice: Arc<[Die]>,
    region: Region,
    yield_fraction: f64,
}

impl Simulation {
    /// Creates a simulation of `layout` on `substrate`.
    ///
    /// `yield_fraction` is the probability that a physically good die survives.
    pub fn new(layout: &Layout, substrate: &Substrate, yield_fraction: f64) -> Self {
        Self::from_dice(layout.shared_dice(), substrate, yield_fraction)
    }

    /// Creates a simulation directly from a shared die arena.
    pub fn from_dice(dice: Arc<[Die]>, substrate: &Substrate, yield_fraction: f64) -> Self {
        Self {
            dice,
            region: substrate.usable_region(),
            yield_fraction,
        }
    }

    /// The yield fraction applied to physically good dies.
    #[inline]
    pub fn yield_fraction(&self) -> f64 {
        self.yield_fraction
    }

    /// Runs a single trial.
    ///
    /// The trial is seeded with [`trial_seed`]`(base_seed, index)`, or unseeded
    /// if `base_seed` is [`None`].
    pub fn run_trial(&self, index: usize, base_seed: Option<u64>) -> TrialResult {
        let seed = trial_seed(base_seed, index);
        let mut statuses = classify_all(&self.dice, &self.region);
        let mut rng = defect_rng(seed);
        inject(&mut statuses, self.yield_fraction, &mut rng);
        let tally = Tally::from_statuses(&statuses);
        tracing::trace!(index, ?seed, fab_yield = tally.fab_yield, "finished trial");
        TrialResult {
            index,
            seed,
            tally,
            statuses,
        }
    }

    /// Runs `num_trials` trials in sequence.
    pub fn run(&self, num_trials: usize, base_seed: Option<u64>) -> Result<SimulationBatch> {
        check_trials(num_trials)?;
        let batch: SimulationBatch = (0..num_trials)
            .map(|index| self.run_trial(index, base_seed))
            .collect();
        tracing::debug!(
            dice = self.dice.len(),
            trials = num_trials,
            ?base_seed,
            mean_fab_yield = batch.mean_fab_yield(),
            "simulation complete"
        );
        Ok(batch)
    }

    /// Runs `num_trials` trials on the rayon thread pool.
    ///
    /// Produces the same batch as [`Simulation::run`] for a given `base_seed`.
    pub fn run_parallel(&self, num_trials: usize, base_seed: Option<u64>) -> Result<SimulationBatch> {
        check_trials(num_trials)?;
        let trials: Vec<TrialResult> = (0..num_trials)
            .into_par_iter()
            .map(|index| self.run_trial(index, base_seed))
            .collect();
        let batch = SimulationBatch { trials };
        tracing::debug!(
            dice = self.dice.len(),
            trials = num_trials,
            ?base_seed,
            mean_fab_yield = batch.mean_fab_yield(),
            "simulation complete"
        );
        Ok(batch)
    }
}

fn check_trials(num_trials: usize) -> Result<()> {
    if num_trials < 1 {
        return Err(Error::InvalidTrialCount(num_trials));
    }
    Ok(())
}

/// Runs `num_trials` independent trials over `dice` on `substrate`.
///
/// See [`Simulation::run`].
pub fn run_simulation(
    num_trials: usize,
    dice: Arc<[Die]>,
    substrate: &Substrate,
    yield_fraction: f64,
    base_seed: Option<u64>,
) -> Result<SimulationBatch> {
    Simulation::from_dice(dice, substrate, yield_fraction).run(num_trials, base_seed)
}
