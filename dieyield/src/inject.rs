//! Random defect injection.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::classify::DieStatus;

/// The random number generator used for defect injection.
pub type DefectRng = ChaCha8Rng;

/// Creates a generator from `seed`, or from OS entropy if no seed is given.
///
/// Equal seeds always produce equal streams.
pub fn defect_rng(seed: Option<u64>) -> DefectRng {
    match seed {
        Some(seed) => DefectRng::seed_from_u64(seed),
        None => DefectRng::from_entropy(),
    }
}

/// Resolves every [`DieStatus::GoodPhysical`] die to [`DieStatus::Good`] or
/// [`DieStatus::Defective`].
///
/// One uniform value in `[0, 1)` is drawn per physically good die, in die
/// order; the die is good if the value is below `yield_fraction`. Dies with
/// any other status are left untouched and consume no random values.
///
/// Returns the number of dies marked defective.
pub fn inject<R: Rng + ?Sized>(statuses: &mut [DieStatus], yield_fraction: f64, rng: &mut R) -> usize {
    let mut defective = 0;
    for status in statuses
        .iter_mut()
        .filter(|status| **status == DieStatus::GoodPhysical)
    {
        *status = if rng.gen::<f64>() < yield_fraction {
            DieStatus::Good
        } else {
            defective += 1;
            DieStatus::Defective
        };
    }
    defective
}

/// Like [`inject`], but with a fresh generator from [`defect_rng`].
pub fn inject_seeded(statuses: &mut [DieStatus], yield_fraction: f64, seed: Option<u64>) -> usize {
    let mut rng = defect_rng(seed);
    inject(statuses, yield_fraction, &mut rng)
}
