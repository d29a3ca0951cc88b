//! Engine error types.

/// The [`Error`] result type.
pub type Result<T> = std::result::Result<T, Error>;

/// An invalid engine input.
///
/// Every variant is raised before any geometry is built or any trial is run.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A shot, die, or substrate size that is not a positive, finite length.
    #[error("{name} must be a positive, finite length in mm (got {value})")]
    InvalidDimension {
        /// The name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A scribe-line width that is negative or not finite.
    #[error("{name} must be a non-negative, finite length in mm (got {value})")]
    InvalidScribe {
        /// The name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// An edge-loss margin that is negative or not finite.
    #[error("edge loss must be a non-negative, finite length in mm (got {0})")]
    InvalidEdgeLoss(f64),
    /// A defect rate or critical area that is negative or not finite.
    #[error("{name} must be non-negative and finite (got {value})")]
    InvalidYieldParam {
        /// The name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A Monte Carlo run with no trials.
    #[error("the number of trials must be at least 1 (got {0})")]
    InvalidTrialCount(usize),
    /// A shot grid or die count too large to allocate.
    #[error(
        "a {shots_x}x{shots_y} shot grid with {dice_x}x{dice_y} dies per shot is too large to lay out"
    )]
    LayoutTooLarge {
        /// The number of shot columns.
        shots_x: usize,
        /// The number of shot rows.
        shots_y: usize,
        /// The number of die columns in each shot.
        dice_x: usize,
        /// The number of die rows in each shot.
        dice_y: usize,
    },
    /// A substrate type name other than `wafer` or `panel`.
    #[error("unrecognized substrate type `{0}` (expected `wafer` or `panel`)")]
    UnknownSubstrate(String),
}

impl Error {
    /// Returns `true` if this error was caused by an invalid caller-supplied argument.
    ///
    /// All current variants are argument errors.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Self::InvalidDimension { .. }
            | Self::InvalidScribe { .. }
            | Self::InvalidEdgeLoss(_)
            | Self::InvalidYieldParam { .. }
            | Self::InvalidTrialCount(_)
            | Self::LayoutTooLarge { .. }
            | Self::UnknownSubstrate(_) => true,
        }
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64> {
    if value > 0. && value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidDimension { name, value })
    }
}

pub(crate) fn check_scribe(name: &'static str, value: f64) -> Result<f64> {
    if value >= 0. && value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidScribe { name, value })
    }
}

pub(crate) fn check_edge_loss(value: f64) -> Result<f64> {
    if value >= 0. && value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidEdgeLoss(value))
    }
}

pub(crate) fn check_yield_param(name: &'static str, value: f64) -> Result<f64> {
    if value >= 0. && value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidYieldParam { name, value })
    }
}
