//! Defect-density yield models.
//!
//! Each model maps the defect parameter `D = defect_rate * critical_area`
//! (in defects per die) to the probability that a die is defect-free.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{check_yield_param, Result};

/// Square millimetres per square centimetre.
const MM2_PER_CM2: f64 = 100.;

/// A statistical die-yield model.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum YieldModel {
    /// `exp(-D)`.
    #[default]
    Poisson,
    /// `((1 - exp(-D)) / D)^2`.
    Murphy,
    /// `(1 - exp(-2D)) / 2D`.
    Rectangular,
    /// `exp(-sqrt(D))`.
    Moore,
    /// `1 / (1 + D)`.
    Seeds,
}

impl YieldModel {
    /// Every model, in display order.
    pub const ALL: [YieldModel; 5] = [
        YieldModel::Poisson,
        YieldModel::Murphy,
        YieldModel::Rectangular,
        YieldModel::Moore,
        YieldModel::Seeds,
    ];

    /// The model's name, capitalized.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Poisson => "Poisson",
            Self::Murphy => "Murphy",
            Self::Rectangular => "Rectangular",
            Self::Moore => "Moore",
            Self::Seeds => "Seeds",
        }
    }

    /// Looks up a model by name, ignoring case.
    ///
    /// Returns [`None`] for unrecognized names.
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|model| model.name().eq_ignore_ascii_case(name))
    }

    /// Looks up a model by name, falling back to [`YieldModel::Poisson`] for unrecognized names.
    ///
    /// ```
    /// # use dieyield::model::YieldModel;
    /// assert_eq!(YieldModel::from_name("murphy"), YieldModel::Murphy);
    /// assert_eq!(YieldModel::from_name("negative-binomial"), YieldModel::Poisson);
    /// ```
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or_else(|| {
            tracing::warn!(name, "unrecognized yield model, falling back to Poisson");
            Self::Poisson
        })
    }

    /// Evaluates the model at defect parameter `d`.
    ///
    /// Models with a removable singularity at `d = 0` return their limit, 1.
    pub fn evaluate(&self, d: f64) -> f64 {
        match self {
            Self::Poisson => (-d).exp(),
            Self::Murphy => {
                if d == 0. {
                    1.
                } else {
                    let y = -(-d).exp_m1() / d;
                    y * y
                }
            }
            Self::Rectangular => {
                if d == 0. {
                    1.
                } else {
                    -(-2. * d).exp_m1() / (2. * d)
                }
            }
            Self::Moore => (-d.sqrt()).exp(),
            Self::Seeds => 1. / (1. + d),
        }
    }
}

impl Display for YieldModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for YieldModel {
    fn from(value: &str) -> Self {
        Self::from_name(value)
    }
}

impl From<String> for YieldModel {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

/// Inputs to a yield model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldParams {
    /// Defect density, in defects per cm².
    pub defect_rate: f64,
    /// Defect-sensitive die area, in mm².
    pub critical_area: f64,
    /// The model used to turn the defect parameter into a yield.
    pub model: YieldModel,
}

impl Default for YieldParams {
    /// 0.5 defects/cm² over a 25 mm² critical area, Poisson model.
    fn default() -> Self {
        Self {
            defect_rate: 0.5,
            critical_area: 25.,
            model: YieldModel::Poisson,
        }
    }
}

impl YieldParams {
    /// Creates a new set of yield parameters.
    pub const fn new(defect_rate: f64, critical_area: f64, model: YieldModel) -> Self {
        Self {
            defect_rate,
            critical_area,
            model,
        }
    }

    /// Checks that the defect rate and critical area are non-negative and finite.
    pub fn validate(&self) -> Result<()> {
        check_yield_param("defect rate", self.defect_rate)?;
        check_yield_param("critical area", self.critical_area)?;
        Ok(())
    }

    /// The expected number of defects per die, `defect_rate * critical_area / 100`.
    ///
    /// The division converts the critical area from mm² to cm².
    pub fn defect_parameter(&self) -> f64 {
        self.defect_rate * (self.critical_area / MM2_PER_CM2)
    }

    /// The probability that a physically good die is defect-free.
    pub fn yield_fraction(&self) -> f64 {
        self.model.evaluate(self.defect_parameter())
    }
}

/// Computes the yield fraction for the given inputs.
///
/// Lies in `(0, 1]` for non-negative inputs.
///
/// ```
/// # use dieyield::model::{yield_fraction, YieldModel};
/// let y = yield_fraction(0.5, 25., YieldModel::Poisson);
/// assert!((y - (-0.125f64).exp()).abs() < 1e-12);
/// ```
pub fn yield_fraction(defect_rate: f64, critical_area: f64, model: YieldModel) -> f64 {
    YieldParams::new(defect_rate, critical_area, model).yield_fraction()
}
