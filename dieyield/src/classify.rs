//! Classifying dies against a substrate's usable region.

use std::fmt::Display;

use geometry::prelude::*;
use serde::{Deserialize, Serialize};

use crate::layout::Die;
use crate::substrate::Region;

/// The status of a die within one trial.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DieStatus {
    /// Placed but not yet classified.
    #[default]
    Pending,
    /// All four corners are inside the usable region; awaiting defect injection.
    GoodPhysical,
    /// Some, but not all, corners are inside the usable region.
    Partial,
    /// No corner is inside the usable region.
    Lost,
    /// Physically good and free of defects.
    Good,
    /// Physically good but defective.
    Defective,
}

impl DieStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [DieStatus; 6] = [
        DieStatus::Pending,
        DieStatus::GoodPhysical,
        DieStatus::Partial,
        DieStatus::Lost,
        DieStatus::Good,
        DieStatus::Defective,
    ];

    /// The snake-case name of this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::GoodPhysical => "good_physical",
            Self::Partial => "partial",
            Self::Lost => "lost",
            Self::Good => "good",
            Self::Defective => "defective",
        }
    }

    /// Returns `true` for dies wholly inside the usable region,
    /// whether or not defect injection has resolved them yet.
    pub const fn is_physically_good(&self) -> bool {
        matches!(self, Self::GoodPhysical | Self::Good | Self::Defective)
    }

    /// The conventional die-map color for this status.
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Good => "green",
            Self::Defective => "red",
            Self::Partial => "yellow",
            Self::Lost => "grey",
            Self::Pending | Self::GoodPhysical => "blue",
        }
    }
}

impl Display for DieStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Containment> for DieStatus {
    fn from(value: Containment) -> Self {
        match value {
            Containment::Full => Self::GoodPhysical,
            Containment::Partial => Self::Partial,
            Containment::None => Self::Lost,
        }
    }
}

/// Counts how many of a die's corners are inside `region`.
pub fn corners_inside(die: &Die, region: &Region) -> usize {
    die.corners()
        .values()
        .filter(|corner| region.encloses(corner))
        .count()
}

/// Classifies a die by sampling its four corners.
///
/// 4 corners inside is [`DieStatus::GoodPhysical`], 1 to 3 is
/// [`DieStatus::Partial`], and 0 is [`DieStatus::Lost`]. Only corners are
/// tested, so a die whose edges cross the region with no corner inside is
/// reported as lost.
pub fn classify(die: &Die, region: &Region) -> DieStatus {
    Containment::from_counts(corners_inside(die, region), Corner::ALL.len()).into()
}

/// Classifies every die, returning one status per die in the same order.
pub fn classify_all(dice: &[Die], region: &Region) -> Vec<DieStatus> {
    dice.iter().map(|die| classify(die, region)).collect()
}
