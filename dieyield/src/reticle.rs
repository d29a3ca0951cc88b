//! Reticle shot and die pitch parameters.

use geometry::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{check_positive, check_scribe, Result};

/// The size of one lithographic exposure and of the dies placed inside it.
///
/// All lengths are in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reticle {
    /// Width of a reticle shot.
    pub shot_width: f64,
    /// Height of a reticle shot.
    pub shot_height: f64,
    /// Width of a die.
    pub die_width: f64,
    /// Height of a die.
    pub die_height: f64,
    /// Horizontal scribe-line width between adjacent dies.
    pub scribe_x: f64,
    /// Vertical scribe-line width between adjacent dies.
    pub scribe_y: f64,
}

impl Default for Reticle {
    /// A 26 mm by 33 mm shot of 5 mm square dies on a 0.2 mm scribe.
    fn default() -> Self {
        Self {
            shot_width: 26.,
            shot_height: 33.,
            die_width: 5.,
            die_height: 5.,
            scribe_x: 0.2,
            scribe_y: 0.2,
        }
    }
}

impl Reticle {
    /// Creates a reticle from shot, die, and scribe dimensions.
    pub fn new(shot: Dims, die: Dims, scribe: Dims) -> Self {
        Self {
            shot_width: shot.w(),
            shot_height: shot.h(),
            die_width: die.w(),
            die_height: die.h(),
            scribe_x: scribe.w(),
            scribe_y: scribe.h(),
        }
    }

    /// Checks that shot and die sizes are positive and scribe widths are non-negative.
    pub fn validate(&self) -> Result<()> {
        check_positive("shot width", self.shot_width)?;
        check_positive("shot height", self.shot_height)?;
        check_positive("die width", self.die_width)?;
        check_positive("die height", self.die_height)?;
        check_scribe("scribe x", self.scribe_x)?;
        check_scribe("scribe y", self.scribe_y)?;
        Ok(())
    }

    /// The shot size.
    #[inline]
    pub fn shot(&self) -> Dims {
        Dims::new(self.shot_width, self.shot_height)
    }

    /// The die size.
    #[inline]
    pub fn die(&self) -> Dims {
        Dims::new(self.die_width, self.die_height)
    }

    /// The scribe-line widths.
    #[inline]
    pub fn scribe(&self) -> Dims {
        Dims::new(self.scribe_x, self.scribe_y)
    }

    /// The die pitch: die size plus scribe width.
    #[inline]
    pub fn pitch(&self) -> Dims {
        self.die() + self.scribe()
    }

    /// The number of whole dies that fit in a shot along `dir`.
    ///
    /// Equal to `floor((shot + scribe) / (die + scribe))`: the last die in a
    /// shot needs no trailing scribe line. Any remainder is left empty.
    ///
    /// ```
    /// # use dieyield::reticle::Reticle;
    /// # use geometry::prelude::*;
    /// let reticle = Reticle::default();
    /// assert_eq!(reticle.dice_along(Dir::Horiz), 5);
    /// assert_eq!(reticle.dice_along(Dir::Vert), 6);
    /// ```
    pub fn dice_along(&self, dir: Dir) -> usize {
        let shot = self.shot().dim(dir);
        let scribe = self.scribe().dim(dir);
        let pitch = self.pitch().dim(dir);
        let n = ((shot + scribe) / pitch).floor();
        if n.is_finite() && n > 0. {
            n as usize
        } else {
            0
        }
    }

    /// The number of dies per shot in each direction.
    pub fn dice_per_shot(&self) -> Dirs<usize> {
        Dirs::new(self.dice_along(Dir::Horiz), self.dice_along(Dir::Vert))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn die_larger_than_shot_fits_none() {
        let reticle = Reticle {
            die_width: 30.,
            ..Default::default()
        };
        assert_eq!(reticle.dice_along(Dir::Horiz), 0);
        assert_eq!(reticle.dice_along(Dir::Vert), 6);
    }

    #[test]
    fn zero_scribe_tiles_exactly() {
        let reticle = Reticle::new(Dims::new(20., 10.), Dims::square(5.), Dims::square(0.));
        assert_eq!(reticle.dice_per_shot(), Dirs::new(4, 2));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let negative_scribe = Reticle {
            scribe_y: -0.1,
            ..Default::default()
        };
        assert_eq!(
            negative_scribe.validate(),
            Err(Error::InvalidScribe {
                name: "scribe y",
                value: -0.1
            })
        );

        let zero_shot = Reticle {
            shot_width: 0.,
            ..Default::default()
        };
        assert!(matches!(
            zero_shot.validate(),
            Err(Error::InvalidDimension { name: "shot width", .. })
        ));
    }
}
