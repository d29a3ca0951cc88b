//! A horizontal and vertical rectangular dimension with no specified location.

use crate::dir::Dir;

/// A horizontal and vertical rectangular dimension with no specified location.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Dims {
    /// The width dimension.
    w: f64,
    /// The height dimension.
    h: f64,
}

impl Dims {
    /// Creates a new [`Dims`] from a width and height.
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Creates a new [`Dims`] with width and height equal to `value`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Dims::square(5.), Dims::new(5., 5.));
    /// ```
    pub const fn square(value: f64) -> Self {
        Self { w: value, h: value }
    }

    /// Returns the dimension in the specified direction.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let dims = Dims::new(26., 33.);
    /// assert_eq!(dims.dim(Dir::Vert), 33.);
    /// assert_eq!(dims.dim(Dir::Horiz), 26.);
    /// ```
    pub fn dim(&self, dir: Dir) -> f64 {
        match dir {
            Dir::Vert => self.h,
            Dir::Horiz => self.w,
        }
    }

    /// The width (horizontal dimension).
    #[inline]
    pub fn w(&self) -> f64 {
        self.w
    }

    /// The height (vertical dimension).
    #[inline]
    pub fn h(&self) -> f64 {
        self.h
    }
}

impl std::ops::Add<Dims> for Dims {
    type Output = Self;
    fn add(self, rhs: Dims) -> Self::Output {
        Self {
            w: self.w + rhs.w,
            h: self.h + rhs.h,
        }
    }
}
