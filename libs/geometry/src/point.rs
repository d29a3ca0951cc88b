//! 2-D points.

use crate::dims::Dims;

/// A point in two-dimensional space, in millimetres.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point {
    /// The x-coordinate.
    pub x: f64,
    /// The y-coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new [`Point`] from (x,y) coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the origin, `(0, 0)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let origin = Point::zero();
    /// assert_eq!(origin, Point::new(0., 0.));
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0., y: 0. }
    }

    /// Returns a copy of this point shifted by `dims`.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let p = Point::new(1., 2.).translate(Dims::new(3., 4.));
    /// assert_eq!(p, Point::new(4., 6.));
    /// ```
    #[inline]
    pub fn translate(self, dims: Dims) -> Self {
        Self::new(self.x + dims.w(), self.y + dims.h())
    }

    /// The squared distance from the origin.
    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

impl std::ops::Sub<Point> for Point {
    type Output = Self;
    fn sub(self, rhs: Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}
