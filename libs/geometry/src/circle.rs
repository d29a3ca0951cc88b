//! Circles centered at an arbitrary point.

use crate::contains::{Containment, Contains};
use crate::point::Point;
use crate::rect::Rect;

/// A closed disk.
///
/// A circle with a negative radius is degenerate and contains no points.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
}

impl Circle {
    /// Creates a new circle.
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Creates a circle centered at the origin.
    pub const fn centered(radius: f64) -> Self {
        Self::new(Point::zero(), radius)
    }

    /// Returns `true` if the radius is negative.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.radius < 0.
    }

    /// The smallest axis-aligned rectangle enclosing the circle.
    pub fn bbox(&self) -> Rect {
        Rect::from_sides(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }
}

impl Contains<Point> for Circle {
    /// Closed-disk containment: points on the circumference are inside.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let c = Circle::centered(5.);
    /// assert!(c.encloses(&Point::new(3., 4.)));
    /// assert!(!c.encloses(&Point::new(3., 4.1)));
    /// assert!(!Circle::centered(-5.).encloses(&Point::zero()));
    /// ```
    fn contains(&self, p: &Point) -> Containment {
        if !self.is_degenerate() && (*p - self.center).norm_squared() <= self.radius * self.radius
        {
            Containment::Full
        } else {
            Containment::None
        }
    }
}
