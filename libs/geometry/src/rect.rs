//! Axis-aligned rectangles.

use crate::contains::{Containment, Contains};
use crate::corner::{Corner, Corners};
use crate::dims::Dims;
use crate::point::Point;

/// An axis-aligned rectangle, specified by lower-left and upper-right corners.
///
/// Rectangles built with [`Rect::from_sides_unchecked`] or [`Rect::inset`] may be
/// *inverted* (left of right or bottom above top). An inverted rectangle
/// contains no points.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The lower-left corner.
    p0: Point,
    /// The upper-right corner.
    p1: Point,
}

impl Rect {
    /// Creates a rectangle with lower-left corner `p0` and size `dims`.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let r = Rect::with_origin_and_dims(Point::new(1., 2.), Dims::new(5., 5.));
    /// assert_eq!(r.corner(Corner::UpperRight), Point::new(6., 7.));
    /// ```
    pub fn with_origin_and_dims(p0: Point, dims: Dims) -> Self {
        Self::new(p0, p0.translate(dims))
    }

    /// Creates a new rectangle, normalizing the corner order.
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }

    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// The sides are normalized so that `left <= right` and `bot <= top`.
    pub fn from_sides(left: f64, bot: f64, right: f64, top: f64) -> Self {
        Self::new(Point::new(left, bot), Point::new(right, top))
    }

    /// Creates a rectangle from all 4 sides without normalizing them.
    ///
    /// If `left > right` or `bot > top`, the resulting rectangle is inverted
    /// and contains nothing.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let r = Rect::from_sides_unchecked(10., 0., 0., 10.);
    /// assert!(r.is_inverted());
    /// assert!(!r.encloses(&Point::new(5., 5.)));
    /// ```
    pub const fn from_sides_unchecked(left: f64, bot: f64, right: f64, top: f64) -> Self {
        Self {
            p0: Point::new(left, bot),
            p1: Point::new(right, top),
        }
    }

    /// Returns the bottom y-coordinate of the rectangle.
    #[inline]
    pub fn bot(&self) -> f64 {
        self.p0.y
    }

    /// Returns the top y-coordinate of the rectangle.
    #[inline]
    pub fn top(&self) -> f64 {
        self.p1.y
    }

    /// Returns the left x-coordinate of the rectangle.
    #[inline]
    pub fn left(&self) -> f64 {
        self.p0.x
    }

    /// Returns the right x-coordinate of the rectangle.
    #[inline]
    pub fn right(&self) -> f64 {
        self.p1.x
    }

    /// Returns the lower-left corner.
    #[inline]
    pub fn lower_left(&self) -> Point {
        self.p0
    }

    /// Returns the width of the rectangle. Negative if inverted horizontally.
    #[inline]
    pub fn width(&self) -> f64 {
        self.p1.x - self.p0.x
    }

    /// Returns the height of the rectangle. Negative if inverted vertically.
    #[inline]
    pub fn height(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    /// Returns `true` if either extent of the rectangle is negative.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.width() < 0. || self.height() < 0.
    }

    /// Shrinks the rectangle by `margin` on every side.
    ///
    /// The result is not normalized: a margin larger than half of either
    /// dimension produces an [inverted](Rect::is_inverted) rectangle.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let r = Rect::from_sides(0., 0., 100., 50.).inset(5.);
    /// assert_eq!(r, Rect::from_sides(5., 5., 95., 45.));
    /// ```
    pub fn inset(&self, margin: f64) -> Self {
        Self::from_sides_unchecked(
            self.p0.x + margin,
            self.p0.y + margin,
            self.p1.x - margin,
            self.p1.y - margin,
        )
    }

    /// Returns the given corner of the rectangle.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::LowerLeft => self.p0,
            Corner::LowerRight => Point::new(self.p1.x, self.p0.y),
            Corner::UpperLeft => Point::new(self.p0.x, self.p1.y),
            Corner::UpperRight => self.p1,
        }
    }

    /// Returns all four corners of the rectangle.
    pub fn corners(&self) -> Corners<Point> {
        Corners::new(
            self.corner(Corner::LowerLeft),
            self.corner(Corner::LowerRight),
            self.corner(Corner::UpperLeft),
            self.corner(Corner::UpperRight),
        )
    }
}

impl Contains<Point> for Rect {
    /// Closed-interval containment: points on the boundary are inside.
    fn contains(&self, p: &Point) -> Containment {
        if self.left() <= p.x && p.x <= self.right() && self.bot() <= p.y && p.y <= self.top() {
            Containment::Full
        } else {
            Containment::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_points_are_contained() {
        let r = Rect::from_sides(0., 0., 10., 10.);
        assert!(r.encloses(&Point::new(0., 0.)));
        assert!(r.encloses(&Point::new(10., 10.)));
        assert!(r.encloses(&Point::new(10., 0.)));
        assert!(!r.encloses(&Point::new(10.000001, 5.)));
        assert!(!r.encloses(&Point::new(5., -0.000001)));
    }

    #[test]
    fn oversized_inset_contains_nothing() {
        let r = Rect::from_sides(0., 0., 10., 4.).inset(3.);
        assert!(r.is_inverted());
        for p in [
            Point::new(5., 2.),
            Point::new(3., 3.),
            Point::new(7., 1.),
            Point::new(0., 0.),
        ] {
            assert_eq!(r.contains(&p), Containment::None);
        }
    }

    #[test]
    fn corners_follow_corner_order() {
        let r = Rect::with_origin_and_dims(Point::new(-2., 3.), Dims::new(5., 4.));
        let corners: Vec<Point> = r.corners().values().collect();
        assert_eq!(
            corners,
            vec![
                Point::new(-2., 3.),
                Point::new(3., 3.),
                Point::new(-2., 7.),
                Point::new(3., 7.),
            ]
        );
    }
}
