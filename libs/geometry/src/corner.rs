//! Describes the corners of axis-aligned rectangles.
//!
//! # Examples
//!
//! You can access the corners of a [`Rect`](crate::rect::Rect):
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_sides(10., 20., 30., 40.);
//! assert_eq!(rect.corner(Corner::LowerRight), Point::new(30., 20.));
//! ```

use array_map::{ArrayMap, Indexable};

/// An enumeration of the corners of an axis-aligned rectangle.
///
/// Variants are declared in the canonical die-corner order:
/// lower-left, lower-right, upper-left, upper-right.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[repr(u8)]
#[derive(Indexable)]
pub enum Corner {
    /// The lower-left corner.
    LowerLeft,
    /// The lower-right corner.
    LowerRight,
    /// The upper-left corner.
    UpperLeft,
    /// The upper-right corner.
    UpperRight,
}

impl Corner {
    /// All four corners, in declaration order.
    pub const ALL: [Corner; 4] = [
        Corner::LowerLeft,
        Corner::LowerRight,
        Corner::UpperLeft,
        Corner::UpperRight,
    ];
}

/// An association of a value with type `T` to each of the four [`Corner`]s.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Corners<T> {
    inner: ArrayMap<Corner, T, 4>,
}

impl<T> Corners<T>
where
    T: Copy,
{
    /// Returns an iterator over the values, in [`Corner::ALL`] order.
    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        Corner::ALL.into_iter().map(move |c| self[c])
    }
}

impl<T> Corners<T> {
    /// Creates a new [`Corners`] with the provided values for each corner.
    pub const fn new(lower_left: T, lower_right: T, upper_left: T, upper_right: T) -> Self {
        // IMPORTANT: the ordering of array elements here must match
        // the ordering of variants in the [`Corner`] enum.
        Self {
            inner: ArrayMap::new([lower_left, lower_right, upper_left, upper_right]),
        }
    }
}

impl<T> std::ops::Index<Corner> for Corners<T> {
    type Output = T;
    fn index(&self, index: Corner) -> &Self::Output {
        &self.inner[index]
    }
}
