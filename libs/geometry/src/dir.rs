//! Axis-aligned directions: horizontal or vertical.

use std::fmt::Display;

use array_map::{ArrayMap, Indexable};

/// An enumeration of axis-aligned directions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[repr(u8)]
#[derive(Indexable)]
pub enum Dir {
    /// The horizontal, or x-aligned, direction.
    Horiz,
    /// The vertical, or y-aligned, direction.
    Vert,
}

impl Dir {
    /// Both directions, horizontal first.
    pub const ALL: [Dir; 2] = [Dir::Horiz, Dir::Vert];
}

impl Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Horiz => write!(f, "horizontal"),
            Self::Vert => write!(f, "vertical"),
        }
    }
}

/// A value of type `T` for each of the two [`Dir`]s.
///
/// ```
/// # use geometry::prelude::*;
/// let dirs = Dirs::new(5, 6);
/// assert_eq!(dirs[Dir::Horiz], 5);
/// assert_eq!(dirs[Dir::Vert], 6);
/// ```
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq)]
pub struct Dirs<T> {
    inner: ArrayMap<Dir, T, 2>,
}

impl<T> Dirs<T> {
    /// Creates a new [`Dirs`] with the provided values for each direction.
    pub const fn new(horiz: T, vert: T) -> Self {
        // IMPORTANT: the ordering of array elements here must match
        // the ordering of variants in the [`Dir`] enum.
        Self {
            inner: ArrayMap::new([horiz, vert]),
        }
    }
}

impl<T> std::ops::Index<Dir> for Dirs<T> {
    type Output = T;
    fn index(&self, index: Dir) -> &Self::Output {
        &self.inner[index]
    }
}
