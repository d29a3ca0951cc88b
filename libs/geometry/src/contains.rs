//! Point-in-shape tests.

/// Ways in which an inner shape can be contained within an enclosing shape.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Containment {
    /// The enclosing shape does not contain any part of the inner shape.
    None,
    /// The shape is partially contained in the enclosing shape.
    Partial,
    /// The shape is fully contained in the enclosing shape.
    Full,
}

/// Provides information on whether a shape contains another shape.
pub trait Contains<T> {
    /// Returns a [`Containment`] indicating how `other` is enclosed within this shape.
    fn contains(&self, other: &T) -> Containment;

    /// Returns true if `other` is fully enclosed in this shape.
    #[inline]
    fn encloses(&self, other: &T) -> bool {
        self.contains(other).is_full()
    }
}

impl Containment {
    /// Summarizes a sampled containment test.
    ///
    /// `inside` of `total` sample points were found inside the enclosing shape.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Containment::from_counts(4, 4), Containment::Full);
    /// assert_eq!(Containment::from_counts(1, 4), Containment::Partial);
    /// assert_eq!(Containment::from_counts(0, 4), Containment::None);
    /// ```
    pub fn from_counts(inside: usize, total: usize) -> Self {
        if total > 0 && inside >= total {
            Self::Full
        } else if inside > 0 {
            Self::Partial
        } else {
            Self::None
        }
    }

    /// Returns true when fully contained.
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }
}
