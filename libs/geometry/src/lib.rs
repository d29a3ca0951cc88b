//! 2-D geometric operations for placing dies on wafers and panels.
//!
//! All coordinates are in millimetres and stored as [`f64`].
//!
//! # Examples
//!
//! Create a [rectangle](crate::rect::Rect) and test a point against it:
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_sides(0., 0., 10., 20.);
//! assert_eq!(rect.contains(&Point::new(10., 5.)), Containment::Full);
//! ```
#![warn(missing_docs)]

pub mod circle;
pub mod contains;
pub mod corner;
pub mod dims;
pub mod dir;
pub mod point;
pub mod prelude;
pub mod rect;
pub mod steps;
