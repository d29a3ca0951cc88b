//! An import prelude that re-exports commonly used items.

pub use crate::circle::Circle;
pub use crate::contains::{Containment, Contains};
pub use crate::corner::{Corner, Corners};
pub use crate::dims::Dims;
pub use crate::dir::{Dir, Dirs};
pub use crate::point::Point;
pub use crate::rect::Rect;
pub use crate::steps::Steps;
