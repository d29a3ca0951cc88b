//! Tiling a substrate with reticle shots and placing dies inside each shot.
//!
//! Die geometry is computed once and stored in a shared, immutable arena.
//! Per-trial die status is kept separately (see [`crate::classify`]).

use std::fmt::Display;
use std::sync::Arc;

use diagnostics::{Diagnostic, IssueSet};
use geometry::prelude::*;

use crate::error::{Error, Result};
use crate::reticle::Reticle;
use crate::substrate::{Substrate, SubstrateKind};

/// A single die placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Die {
    rect: Rect,
    shot: usize,
    cell: (usize, usize),
}

impl Die {
    /// Creates a free-standing die occupying `rect`, assigned to shot 0, cell `(0, 0)`.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            shot: 0,
            cell: (0, 0),
        }
    }

    /// The x-coordinate of the lower-left corner.
    #[inline]
    pub fn x(&self) -> f64 {
        self.rect.left()
    }

    /// The y-coordinate of the lower-left corner.
    #[inline]
    pub fn y(&self) -> f64 {
        self.rect.bot()
    }

    /// The lower-left corner.
    #[inline]
    pub fn origin(&self) -> Point {
        self.rect.lower_left()
    }

    /// The die outline.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The four die corners: lower-left, lower-right, upper-left, upper-right.
    #[inline]
    pub fn corners(&self) -> Corners<Point> {
        self.rect.corners()
    }

    /// The index of the shot this die belongs to in [`Layout::shots`].
    #[inline]
    pub fn shot(&self) -> usize {
        self.shot
    }

    /// The `(i, j)` position of this die in its shot's sub-grid.
    #[inline]
    pub fn cell(&self) -> (usize, usize) {
        self.cell
    }
}

/// A geometric condition worth reporting that does not prevent a layout from being built.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryIssue {
    /// The edge loss leaves no usable area.
    DegenerateUsableArea {
        /// The kind of substrate.
        kind: SubstrateKind,
        /// The edge loss, in mm.
        edge_loss: f64,
    },
    /// A die (plus scribe) is larger than a shot in some direction, so no dies are placed.
    EmptyShot {
        /// The direction in which the die does not fit.
        dir: Dir,
        /// The die length in that direction, in mm.
        die: f64,
        /// The shot length in that direction, in mm.
        shot: f64,
    },
}

impl Display for GeometryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateUsableArea { kind, edge_loss } => write!(
                f,
                "edge loss of {edge_loss} mm leaves no usable area on the {kind}"
            ),
            Self::EmptyShot { dir, die, shot } => write!(
                f,
                "{dir} die size of {die} mm does not fit in a {shot} mm shot; no dies will be placed"
            ),
        }
    }
}

impl Diagnostic for GeometryIssue {
    fn help(&self) -> Option<&str> {
        match self {
            Self::DegenerateUsableArea { .. } => Some("reduce the edge loss"),
            Self::EmptyShot { .. } => Some("use a larger shot or a smaller die"),
        }
    }
}

/// The full set of die placements across all shot tiles on a substrate.
#[derive(Debug, Clone)]
pub struct Layout {
    dice: Arc<[Die]>,
    shots: Vec<Point>,
    reticle: Reticle,
    dice_per_shot: Dirs<usize>,
    issues: IssueSet<GeometryIssue>,
}

impl Layout {
    /// Tiles `substrate` with shots of `reticle` and places dies in each shot.
    ///
    /// Shot origins step by the shot size over the substrate's
    /// [tiling bounds](Substrate::tiling_bounds); a partially covering last
    /// shot is included. Dies are ordered by shot (x outer, y inner), then by
    /// cell (i outer, j inner).
    ///
    /// Invalid dimensions are rejected, as is a die count too large to
    /// allocate. Degenerate but valid geometry is reported through
    /// [`Layout::issues`].
    pub fn build(substrate: &Substrate, reticle: &Reticle) -> Result<Self> {
        substrate.validate()?;
        reticle.validate()?;

        let mut issues = IssueSet::new();
        if substrate.is_degenerate() {
            issues.add_and_emit(GeometryIssue::DegenerateUsableArea {
                kind: substrate.kind(),
                edge_loss: substrate.edge_loss(),
            });
        }

        let dice_per_shot = reticle.dice_per_shot();
        for dir in Dir::ALL {
            if dice_per_shot[dir] == 0 {
                issues.add_and_emit(GeometryIssue::EmptyShot {
                    dir,
                    die: reticle.die().dim(dir),
                    shot: reticle.shot().dim(dir),
                });
            }
        }

        let bounds = substrate.tiling_bounds();
        let xs = Steps::new(bounds.left(), bounds.right(), reticle.shot_width);
        let ys = Steps::new(bounds.bot(), bounds.top(), reticle.shot_height);
        let (nx, ny) = (dice_per_shot[Dir::Horiz], dice_per_shot[Dir::Vert]);

        let too_large = Error::LayoutTooLarge {
            shots_x: xs.len(),
            shots_y: ys.len(),
            dice_x: nx,
            dice_y: ny,
        };
        let num_shots = xs
            .len()
            .checked_mul(ys.len())
            .ok_or_else(|| too_large.clone())?;
        let num_dice = num_shots
            .checked_mul(nx)
            .and_then(|n| n.checked_mul(ny))
            .ok_or_else(|| too_large.clone())?;

        let mut shots: Vec<Point> = Vec::new();
        shots
            .try_reserve_exact(num_shots)
            .map_err(|_| too_large.clone())?;
        shots.extend(xs.flat_map(|x| ys.clone().map(move |y| Point::new(x, y))));

        let pitch = reticle.pitch();
        let die = reticle.die();

        let mut dice: Vec<Die> = Vec::new();
        dice.try_reserve_exact(num_dice).map_err(|_| too_large)?;
        for (shot, origin) in shots.iter().enumerate() {
            for i in 0..nx {
                for j in 0..ny {
                    let p0 = Point::new(
                        origin.x + i as f64 * pitch.w(),
                        origin.y + j as f64 * pitch.h(),
                    );
                    dice.push(Die {
                        rect: Rect::with_origin_and_dims(p0, die),
                        shot,
                        cell: (i, j),
                    });
                }
            }
        }

        tracing::debug!(
            substrate = %substrate.kind(),
            shots = shots.len(),
            dice = dice.len(),
            nx,
            ny,
            "built die layout"
        );

        Ok(Self {
            dice: dice.into(),
            shots,
            reticle: *reticle,
            dice_per_shot,
            issues,
        })
    }

    /// All dies, in placement order.
    #[inline]
    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    /// A shared handle to the die arena.
    #[inline]
    pub fn shared_dice(&self) -> Arc<[Die]> {
        Arc::clone(&self.dice)
    }

    /// The number of dies.
    #[inline]
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    /// Returns `true` if no dies were placed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// The lower-left corners of every shot tile, x outer and y inner.
    #[inline]
    pub fn shots(&self) -> &[Point] {
        &self.shots
    }

    /// The outline of the shot with the given index.
    pub fn shot_rect(&self, shot: usize) -> Option<Rect> {
        self.shots
            .get(shot)
            .map(|origin| Rect::with_origin_and_dims(*origin, self.reticle.shot()))
    }

    /// The reticle used to build this layout.
    #[inline]
    pub fn reticle(&self) -> &Reticle {
        &self.reticle
    }

    /// The number of dies per shot as `(num_dice_x, num_dice_y)`.
    pub fn dice_per_shot(&self) -> (usize, usize) {
        (self.dice_per_shot[Dir::Horiz], self.dice_per_shot[Dir::Vert])
    }

    /// Non-fatal geometry issues found while building the layout.
    #[inline]
    pub fn issues(&self) -> &IssueSet<GeometryIssue> {
        &self.issues
    }
}
