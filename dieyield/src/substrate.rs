//! Wafer and panel substrates.
//!
//! A [`Substrate`] determines two things: the bounding box that reticle shots
//! are tiled over, and the usable [`Region`] that dies are classified against.

use std::fmt::Display;
use std::str::FromStr;

use geometry::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{check_edge_loss, check_positive, Error, Result};

/// A circular wafer centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wafer {
    /// The wafer diameter in mm.
    pub diameter: f64,
    /// The unusable ring at the wafer edge, in mm.
    pub edge_loss: f64,
}

impl Wafer {
    /// Creates a new wafer from its diameter and edge loss.
    pub const fn new(diameter: f64, edge_loss: f64) -> Self {
        Self {
            diameter,
            edge_loss,
        }
    }

    /// The physical radius, `diameter / 2`.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.diameter / 2.
    }

    /// The radius of the usable disk, `radius - edge_loss`.
    ///
    /// May be negative if the edge loss exceeds the radius.
    #[inline]
    pub fn effective_radius(&self) -> f64 {
        self.radius() - self.edge_loss
    }
}

impl Default for Wafer {
    /// A 300 mm wafer with no edge loss.
    fn default() -> Self {
        Self::new(300., 0.)
    }
}

/// A rectangular panel with its lower-left corner at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Panel {
    /// The panel width in mm.
    pub width: f64,
    /// The panel height in mm.
    pub height: f64,
    /// The unusable margin on every side of the panel, in mm.
    pub edge_loss: f64,
}

impl Panel {
    /// Creates a new panel.
    pub const fn new(width: f64, height: f64, edge_loss: f64) -> Self {
        Self {
            width,
            height,
            edge_loss,
        }
    }

    /// The full panel outline.
    pub fn outline(&self) -> Rect {
        Rect::from_sides(0., 0., self.width, self.height)
    }

    /// The usable area: the outline inset by `edge_loss` on all sides.
    ///
    /// Inverted (and therefore empty) when the edge loss exceeds half of either side.
    pub fn usable_area(&self) -> Rect {
        self.outline().inset(self.edge_loss)
    }
}

impl Default for Panel {
    /// A 1000 mm by 500 mm panel with no edge loss.
    fn default() -> Self {
        Self::new(1000., 500., 0.)
    }
}

/// The kind of a [`Substrate`], without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SubstrateKind {
    /// A circular wafer.
    Wafer,
    /// A rectangular panel.
    Panel,
}

impl SubstrateKind {
    /// The lowercase name of this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wafer => "wafer",
            Self::Panel => "panel",
        }
    }
}

impl Display for SubstrateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubstrateKind {
    type Err = Error;

    /// Parses a substrate kind, ignoring case.
    ///
    /// ```
    /// # use dieyield::substrate::SubstrateKind;
    /// assert_eq!("Wafer".parse::<SubstrateKind>().unwrap(), SubstrateKind::Wafer);
    /// assert!("reticle".parse::<SubstrateKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wafer" => Ok(Self::Wafer),
            "panel" => Ok(Self::Panel),
            _ => Err(Error::UnknownSubstrate(s.to_string())),
        }
    }
}

impl TryFrom<String> for SubstrateKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A substrate that dies are placed on.
///
/// Serialized as a table whose `type` key names the [`SubstrateKind`].
/// When deserializing, `type` is matched case-insensitively and defaults to
/// `wafer`; missing sizes take the defaults of [`Wafer`] or [`Panel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Substrate {
    /// A circular wafer.
    Wafer(Wafer),
    /// A rectangular panel.
    Panel(Panel),
}

#[derive(Deserialize)]
#[serde(default)]
struct SubstrateTable {
    #[serde(rename = "type")]
    kind: SubstrateKind,
    diameter: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    edge_loss: Option<f64>,
}

impl Default for SubstrateTable {
    fn default() -> Self {
        Self {
            kind: SubstrateKind::Wafer,
            diameter: None,
            width: None,
            height: None,
            edge_loss: None,
        }
    }
}

impl<'de> Deserialize<'de> for Substrate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let table = SubstrateTable::deserialize(deserializer)?;
        Ok(match table.kind {
            SubstrateKind::Wafer => {
                let wafer = Wafer::default();
                Self::Wafer(Wafer::new(
                    table.diameter.unwrap_or(wafer.diameter),
                    table.edge_loss.unwrap_or(wafer.edge_loss),
                ))
            }
            SubstrateKind::Panel => {
                let panel = Panel::default();
                Self::Panel(Panel::new(
                    table.width.unwrap_or(panel.width),
                    table.height.unwrap_or(panel.height),
                    table.edge_loss.unwrap_or(panel.edge_loss),
                ))
            }
        })
    }
}

impl Default for Substrate {
    fn default() -> Self {
        Self::Wafer(Wafer::default())
    }
}

impl From<Wafer> for Substrate {
    fn from(value: Wafer) -> Self {
        Self::Wafer(value)
    }
}

impl From<Panel> for Substrate {
    fn from(value: Panel) -> Self {
        Self::Panel(value)
    }
}

impl Substrate {
    /// Creates a substrate of the given kind with default parameters.
    pub fn with_kind(kind: SubstrateKind) -> Self {
        match kind {
            SubstrateKind::Wafer => Wafer::default().into(),
            SubstrateKind::Panel => Panel::default().into(),
        }
    }

    /// The kind of this substrate.
    pub fn kind(&self) -> SubstrateKind {
        match self {
            Self::Wafer(_) => SubstrateKind::Wafer,
            Self::Panel(_) => SubstrateKind::Panel,
        }
    }

    /// The edge-loss margin of this substrate, in mm.
    pub fn edge_loss(&self) -> f64 {
        match self {
            Self::Wafer(wafer) => wafer.edge_loss,
            Self::Panel(panel) => panel.edge_loss,
        }
    }

    /// Checks that every size is positive and the edge loss is non-negative.
    ///
    /// An edge loss that consumes the whole substrate is accepted;
    /// see [`Substrate::is_degenerate`].
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Wafer(wafer) => {
                check_positive("wafer diameter", wafer.diameter)?;
            }
            Self::Panel(panel) => {
                check_positive("panel width", panel.width)?;
                check_positive("panel height", panel.height)?;
            }
        }
        check_edge_loss(self.edge_loss())?;
        Ok(())
    }

    /// The half-open box `[left, right) x [bot, top)` covered by shot tiles.
    ///
    /// For a wafer this is `[-radius, radius)` on both axes; for a panel it is
    /// `[0, width) x [0, height)`.
    pub fn tiling_bounds(&self) -> Rect {
        match self {
            Self::Wafer(wafer) => Circle::centered(wafer.radius()).bbox(),
            Self::Panel(panel) => panel.outline(),
        }
    }

    /// The usable region that die corners are tested against.
    pub fn usable_region(&self) -> Region {
        match self {
            Self::Wafer(wafer) => Region::Disk(Circle::centered(wafer.effective_radius())),
            Self::Panel(panel) => Region::Rect(panel.usable_area()),
        }
    }

    /// Returns `true` if the usable region has negative extent.
    ///
    /// A degenerate substrate is valid input; no die on it can be fully inside.
    pub fn is_degenerate(&self) -> bool {
        match self.usable_region() {
            Region::Disk(circle) => circle.is_degenerate(),
            Region::Rect(rect) => rect.is_inverted(),
        }
    }
}

/// The usable area of a substrate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    /// A closed disk (wafers).
    Disk(Circle),
    /// A closed axis-aligned rectangle (panels).
    Rect(Rect),
}

impl Contains<Point> for Region {
    fn contains(&self, p: &Point) -> Containment {
        match self {
            Self::Disk(circle) => circle.contains(p),
            Self::Rect(rect) => rect.contains(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wafer_bounds_span_the_diameter() {
        let s = Substrate::from(Wafer::new(300., 5.));
        assert_eq!(s.tiling_bounds(), Rect::from_sides(-150., -150., 150., 150.));
        assert_eq!(s.usable_region(), Region::Disk(Circle::centered(145.)));
    }

    #[test]
    fn panel_region_is_inset() {
        let s = Substrate::from(Panel::new(100., 50., 5.));
        assert_eq!(s.tiling_bounds(), Rect::from_sides(0., 0., 100., 50.));
        assert!(s.usable_region().encloses(&Point::new(5., 5.)));
        assert!(!s.usable_region().encloses(&Point::new(4.9, 5.)));
        assert!(s.usable_region().encloses(&Point::new(95., 45.)));
    }

    #[test]
    fn excessive_edge_loss_is_degenerate_but_valid() {
        let panel = Substrate::from(Panel::new(100., 50., 30.));
        assert!(panel.validate().is_ok());
        assert!(panel.is_degenerate());

        let wafer = Substrate::from(Wafer::new(100., 60.));
        assert!(wafer.validate().is_ok());
        assert!(wafer.is_degenerate());
        assert!(!wafer.usable_region().encloses(&Point::zero()));
    }

    #[test]
    fn invalid_sizes_are_rejected() {
        assert!(matches!(
            Substrate::from(Wafer::new(0., 0.)).validate(),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            Substrate::from(Panel::new(10., f64::NAN, 0.)).validate(),
            Err(Error::InvalidDimension { .. })
        ));
        assert_eq!(
            Substrate::from(Panel::new(10., 10., -1.)).validate(),
            Err(Error::InvalidEdgeLoss(-1.))
        );
    }

    #[test]
    fn unknown_kind_is_an_argument_error() {
        let err = "hexagon".parse::<SubstrateKind>().unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err, Error::UnknownSubstrate("hexagon".to_string()));
        assert_eq!(" PANEL ".parse::<SubstrateKind>().unwrap(), SubstrateKind::Panel);
    }

    #[test]
    fn substrate_type_is_case_insensitive() {
        let s: Substrate = toml::from_str("type = \"Wafer\"\ndiameter = 200.0").unwrap();
        assert_eq!(s, Substrate::from(Wafer::new(200., 0.)));

        let s: Substrate = toml::from_str("type = \"PANEL\"\nheight = 250.0").unwrap();
        assert_eq!(s, Substrate::from(Panel::new(1000., 250., 0.)));

        let s: Substrate = toml::from_str("edge_loss = 3.0").unwrap();
        assert_eq!(s, Substrate::from(Wafer::new(300., 3.)));
    }

    #[test]
    fn unknown_substrate_type_is_reported() {
        let err = toml::from_str::<Substrate>("type = \"hexagon\"").unwrap_err();
        let expected = Error::UnknownSubstrate("hexagon".to_string()).to_string();
        assert!(err.to_string().contains(&expected), "{err}");
    }

    #[test]
    fn substrate_serializes_with_lowercase_type() {
        let s = Substrate::from(Panel::new(600., 500., 5.));
        let text = toml::to_string(&s).unwrap();
        assert!(text.contains("type = \"panel\""), "{text}");
        assert_eq!(toml::from_str::<Substrate>(&text).unwrap(), s);
    }
}
