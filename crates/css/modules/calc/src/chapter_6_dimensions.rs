//! CSS Values & Units Level 3 — §6 Dimensions
//! Spec: <https://www.w3.org/TR/css-values-3/#dimensions>
//!
//! Unit table for the operands of `calc()` plus the context used to turn a
//! unit-bearing value into a canonical number.

use core::f64::consts::PI;
use std::fmt;

/// CSS pixels per inch (§6.2.1, absolute lengths).
const PX_PER_INCH: f64 = 96.0;
/// Centimetres per inch.
const CM_PER_INCH: f64 = 2.54;
/// Approximation of `1ex` and `1ch` when no font metrics are available.
const EX_PER_EM: f64 = 0.5;

/// The dimension family a unit belongs to.
///
/// `None` means no physical dimension has been fixed yet; `Number` and
/// `Integer` describe unitless results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnitType {
    #[default]
    None,
    Number,
    Integer,
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
}

/// A CSS unit attached to a `<dimension>` token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    // Absolute lengths
    Pixels,
    Centimeters,
    Millimeters,
    QuarterMillimeters,
    Inches,
    Points,
    Picas,
    // Font-relative lengths
    Ems,
    RootEms,
    Exs,
    Chs,
    // Viewport-relative lengths
    ViewportWidth,
    ViewportHeight,
    ViewportMin,
    ViewportMax,
    // Angles
    Degrees,
    Gradians,
    Radians,
    Turns,
    // Times
    Seconds,
    Milliseconds,
    // Frequencies
    Hertz,
    Kilohertz,
    // Resolutions
    DotsPerInch,
    DotsPerCentimeter,
    DotsPerPixel,
    /// A unit this table does not know. Carries the lower-cased spelling.
    Other(String),
}

impl Unit {
    /// Look up a unit by its CSS spelling (ASCII case-insensitive).
    pub fn parse(unit: &str) -> Self {
        match unit.to_ascii_lowercase().as_str() {
            "px" => Self::Pixels,
            "cm" => Self::Centimeters,
            "mm" => Self::Millimeters,
            "q" => Self::QuarterMillimeters,
            "in" => Self::Inches,
            "pt" => Self::Points,
            "pc" => Self::Picas,
            "em" => Self::Ems,
            "rem" => Self::RootEms,
            "ex" => Self::Exs,
            "ch" => Self::Chs,
            "vw" => Self::ViewportWidth,
            "vh" => Self::ViewportHeight,
            "vmin" => Self::ViewportMin,
            "vmax" => Self::ViewportMax,
            "deg" => Self::Degrees,
            "grad" => Self::Gradians,
            "rad" => Self::Radians,
            "turn" => Self::Turns,
            "s" => Self::Seconds,
            "ms" => Self::Milliseconds,
            "hz" => Self::Hertz,
            "khz" => Self::Kilohertz,
            "dpi" => Self::DotsPerInch,
            "dpcm" => Self::DotsPerCentimeter,
            "dppx" | "x" => Self::DotsPerPixel,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Classify the unit into its dimension family.
    pub const fn unit_type(&self) -> UnitType {
        match self {
            Self::Pixels
            | Self::Centimeters
            | Self::Millimeters
            | Self::QuarterMillimeters
            | Self::Inches
            | Self::Points
            | Self::Picas
            | Self::Ems
            | Self::RootEms
            | Self::Exs
            | Self::Chs
            | Self::ViewportWidth
            | Self::ViewportHeight
            | Self::ViewportMin
            | Self::ViewportMax => UnitType::Length,
            Self::Degrees | Self::Gradians | Self::Radians | Self::Turns => UnitType::Angle,
            Self::Seconds | Self::Milliseconds => UnitType::Time,
            Self::Hertz | Self::Kilohertz => UnitType::Frequency,
            Self::DotsPerInch | Self::DotsPerCentimeter | Self::DotsPerPixel => {
                UnitType::Resolution
            }
            Self::Other(_) => UnitType::None,
        }
    }

    /// Canonical lower-case spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pixels => "px",
            Self::Centimeters => "cm",
            Self::Millimeters => "mm",
            Self::QuarterMillimeters => "q",
            Self::Inches => "in",
            Self::Points => "pt",
            Self::Picas => "pc",
            Self::Ems => "em",
            Self::RootEms => "rem",
            Self::Exs => "ex",
            Self::Chs => "ch",
            Self::ViewportWidth => "vw",
            Self::ViewportHeight => "vh",
            Self::ViewportMin => "vmin",
            Self::ViewportMax => "vmax",
            Self::Degrees => "deg",
            Self::Gradians => "grad",
            Self::Radians => "rad",
            Self::Turns => "turn",
            Self::Seconds => "s",
            Self::Milliseconds => "ms",
            Self::Hertz => "hz",
            Self::Kilohertz => "khz",
            Self::DotsPerInch => "dpi",
            Self::DotsPerCentimeter => "dpcm",
            Self::DotsPerPixel => "dppx",
            Self::Other(spelling) => spelling.as_str(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Viewport metrics used to evaluate viewport-relative units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
}

/// Context for resolving unit-bearing values to canonical numbers.
///
/// - Lengths resolve to CSS pixels.
/// - Angles resolve to degrees.
/// - Times resolve to milliseconds.
/// - Frequencies resolve to hertz.
/// - Resolutions resolve to dots per pixel.
/// - Percentages resolve against `percent_base_px` (value is in [0..100]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthContext {
    pub font_size_px: f32,
    pub root_font_size_px: f32,
    pub percent_base_px: f32,
    pub viewport: Option<Viewport>,
}

impl Default for LengthContext {
    fn default() -> Self {
        Self {
            font_size_px: 16.0,
            root_font_size_px: 16.0,
            percent_base_px: 0.0,
            viewport: None,
        }
    }
}

impl LengthContext {
    /// Compute the canonical value of `value` expressed in `unit`.
    ///
    /// Returns `None` for viewport units without a viewport and for units
    /// outside the table.
    pub fn resolve(&self, value: f32, unit: &Unit) -> Option<f64> {
        let magnitude = f64::from(value);
        let font_size = f64::from(self.font_size_px);
        let scale = match unit {
            Unit::Pixels | Unit::Degrees | Unit::Milliseconds | Unit::Hertz | Unit::DotsPerPixel => {
                1.0
            }
            Unit::Centimeters => PX_PER_INCH / CM_PER_INCH,
            Unit::Millimeters => PX_PER_INCH / (CM_PER_INCH * 10.0),
            Unit::QuarterMillimeters => PX_PER_INCH / (CM_PER_INCH * 40.0),
            Unit::Inches => PX_PER_INCH,
            Unit::Points => PX_PER_INCH / 72.0,
            Unit::Picas => PX_PER_INCH / 6.0,
            Unit::Ems => font_size,
            Unit::RootEms => f64::from(self.root_font_size_px),
            Unit::Exs | Unit::Chs => font_size * EX_PER_EM,
            Unit::ViewportWidth
            | Unit::ViewportHeight
            | Unit::ViewportMin
            | Unit::ViewportMax => self.viewport_scale(unit)?,
            Unit::Gradians => 0.9,
            Unit::Radians => 180.0 / PI,
            Unit::Turns => 360.0,
            Unit::Seconds | Unit::Kilohertz => 1000.0,
            Unit::DotsPerInch => 1.0 / PX_PER_INCH,
            Unit::DotsPerCentimeter => CM_PER_INCH / PX_PER_INCH,
            Unit::Other(_) => return None,
        };
        Some(magnitude * scale)
    }

    /// Resolve a percentage (in [0..100]) against `percent_base_px`.
    pub fn resolve_percentage(&self, percent: f32) -> f64 {
        f64::from(percent) * f64::from(self.percent_base_px) / 100.0
    }

    /// Pixels per one viewport unit (1% of the relevant viewport edge).
    fn viewport_scale(&self, unit: &Unit) -> Option<f64> {
        let viewport = self.viewport?;
        let width = f64::from(viewport.width_px);
        let height = f64::from(viewport.height_px);
        let edge = match unit {
            Unit::ViewportWidth => width,
            Unit::ViewportHeight => height,
            Unit::ViewportMin => width.min(height),
            Unit::ViewportMax => width.max(height),
            _ => return None,
        };
        Some(edge / 100.0)
    }
}
