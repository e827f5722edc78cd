//! Sampling a position and heading along a curve.

use serde::{Deserialize, Serialize};

use crate::geometry::PathGeometry;
use crate::progress::normalize;

/// A position on the curve plus the marker's heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Horizontal position in path units.
    pub x: f64,
    /// Vertical position in path units.
    pub y: f64,
    /// Heading in degrees.
    pub angle: f64,
}

/// How the heading is derived from the curve tangent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingConfig {
    /// Arc length ahead of the sampled point used to estimate the tangent.
    pub lookahead: f64,
    /// Added to the tangent direction. The marker artwork points "up", so
    /// 90 degrees turns it to face along the curve.
    pub offset_degrees: f64,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            lookahead: 10.0,
            offset_degrees: 90.0,
        }
    }
}

/// Sample `path` at `progress` of its total length.
///
/// The heading is the direction from the sampled point to the point
/// `lookahead` further along (capped at the end of the curve), plus the
/// configured offset. At the very end both points coincide and the heading
/// is just the offset.
#[must_use]
pub fn sample<G: PathGeometry + ?Sized>(
    path: &G,
    progress: f64,
    heading: &HeadingConfig,
) -> CurvePoint {
    let total = path.total_length();
    let at = normalize(progress) * total;

    let point = path.point_at_length(at);
    let ahead = path.point_at_length((at + heading.lookahead).min(total));

    let angle = (ahead.y - point.y).atan2(ahead.x - point.x).to_degrees() + heading.offset_degrees;

    CurvePoint {
        x: point.x,
        y: point.y,
        angle,
    }
}
