//! Path geometry queries.
//!
//! The tracker never talks to a renderer directly. It asks a [`PathGeometry`]
//! for the total arc length of a curve and for points along it, which keeps
//! the progress and sampling logic testable without a browser. [`CurveGeometry`]
//! answers those queries for SVG path data using kurbo.

use std::rc::Rc;
use std::sync::Arc;

use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathEl, PathSeg, Point};
use tracing::debug;

use crate::error::{Error, Result};

/// The uneven wave the timeline marker travels along, in an 800x280 view box.
pub const DEFAULT_WAVE_PATH: &str = "M 30 150 C 80 80, 120 60, 160 120 \
     C 200 180, 260 220, 320 140 \
     C 380 60, 420 40, 480 130 \
     C 540 220, 600 200, 660 100 \
     C 720 0, 760 60, 780 150";

/// Default arc length tolerance, in path units.
pub const DEFAULT_ACCURACY: f64 = 1e-3;

/// Arc-length queries against a fixed planar curve.
///
/// Mirrors the `getTotalLength` / `getPointAtLength` pair that SVG geometry
/// elements expose.
pub trait PathGeometry {
    /// Total arc length of the curve.
    fn total_length(&self) -> f64;

    /// The point at the given arc length from the start of the curve.
    ///
    /// Lengths outside `[0, total_length()]` are clamped.
    fn point_at_length(&self, length: f64) -> Point;
}

impl<T: PathGeometry + ?Sized> PathGeometry for &T {
    fn total_length(&self) -> f64 {
        (**self).total_length()
    }

    fn point_at_length(&self, length: f64) -> Point {
        (**self).point_at_length(length)
    }
}

impl<T: PathGeometry + ?Sized> PathGeometry for Rc<T> {
    fn total_length(&self) -> f64 {
        (**self).total_length()
    }

    fn point_at_length(&self, length: f64) -> Point {
        (**self).point_at_length(length)
    }
}

impl<T: PathGeometry + ?Sized> PathGeometry for Arc<T> {
    fn total_length(&self) -> f64 {
        (**self).total_length()
    }

    fn point_at_length(&self, length: f64) -> Point {
        (**self).point_at_length(length)
    }
}

/// A path segment with its precomputed arc length.
#[derive(Debug, Clone, Copy)]
struct MeasuredSegment {
    seg: PathSeg,
    /// Arc length from the start of the curve to the start of this segment.
    offset: f64,
    length: f64,
}

/// A curve parsed from SVG path data, with arc lengths measured up front.
#[derive(Debug, Clone)]
pub struct CurveGeometry {
    path: BezPath,
    segments: Vec<MeasuredSegment>,
    start: Point,
    total_length: f64,
    accuracy: f64,
}

impl CurveGeometry {
    /// Parse SVG path data into a measured curve.
    ///
    /// `accuracy` is the arc length tolerance used both when measuring
    /// segments and when inverting arc length back to a curve parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the path data is malformed or empty, or if
    /// `accuracy` is not a positive finite number.
    pub fn parse(path_data: &str, accuracy: f64) -> Result<Self> {
        if !accuracy.is_finite() || accuracy <= 0.0 {
            return Err(Error::validation(format!(
                "curve accuracy must be a positive number, got {accuracy}"
            )));
        }

        let path = BezPath::from_svg(path_data)?;
        Self::from_path(path, accuracy)
    }

    /// Parse the built-in wave curve.
    ///
    /// # Errors
    ///
    /// Only fails if [`DEFAULT_WAVE_PATH`] itself were malformed.
    pub fn default_wave() -> Result<Self> {
        Self::parse(DEFAULT_WAVE_PATH, DEFAULT_ACCURACY)
    }

    /// Measure an already-built kurbo path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCurve`] if the path has no elements.
    pub fn from_path(path: BezPath, accuracy: f64) -> Result<Self> {
        let start = match path.elements().first() {
            Some(PathEl::MoveTo(p)) => *p,
            Some(_) => {
                return Err(Error::CurveParse {
                    message: "path data must begin with a move-to".to_string(),
                })
            }
            None => return Err(Error::EmptyCurve),
        };

        let mut offset = 0.0;
        let segments: Vec<MeasuredSegment> = path
            .segments()
            .map(|seg| {
                let length = seg.arclen(accuracy);
                let measured = MeasuredSegment {
                    seg,
                    offset,
                    length,
                };
                offset += length;
                measured
            })
            .collect();

        debug!(
            segments = segments.len(),
            total_length = offset,
            "Measured curve"
        );

        Ok(Self {
            path,
            segments,
            start,
            total_length: offset,
            accuracy,
        })
    }

    /// The first point of the curve.
    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    /// The last point of the curve.
    #[must_use]
    pub fn end(&self) -> Point {
        self.segments
            .last()
            .map_or(self.start, |s| s.seg.end())
    }

    /// Number of drawable segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The arc length tolerance this curve was measured with.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// The underlying kurbo path.
    #[must_use]
    pub fn path(&self) -> &BezPath {
        &self.path
    }
}

impl PathGeometry for CurveGeometry {
    fn total_length(&self) -> f64 {
        self.total_length
    }

    fn point_at_length(&self, length: f64) -> Point {
        let Some(last) = self.segments.last() else {
            return self.start;
        };

        let target = if length.is_nan() {
            0.0
        } else {
            length.clamp(0.0, self.total_length)
        };

        let idx = self
            .segments
            .partition_point(|s| s.offset + s.length < target);
        let Some(segment) = self.segments.get(idx) else {
            return last.seg.end();
        };

        if target <= segment.offset {
            return segment.seg.start();
        }
        if target >= segment.offset + segment.length {
            return segment.seg.end();
        }

        let t = segment.seg.inv_arclen(target - segment.offset, self.accuracy);
        segment.seg.eval(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(actual: Point, expected: Point, tolerance: f64) {
        assert!(
            (actual - expected).hypot() <= tolerance,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_straight_line_length() {
        let curve = CurveGeometry::parse("M 0 0 L 100 0", DEFAULT_ACCURACY).unwrap();
        assert!((curve.total_length() - 100.0).abs() < 1e-9);
        assert_eq!(curve.segment_count(), 1);
    }

    #[test]
    fn test_point_on_straight_line() {
        let curve = CurveGeometry::parse("M 0 0 L 100 0", DEFAULT_ACCURACY).unwrap();
        assert_near(curve.point_at_length(25.0), Point::new(25.0, 0.0), 1e-6);
    }

    #[test]
    fn test_point_crosses_segments() {
        let curve = CurveGeometry::parse("M 0 0 L 100 0 L 100 50", DEFAULT_ACCURACY).unwrap();
        assert!((curve.total_length() - 150.0).abs() < 1e-9);
        assert_near(curve.point_at_length(100.0), Point::new(100.0, 0.0), 1e-9);
        assert_near(curve.point_at_length(125.0), Point::new(100.0, 25.0), 1e-6);
    }

    #[test]
    fn test_lengths_are_clamped() {
        let curve = CurveGeometry::parse("M 10 10 L 20 10", DEFAULT_ACCURACY).unwrap();
        assert_eq!(curve.point_at_length(-5.0), Point::new(10.0, 10.0));
        assert_eq!(curve.point_at_length(500.0), Point::new(20.0, 10.0));
        assert_eq!(curve.point_at_length(f64::NAN), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_cubic_arc_length() {
        // Evenly spaced control points on a line: a straight cubic.
        let curve = CurveGeometry::parse("M 0 0 C 10 0, 20 0, 30 0", DEFAULT_ACCURACY).unwrap();
        assert!((curve.total_length() - 30.0).abs() < 1e-2);
        assert_near(curve.point_at_length(15.0), Point::new(15.0, 0.0), 1e-2);
    }

    #[test]
    fn test_default_wave() {
        let curve = CurveGeometry::default_wave().unwrap();
        assert_eq!(curve.segment_count(), 5);
        assert_eq!(curve.start(), Point::new(30.0, 150.0));
        assert_eq!(curve.end(), Point::new(780.0, 150.0));
        // The wave is longer than the chord between its endpoints.
        assert!(curve.total_length() > 750.0);
        assert_eq!(curve.point_at_length(0.0), Point::new(30.0, 150.0));
        assert_eq!(
            curve.point_at_length(curve.total_length()),
            Point::new(780.0, 150.0)
        );
    }

    #[test]
    fn test_move_only_path() {
        let curve = CurveGeometry::parse("M 10 20", DEFAULT_ACCURACY).unwrap();
        assert_eq!(curve.total_length(), 0.0);
        assert_eq!(curve.segment_count(), 0);
        assert_eq!(curve.point_at_length(3.0), Point::new(10.0, 20.0));
        assert_eq!(curve.end(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_empty_path_is_error() {
        let err = CurveGeometry::parse("", DEFAULT_ACCURACY).unwrap_err();
        assert!(matches!(err, Error::EmptyCurve));
    }

    #[test]
    fn test_malformed_path_is_error() {
        let err = CurveGeometry::parse("M 0 0 Q oops", DEFAULT_ACCURACY).unwrap_err();
        assert!(matches!(err, Error::CurveParse { .. }));
    }

    #[test]
    fn test_invalid_accuracy() {
        assert!(CurveGeometry::parse("M 0 0 L 1 1", 0.0).is_err());
        assert!(CurveGeometry::parse("M 0 0 L 1 1", f64::NAN).is_err());
    }

    #[test]
    fn test_geometry_through_rc() {
        let curve = Rc::new(CurveGeometry::parse("M 0 0 L 0 40", DEFAULT_ACCURACY).unwrap());
        let by_ref: &dyn PathGeometry = &curve;
        assert!((by_ref.total_length() - 40.0).abs() < 1e-9);
    }
}
