//! Mapping a container's scroll position to a progress value in `[0, 1]`.

use serde::{Deserialize, Serialize};

/// Layout measurements taken when a scroll event fires.
///
/// All values are in viewport pixels. `top` is the container's bounding-box
/// top relative to the viewport, so it goes negative as the page scrolls
/// past the container's start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetrics {
    /// Top edge of the container relative to the viewport.
    pub top: f64,
    /// Full height of the container.
    pub height: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
}

impl ContainerMetrics {
    /// Create a new set of metrics.
    #[must_use]
    pub const fn new(top: f64, height: f64, viewport_height: f64) -> Self {
        Self {
            top,
            height,
            viewport_height,
        }
    }

    /// How far the container has been scrolled past the viewport top.
    #[must_use]
    pub fn scrolled(&self) -> f64 {
        -self.top
    }

    /// The distance over which the container can scroll while still
    /// covering the viewport.
    #[must_use]
    pub fn scroll_range(&self) -> f64 {
        self.height - self.viewport_height
    }

    /// Progress through the scroll range. See [`scroll_progress`].
    #[must_use]
    pub fn progress(&self) -> f64 {
        scroll_progress(*self)
    }
}

/// Compute normalized scroll progress for a container.
///
/// Returns `clamp(scrolled / range, 0, 1)`. A container that is no taller
/// than the viewport has nothing to scroll through and always reports `0`,
/// as does any measurement that would yield NaN.
#[must_use]
pub fn scroll_progress(metrics: ContainerMetrics) -> f64 {
    let range = metrics.scroll_range();
    if !range.is_finite() || range <= 0.0 {
        return 0.0;
    }

    let ratio = metrics.scrolled() / range;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

/// Bring an externally supplied progress value into `[0, 1]`.
///
/// NaN maps to `0`.
#[must_use]
pub fn normalize(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn metrics_for(scrolled: f64, height: f64, viewport_height: f64) -> ContainerMetrics {
        ContainerMetrics::new(-scrolled, height, viewport_height)
    }

    #[test]
    fn test_progress_at_start() {
        assert_eq!(scroll_progress(metrics_for(0.0, 2000.0, 1000.0)), 0.0);
    }

    #[test]
    fn test_progress_at_end_of_range() {
        assert_eq!(scroll_progress(metrics_for(1000.0, 2000.0, 1000.0)), 1.0);
    }

    #[test]
    fn test_progress_halfway() {
        let progress = scroll_progress(metrics_for(500.0, 2000.0, 1000.0));
        assert!((progress - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_before_container() {
        // Container still below the viewport top.
        assert_eq!(scroll_progress(metrics_for(-300.0, 2000.0, 1000.0)), 0.0);
    }

    #[test]
    fn test_progress_past_container() {
        assert_eq!(scroll_progress(metrics_for(5000.0, 2000.0, 1000.0)), 1.0);
    }

    #[test]
    fn test_zero_range_is_zero() {
        let progress = scroll_progress(metrics_for(250.0, 900.0, 900.0));
        assert_eq!(progress, 0.0);
        assert!(!progress.is_nan());
    }

    #[test]
    fn test_negative_range_is_zero() {
        assert_eq!(scroll_progress(metrics_for(250.0, 600.0, 900.0)), 0.0);
        assert_eq!(scroll_progress(metrics_for(-250.0, 600.0, 900.0)), 0.0);
    }

    #[test]
    fn test_nan_top_is_zero() {
        assert_eq!(
            scroll_progress(ContainerMetrics::new(f64::NAN, 2000.0, 1000.0)),
            0.0
        );
    }

    #[test]
    fn test_infinite_height_is_zero() {
        assert_eq!(scroll_progress(metrics_for(10.0, f64::INFINITY, 1000.0)), 0.0);
    }

    #[test]
    fn test_infinite_scroll_clamps() {
        assert_eq!(scroll_progress(metrics_for(f64::INFINITY, 2000.0, 1000.0)), 1.0);
        assert_eq!(
            scroll_progress(metrics_for(f64::NEG_INFINITY, 2000.0, 1000.0)),
            0.0
        );
    }

    #[test]
    fn test_metrics_accessors() {
        let metrics = ContainerMetrics::new(-120.0, 1800.0, 800.0);
        assert_eq!(metrics.scrolled(), 120.0);
        assert_eq!(metrics.scroll_range(), 1000.0);
        assert!((metrics.progress() - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(f64::NAN), 0.0);
        assert_eq!(normalize(-0.5), 0.0);
        assert_eq!(normalize(1.5), 1.0);
        assert_eq!(normalize(0.25), 0.25);
    }

    proptest! {
        #[test]
        fn prop_progress_is_bounded(
            scrolled in -1.0e7f64..1.0e7,
            height in -1.0e5f64..1.0e5,
            viewport in 0.0f64..1.0e5,
        ) {
            let progress = scroll_progress(metrics_for(scrolled, height, viewport));
            prop_assert!((0.0..=1.0).contains(&progress));
        }

        #[test]
        fn prop_progress_is_monotonic(
            a in -1.0e6f64..1.0e6,
            b in -1.0e6f64..1.0e6,
            range in 1.0f64..1.0e5,
            viewport in 1.0f64..1.0e4,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let height = viewport + range;
            let p_lo = scroll_progress(metrics_for(lo, height, viewport));
            let p_hi = scroll_progress(metrics_for(hi, height, viewport));
            prop_assert!(p_lo <= p_hi);
        }

        #[test]
        fn prop_full_range_is_one(range in 1.0f64..1.0e6, viewport in 1.0f64..1.0e4) {
            let height = viewport + range;
            let metrics = metrics_for(height - viewport, height, viewport);
            prop_assert_eq!(scroll_progress(metrics), 1.0);
        }
    }
}
