//! The scroll progress tracker.
//!
//! [`ScrollProgressTracker`] turns a scroll notification into a progress value
//! and a marker position on the curve. It reads layout through a
//! [`LayoutProbe`] and publishes its latest state on a `watch` channel, so any
//! number of render consumers can observe it and only ever see the newest
//! value.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::trace;

use crate::geometry::PathGeometry;
use crate::milestone;
use crate::progress::{scroll_progress, ContainerMetrics};
use crate::sampler::{sample, CurvePoint, HeadingConfig};

/// Access to the live layout the tracker measures.
///
/// Either half may be missing while the page is still mounting; the tracker
/// treats that as "try again on the next event".
pub trait LayoutProbe {
    /// Handle to the curve's geometry.
    type Path: PathGeometry;

    /// Current container measurements, or `None` if the container is not mounted.
    fn container(&self) -> Option<ContainerMetrics>;

    /// The curve, or `None` if it is not mounted.
    fn path(&self) -> Option<Self::Path>;
}

impl<T: LayoutProbe + ?Sized> LayoutProbe for Rc<T> {
    type Path = T::Path;

    fn container(&self) -> Option<ContainerMetrics> {
        (**self).container()
    }

    fn path(&self) -> Option<Self::Path> {
        (**self).path()
    }
}

/// Observable tracker output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    /// Scroll progress in `[0, 1]`.
    pub progress: f64,
    /// Marker position and heading.
    pub position: CurvePoint,
}

impl TrackerState {
    /// Whether milestone `index` of `count` is active in this state.
    #[must_use]
    pub fn milestone_active(&self, index: usize, count: usize) -> bool {
        milestone::is_active(index, count, self.progress)
    }

    /// Whether the "scroll to navigate" hint should still be shown.
    ///
    /// The hint disappears once progress reaches `hide_at`.
    #[must_use]
    pub fn scroll_hint_visible(&self, hide_at: f64) -> bool {
        self.progress < hide_at
    }
}

/// Maps scroll position to progress and a point on the curve.
#[derive(Debug)]
pub struct ScrollProgressTracker<P: LayoutProbe> {
    probe: P,
    heading: HeadingConfig,
    state: watch::Sender<TrackerState>,
}

impl<P: LayoutProbe> ScrollProgressTracker<P> {
    /// Create a tracker.
    ///
    /// The initial state sits at the start of the curve with the heading
    /// offset as its angle, before any scroll has been measured.
    #[must_use]
    pub fn new(probe: P, heading: HeadingConfig) -> Self {
        let start = probe
            .path()
            .map(|path| path.point_at_length(0.0))
            .unwrap_or_default();
        let initial = TrackerState {
            progress: 0.0,
            position: CurvePoint {
                x: start.x,
                y: start.y,
                angle: heading.offset_degrees,
            },
        };
        let (state, _) = watch::channel(initial);

        Self {
            probe,
            heading,
            state,
        }
    }

    /// Recompute state from the current layout.
    ///
    /// Does nothing if the container or curve is not mounted yet. Observers
    /// are only notified when the state actually changes.
    pub fn on_scroll(&self) {
        let Some(metrics) = self.probe.container() else {
            trace!("Container not mounted, skipping scroll update");
            return;
        };
        let Some(path) = self.probe.path() else {
            trace!("Path not mounted, skipping scroll update");
            return;
        };

        let progress = scroll_progress(metrics);
        let position = sample(&path, progress, &self.heading);
        let next = TrackerState { progress, position };

        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        if changed {
            trace!(
                progress,
                x = position.x,
                y = position.y,
                angle = position.angle,
                "Timeline state updated"
            );
        }
    }

    /// The most recently computed state.
    #[must_use]
    pub fn state(&self) -> TrackerState {
        *self.state.borrow()
    }

    /// Observe state changes.
    ///
    /// The receiver always holds the latest state; intermediate states that
    /// arrive before it is read are overwritten.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.state.subscribe()
    }

    /// Number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.state.receiver_count()
    }

    /// The layout probe this tracker reads from.
    #[must_use]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// The heading configuration in use.
    #[must_use]
    pub fn heading(&self) -> &HeadingConfig {
        &self.heading
    }
}
