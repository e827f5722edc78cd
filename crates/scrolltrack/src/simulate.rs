//! A headless page for driving the tracker without a browser.
//!
//! [`SimulatedPage`] models a tall container inside a fixed viewport with a
//! movable scroll offset. [`simulate_scroll`] wires it to a tracker through a
//! [`ScrollBus`] and records one [`Frame`] per scroll step, exactly as a
//! render consumer would observe them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{attach, ScrollBus};
use crate::geometry::CurveGeometry;
use crate::milestone;
use crate::progress::ContainerMetrics;
use crate::sampler::CurvePoint;
use crate::tracker::{LayoutProbe, ScrollProgressTracker, TrackerState};

/// Upper bound on scroll steps in one simulation.
pub const MAX_STEPS: usize = 100_000;

/// Page geometry for a simulated scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Document offset of the container's top edge.
    pub container_offset: f64,
    /// Container height.
    pub container_height: f64,
    /// Viewport height.
    pub viewport_height: f64,
}

impl Default for PageLayout {
    /// A container twice the viewport height at the top of the page.
    fn default() -> Self {
        Self {
            container_offset: 0.0,
            container_height: 2000.0,
            viewport_height: 1000.0,
        }
    }
}

/// A page whose scroll position can be set directly.
#[derive(Debug)]
pub struct SimulatedPage {
    layout: PageLayout,
    scroll_y: Cell<f64>,
    path: RefCell<Option<Rc<CurveGeometry>>>,
}

impl SimulatedPage {
    /// Create a page scrolled to the top with the curve mounted.
    #[must_use]
    pub fn new(layout: PageLayout, curve: Rc<CurveGeometry>) -> Self {
        Self {
            layout,
            scroll_y: Cell::new(0.0),
            path: RefCell::new(Some(curve)),
        }
    }

    /// The page geometry.
    #[must_use]
    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    /// Current document scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    /// Scroll to an absolute offset.
    pub fn scroll_to(&self, y: f64) {
        self.scroll_y.set(y);
    }

    /// Scroll by a relative amount.
    pub fn scroll_by(&self, dy: f64) {
        self.scroll_y.set(self.scroll_y.get() + dy);
    }

    /// Scroll offset at which the container's bottom meets the viewport's
    /// bottom. Never negative.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        let l = self.layout;
        (l.container_offset + l.container_height - l.viewport_height).max(0.0)
    }

    /// Remove the curve, as if it had not been rendered yet.
    pub fn unmount_path(&self) -> Option<Rc<CurveGeometry>> {
        self.path.borrow_mut().take()
    }

    /// Put a curve in place.
    pub fn mount_path(&self, curve: Rc<CurveGeometry>) {
        *self.path.borrow_mut() = Some(curve);
    }
}

impl LayoutProbe for SimulatedPage {
    type Path = Rc<CurveGeometry>;

    fn container(&self) -> Option<ContainerMetrics> {
        Some(ContainerMetrics::new(
            self.layout.container_offset - self.scroll_y.get(),
            self.layout.container_height,
            self.layout.viewport_height,
        ))
    }

    fn path(&self) -> Option<Self::Path> {
        self.path.borrow().clone()
    }
}

/// What a render consumer sees after one scroll step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Document scroll offset for this step.
    pub scroll_y: f64,
    /// Scroll progress in `[0, 1]`.
    pub progress: f64,
    /// Marker position and heading.
    pub position: CurvePoint,
    /// Number of active milestones.
    pub active_milestones: usize,
    /// Whether the scroll hint is still shown.
    pub scroll_hint_visible: bool,
}

impl Frame {
    /// Build a frame from a tracker state.
    #[must_use]
    pub fn from_state(scroll_y: f64, state: &TrackerState, config: &Config) -> Self {
        Self {
            scroll_y,
            progress: state.progress,
            position: state.position,
            active_milestones: milestone::active_count(config.milestones(), state.progress),
            scroll_hint_visible: state.scroll_hint_visible(config.timeline.scroll_hint_until),
        }
    }
}

/// Scroll a simulated page from top to bottom in `steps` equal increments.
///
/// Returns `steps + 1` frames, the first at scroll offset 0 and the last at
/// [`SimulatedPage::max_scroll`].
///
/// # Errors
///
/// Returns an error if `steps` exceeds [`MAX_STEPS`] or the configured curve
/// cannot be built.
#[allow(clippy::cast_precision_loss)]
pub fn simulate_scroll(config: &Config, layout: PageLayout, steps: usize) -> Result<Vec<Frame>> {
    if steps > MAX_STEPS {
        return Err(Error::validation(format!(
            "steps must be at most {MAX_STEPS}, got {steps}"
        )));
    }

    let curve = Rc::new(config.curve()?);
    let page = Rc::new(SimulatedPage::new(layout, curve));
    let tracker = Rc::new(ScrollProgressTracker::new(Rc::clone(&page), config.heading));
    let mut updates = tracker.subscribe();

    let bus = ScrollBus::new();
    let binding = attach(&tracker, bus.clone());

    let max_scroll = page.max_scroll();
    debug!(steps, max_scroll, "Simulating scroll");

    let mut frames = Vec::with_capacity(steps + 1);
    for step in 0..=steps {
        let y = if steps == 0 {
            0.0
        } else {
            max_scroll * step as f64 / steps as f64
        };
        page.scroll_to(y);
        bus.emit();

        let state = *updates.borrow_and_update();
        frames.push(Frame::from_state(y, &state, config));
    }

    binding.detach();
    Ok(frames)
}
