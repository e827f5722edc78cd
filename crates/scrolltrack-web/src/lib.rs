//! Browser bindings for `scrolltrack`.
//!
//! Exposes [`ScrollTimeline`] to JavaScript. It measures a container element
//! and an SVG `<path>` on every window scroll and reports where the marker
//! sits on the path.

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod dom;
pub mod scroll;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use scrolltrack::{
    attach, bind_observers, Config, Observers, ScrollBinding, ScrollProgressTracker, TrackerState,
};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;

pub use dom::{DomLayout, DomPath};
pub use scroll::WindowScroll;

/// A scroll-driven marker on an SVG path.
///
/// Listeners stay registered until [`dispose`](Self::dispose) is called or
/// the object is freed from JavaScript.
#[wasm_bindgen]
#[derive(Debug)]
pub struct ScrollTimeline {
    tracker: Rc<ScrollProgressTracker<DomLayout>>,
    observers: Observers,
    bindings: RefCell<Vec<ScrollBinding<WindowScroll>>>,
    milestone_count: usize,
    scroll_hint_until: f64,
}

#[wasm_bindgen]
impl ScrollTimeline {
    /// Track the element `container_id` and the path `path_id`.
    ///
    /// Neither element has to exist yet; updates are skipped until both do.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, path_id: &str) -> Result<ScrollTimeline, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let config = Config::default();

        let layout = DomLayout::new(window.clone(), container_id, path_id);
        let tracker = Rc::new(ScrollProgressTracker::new(layout, config.heading));
        let events = WindowScroll::new(window);
        // The tracker listener is registered first so observers see its update.
        let tracking = attach(&tracker, events.clone());
        let observers = Observers::new();
        let flushing = bind_observers(events, &observers);
        debug!(container_id, path_id, "Scroll timeline attached");

        Ok(Self {
            tracker,
            observers,
            bindings: RefCell::new(vec![tracking, flushing]),
            milestone_count: config.milestones().len(),
            scroll_hint_until: config.timeline.scroll_hint_until,
        })
    }

    /// Scroll progress in `[0, 1]`.
    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f64 {
        self.tracker.state().progress
    }

    /// Marker x coordinate in path space.
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.tracker.state().position.x
    }

    /// Marker y coordinate in path space.
    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.tracker.state().position.y
    }

    /// Marker rotation in degrees.
    #[wasm_bindgen(getter)]
    pub fn angle(&self) -> f64 {
        self.tracker.state().position.angle
    }

    /// Number of milestones on the timeline.
    #[wasm_bindgen(getter = milestoneCount)]
    pub fn milestone_count(&self) -> usize {
        self.milestone_count
    }

    /// Whether milestone `index` has been reached.
    #[wasm_bindgen(js_name = isMilestoneActive)]
    pub fn is_milestone_active(&self, index: usize) -> bool {
        self.tracker
            .state()
            .milestone_active(index, self.milestone_count)
    }

    /// Whether the scroll hint should still be shown.
    #[wasm_bindgen(getter = scrollHintVisible)]
    pub fn scroll_hint_visible(&self) -> bool {
        self.tracker
            .state()
            .scroll_hint_visible(self.scroll_hint_until)
    }

    /// Call `callback` with `{ progress, x, y, angle }` now and after every
    /// scroll or refresh that changes the state.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) {
        self.observers
            .subscribe(&self.tracker, move |state| notify(&callback, state));
    }

    /// Re-measure the layout without waiting for a scroll event.
    pub fn refresh(&self) {
        self.tracker.on_scroll();
        self.observers.flush();
    }

    /// Remove every scroll listener and `onChange` callback.
    pub fn dispose(&self) {
        let bindings = std::mem::take(&mut *self.bindings.borrow_mut());
        debug!(count = bindings.len(), "Disposing scroll timeline");
        drop(bindings);
        self.observers.clear();
    }
}

fn notify(callback: &Function, state: &TrackerState) {
    let payload = Object::new();
    let fields = [
        ("progress", state.progress),
        ("x", state.position.x),
        ("y", state.position.y),
        ("angle", state.position.angle),
    ];
    for (key, value) in fields {
        if let Err(err) = Reflect::set(&payload, &JsValue::from_str(key), &JsValue::from_f64(value)) {
            warn!(?err, key, "Failed to build timeline state");
        }
    }

    if let Err(err) = callback.call1(&JsValue::NULL, &payload) {
        warn!(?err, "onChange callback threw");
    }
}
