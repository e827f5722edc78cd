//! `window` scroll events.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use scrolltrack::{ListenerId, ScrollEvents};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Window};

const SCROLL_EVENT: &str = "scroll";

/// Scroll events from the browser window.
///
/// Listeners are registered passive. Each registered closure is kept alive
/// here until it is unlistened, at which point it is removed from the window
/// and dropped.
#[derive(Clone)]
pub struct WindowScroll {
    window: Window,
    next_id: Rc<Cell<u64>>,
    listeners: Rc<RefCell<Vec<(ListenerId, Closure<dyn FnMut()>)>>>,
}

impl fmt::Debug for WindowScroll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowScroll")
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

impl WindowScroll {
    /// Create an event source for `window`.
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_id: Rc::new(Cell::new(0)),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl ScrollEvents for WindowScroll {
    fn listen(&self, handler: Box<dyn FnMut()>) -> ListenerId {
        let id = ListenerId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let closure = Closure::wrap(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        if let Err(err) = self
            .window
            .add_event_listener_with_callback_and_add_event_listener_options(
                SCROLL_EVENT,
                closure.as_ref().unchecked_ref(),
                &options,
            )
        {
            warn!(?err, %id, "Failed to add scroll listener");
        }

        self.listeners.borrow_mut().push((id, closure));
        id
    }

    fn unlisten(&self, id: ListenerId) {
        let removed = {
            let mut listeners = self.listeners.borrow_mut();
            listeners
                .iter()
                .position(|(l, _)| *l == id)
                .map(|pos| listeners.remove(pos))
        };

        if let Some((_, closure)) = removed {
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback(SCROLL_EVENT, closure.as_ref().unchecked_ref())
            {
                warn!(?err, %id, "Failed to remove scroll listener");
            }
        }
    }
}
