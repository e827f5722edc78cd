//! Render consumers of tracker state.
//!
//! A tracker can change state from a scroll event or from an explicit
//! re-measure. [`Observers`] holds every consumer callback behind its own
//! watch receiver, and [`Observers::flush`] delivers to those whose receiver
//! saw a change. Whoever drives the tracker flushes after each update,
//! whatever triggered it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tokio::sync::watch;
use tracing::trace;

use crate::events::{bind, ScrollBinding, ScrollEvents};
use crate::tracker::{LayoutProbe, ScrollProgressTracker, TrackerState};

/// One consumer callback and the receiver gating it.
pub struct StateObserver {
    rx: watch::Receiver<TrackerState>,
    callback: Box<dyn FnMut(&TrackerState)>,
}

impl fmt::Debug for StateObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateObserver")
            .field("state", &*self.rx.borrow())
            .finish_non_exhaustive()
    }
}

impl StateObserver {
    /// Wrap `callback`, treating the receiver's current value as already seen.
    #[must_use]
    pub fn new(mut rx: watch::Receiver<TrackerState>, callback: Box<dyn FnMut(&TrackerState)>) -> Self {
        rx.borrow_and_update();
        Self { rx, callback }
    }

    /// Call back with the latest state if it changed since the last call.
    ///
    /// Returns whether the callback ran. A closed channel counts as no change.
    pub fn notify_if_changed(&mut self) -> bool {
        if !self.rx.has_changed().unwrap_or(false) {
            return false;
        }
        let state = *self.rx.borrow_and_update();
        (self.callback)(&state);
        true
    }
}

#[derive(Default)]
struct ObserversInner {
    list: Vec<StateObserver>,
    flushing: bool,
    cleared: bool,
}

/// A shared list of [`StateObserver`]s.
///
/// Clones share the list. Callbacks may add observers, flush or clear while
/// a flush is running: added observers are kept, a nested flush is ignored,
/// and a clear drops everything once the running flush ends.
#[derive(Clone, Default)]
pub struct Observers {
    inner: Rc<RefCell<ObserversInner>>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.len())
            .finish()
    }
}

impl Observers {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a consumer of `tracker`'s state.
    ///
    /// `callback` runs once right away with the current state, then on every
    /// flush that follows a change.
    pub fn subscribe<P, F>(&self, tracker: &ScrollProgressTracker<P>, mut callback: F)
    where
        P: LayoutProbe,
        F: FnMut(&TrackerState) + 'static,
    {
        let rx = tracker.subscribe();
        let current = *rx.borrow();
        callback(&current);
        self.inner
            .borrow_mut()
            .list
            .push(StateObserver::new(rx, Box::new(callback)));
    }

    /// Deliver pending changes. Returns how many callbacks ran.
    pub fn flush(&self) -> usize {
        let mut list = {
            let mut inner = self.inner.borrow_mut();
            if inner.flushing {
                trace!("Nested observer flush ignored");
                return 0;
            }
            inner.flushing = true;
            std::mem::take(&mut inner.list)
        };

        let notified = list
            .iter_mut()
            .map(StateObserver::notify_if_changed)
            .filter(|ran| *ran)
            .count();

        let dropped = {
            let mut inner = self.inner.borrow_mut();
            inner.flushing = false;
            if std::mem::take(&mut inner.cleared) {
                Some(list)
            } else {
                list.append(&mut inner.list);
                inner.list = list;
                None
            }
        };
        // Callbacks are dropped outside the borrow in case they own handles.
        drop(dropped);

        notified
    }

    /// Remove every observer.
    pub fn clear(&self) {
        let dropped = {
            let mut inner = self.inner.borrow_mut();
            if inner.flushing {
                inner.cleared = true;
            }
            std::mem::take(&mut inner.list)
        };
        drop(dropped);
    }

    /// Number of observers, outside of a flush.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().list.len()
    }

    /// Whether there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flush `observers` on every event from `events`.
///
/// Bind this after the tracker itself is attached to the same source, so
/// the tracker updates before observers are flushed.
pub fn bind_observers<E: ScrollEvents>(events: E, observers: &Observers) -> ScrollBinding<E> {
    let observers = observers.clone();
    bind(
        events,
        Box::new(move || {
            observers.flush();
        }),
    )
}
