//! Scroll event sources and the scoped listener binding.
//!
//! A [`ScrollEvents`] implementation delivers "the page scrolled"
//! notifications. [`attach`] wires a tracker to one and hands back a
//! [`ScrollBinding`] that owns the registration: dropping the binding
//! removes the listener, whether the timeline finished or was torn down
//! halfway through.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::tracker::{LayoutProbe, ScrollProgressTracker};

/// Identifies a registered scroll listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Create an id from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// A source of scroll notifications.
///
/// Handlers run on the thread that dispatches events and receive no payload;
/// they are expected to re-read layout themselves.
pub trait ScrollEvents {
    /// Register a handler. It stays registered until [`unlisten`](Self::unlisten).
    fn listen(&self, handler: Box<dyn FnMut()>) -> ListenerId;

    /// Remove a handler. Unknown ids are ignored.
    fn unlisten(&self, id: ListenerId);
}

/// Handler list shared by every clone of a [`ScrollBus`].
#[derive(Default)]
struct BusInner {
    next_id: u64,
    handlers: Vec<(ListenerId, Box<dyn FnMut()>)>,
    dispatching: bool,
    /// Ids removed while their handler was taken out for dispatch.
    removed: Vec<ListenerId>,
}

/// An in-process scroll event source.
///
/// Clones share the same listener list. Handlers may unlisten themselves
/// (or each other) while an event is being dispatched.
#[derive(Clone, Default)]
pub struct ScrollBus {
    inner: Rc<RefCell<BusInner>>,
}

impl fmt::Debug for ScrollBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl ScrollBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered listeners, outside of dispatch.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    /// Deliver one scroll event to every listener.
    ///
    /// Returns the number of handlers that ran. A nested `emit` from inside a
    /// handler is dropped.
    pub fn emit(&self) -> usize {
        let mut handlers = {
            let mut inner = self.inner.borrow_mut();
            if inner.dispatching {
                trace!("Nested scroll emit ignored");
                return 0;
            }
            inner.dispatching = true;
            std::mem::take(&mut inner.handlers)
        };

        let mut delivered = 0;
        for (id, handler) in &mut handlers {
            if self.inner.borrow().removed.contains(id) {
                continue;
            }
            handler();
            delivered += 1;
        }

        let stale = {
            let mut inner = self.inner.borrow_mut();
            inner.dispatching = false;
            let removed = std::mem::take(&mut inner.removed);
            let (stale, mut kept): (Vec<_>, Vec<_>) = handlers
                .into_iter()
                .partition(|(id, _)| removed.contains(id));
            // Listeners registered during dispatch go after the existing ones.
            kept.append(&mut inner.handlers);
            inner.handlers = kept;
            stale
        };
        drop(stale);

        delivered
    }
}

impl ScrollEvents for ScrollBus {
    fn listen(&self, handler: Box<dyn FnMut()>) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.handlers.push((id, handler));
        id
    }

    fn unlisten(&self, id: ListenerId) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            match inner.handlers.iter().position(|(h, _)| *h == id) {
                Some(pos) => Some(inner.handlers.remove(pos)),
                None => {
                    if inner.dispatching && !inner.removed.contains(&id) && id.0 < inner.next_id {
                        inner.removed.push(id);
                    }
                    None
                }
            }
        };
        // Handlers are dropped outside the borrow in case they own bus handles.
        drop(removed);
    }
}

/// Keeps a tracker subscribed to a scroll source.
///
/// Dropping the binding (or calling [`detach`](Self::detach)) removes the
/// listener.
#[derive(Debug)]
pub struct ScrollBinding<E: ScrollEvents> {
    events: E,
    id: Option<ListenerId>,
}

impl<E: ScrollEvents> ScrollBinding<E> {
    /// The listener id, while still attached.
    #[must_use]
    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    /// Whether the listener is still registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.id.is_some()
    }

    /// The event source this binding listens on.
    #[must_use]
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Remove the listener now.
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.events.unlisten(id);
            debug!(%id, "Detached scroll listener");
        }
    }
}

impl<E: ScrollEvents> Drop for ScrollBinding<E> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Register `handler` on `events` for as long as the returned binding lives.
pub fn bind<E: ScrollEvents>(events: E, handler: Box<dyn FnMut()>) -> ScrollBinding<E> {
    let id = events.listen(handler);
    debug!(%id, "Attached scroll listener");
    ScrollBinding {
        events,
        id: Some(id),
    }
}

/// Subscribe `tracker` to `events` and sync it to the current layout once.
pub fn attach<P, E>(tracker: &Rc<ScrollProgressTracker<P>>, events: E) -> ScrollBinding<E>
where
    P: LayoutProbe + 'static,
    E: ScrollEvents,
{
    let handler_tracker = Rc::clone(tracker);
    let binding = bind(events, Box::new(move || handler_tracker.on_scroll()));
    tracker.on_scroll();
    binding
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::geometry::{CurveGeometry, DEFAULT_ACCURACY};
    use crate::progress::ContainerMetrics;
    use crate::sampler::HeadingConfig;

    fn counter(bus: &ScrollBus) -> (ListenerId, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let id = bus.listen(Box::new(move || seen.set(seen.get() + 1)));
        (id, count)
    }

    struct StaticLayout {
        top: Cell<f64>,
        path: Rc<CurveGeometry>,
    }

    impl LayoutProbe for StaticLayout {
        type Path = Rc<CurveGeometry>;

        fn container(&self) -> Option<ContainerMetrics> {
            Some(ContainerMetrics::new(self.top.get(), 2000.0, 1000.0))
        }

        fn path(&self) -> Option<Self::Path> {
            Some(Rc::clone(&self.path))
        }
    }

    fn tracker() -> Rc<ScrollProgressTracker<StaticLayout>> {
        let layout = StaticLayout {
            top: Cell::new(-500.0),
            path: Rc::new(CurveGeometry::parse("M 0 0 L 100 0", DEFAULT_ACCURACY).unwrap()),
        };
        Rc::new(ScrollProgressTracker::new(layout, HeadingConfig::default()))
    }

    #[test]
    fn test_listener_id_display() {
        assert_eq!(ListenerId::new(7).to_string(), "listener#7");
        assert_eq!(ListenerId::new(7).get(), 7);
    }

    #[test]
    fn test_bus_emit_reaches_all_listeners() {
        let bus = ScrollBus::new();
        let (_, a) = counter(&bus);
        let (_, b) = counter(&bus);

        assert_eq!(bus.emit(), 2);
        assert_eq!(bus.emit(), 2);
        assert_eq!((a.get(), b.get()), (2, 2));
    }

    #[test]
    fn test_bus_unlisten() {
        let bus = ScrollBus::new();
        let (id, count) = counter(&bus);
        bus.unlisten(id);

        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.emit(), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_bus_unlisten_unknown_id_is_ignored() {
        let bus = ScrollBus::new();
        let (_, count) = counter(&bus);
        bus.unlisten(ListenerId::new(99));
        bus.emit();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_bus_clones_share_listeners() {
        let bus = ScrollBus::new();
        let other = bus.clone();
        let (_, count) = counter(&other);
        bus.emit();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_handler_can_unlisten_peer_during_dispatch() {
        let bus = ScrollBus::new();
        let victim_id = Rc::new(Cell::new(None::<ListenerId>));

        let remover_bus = bus.clone();
        let target = Rc::clone(&victim_id);
        bus.listen(Box::new(move || {
            if let Some(id) = target.get() {
                remover_bus.unlisten(id);
            }
        }));
        let (id, victim_count) = counter(&bus);
        victim_id.set(Some(id));

        assert_eq!(bus.emit(), 1);
        assert_eq!(victim_count.get(), 0);
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn test_listen_during_dispatch_runs_next_time() {
        let bus = ScrollBus::new();
        let late = Rc::new(Cell::new(0));
        let registered = Rc::new(Cell::new(false));

        let inner_bus = bus.clone();
        let late_count = Rc::clone(&late);
        let done = Rc::clone(&registered);
        bus.listen(Box::new(move || {
            if !done.get() {
                done.set(true);
                let c = Rc::clone(&late_count);
                inner_bus.listen(Box::new(move || c.set(c.get() + 1)));
            }
        }));

        assert_eq!(bus.emit(), 1);
        assert_eq!(late.get(), 0);
        assert_eq!(bus.emit(), 2);
        assert_eq!(late.get(), 1);
    }

    #[test]
    fn test_bind_scoped_handler() {
        let bus = ScrollBus::new();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let binding = bind(bus.clone(), Box::new(move || seen.set(seen.get() + 1)));

        assert_eq!(binding.id(), Some(ListenerId::new(0)));
        bus.emit();
        drop(binding);
        bus.emit();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_attach_syncs_immediately() {
        let tracker = tracker();
        let bus = ScrollBus::new();
        let binding = attach(&tracker, bus.clone());

        assert!(binding.is_attached());
        assert!((tracker.state().progress - 0.5).abs() < 1e-12);
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn test_binding_follows_scroll() {
        let tracker = tracker();
        let bus = ScrollBus::new();
        let _binding = attach(&tracker, bus.clone());

        tracker.probe().top.set(-900.0);
        bus.emit();
        assert!((tracker.state().progress - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_drop_releases_listener() {
        let tracker = tracker();
        let bus = ScrollBus::new();
        {
            let _binding = attach(&tracker, bus.clone());
            assert_eq!(bus.listener_count(), 1);
        }
        assert_eq!(bus.listener_count(), 0);
        // Only the test's handle remains.
        assert_eq!(Rc::strong_count(&tracker), 1);

        tracker.probe().top.set(-100.0);
        bus.emit();
        assert!((tracker.state().progress - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_detach() {
        let tracker = tracker();
        let bus = ScrollBus::new();
        let binding = attach(&tracker, bus.clone());
        binding.detach();
        assert_eq!(bus.listener_count(), 0);
    }
}
