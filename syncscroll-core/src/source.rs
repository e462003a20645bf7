//! Scroll source: broadcasts vertical offsets to registered observers.

use crate::error::Error;
use crate::offset::{ScrollOffset, ViewportEvent};
use crate::utils::lock;

use log::{debug, trace};
use std::sync::{Arc, Mutex, Weak};

/// Receives the offsets broadcast by a [`ScrollSource`].
pub trait ScrollObserver: Send {
    /// Called synchronously for every event of the source.
    fn on_viewport_event(&mut self, event: ViewportEvent);
}

/// Identifies one registration on a [`ScrollSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

struct Entry {
    id: ObserverId,
    observer: Weak<Mutex<dyn ScrollObserver>>,
}

struct State {
    offset: ScrollOffset,

    // Host row where the viewport top was last drawn.
    viewport_origin: i32,

    pending_resettle: bool,

    observers: Vec<Entry>,
    next_id: u64,
}

/// Owner of a scroll position, notifying observers when it changes.
///
/// This is a cheap handle: clones share the same state. Observers are held
/// through weak references, so a dropped observer is simply skipped (and
/// pruned) on the next broadcast.
///
/// Events are delivered synchronously, in registration order, on the thread
/// calling [`scroll_to`](ScrollSource::scroll_to).
#[derive(Clone)]
pub struct ScrollSource {
    state: Arc<Mutex<State>>,
}

new_default!(ScrollSource);

impl std::fmt::Debug for ScrollSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("ScrollSource")
            .field("offset", &state.offset)
            .field("observers", &state.observers.len())
            .field("pending_resettle", &state.pending_resettle)
            .finish()
    }
}

impl ScrollSource {
    /// Creates a new source at offset 0, without observers.
    pub fn new() -> Self {
        ScrollSource {
            state: Arc::new(Mutex::new(State {
                offset: 0,
                viewport_origin: 0,
                pending_resettle: false,
                observers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Registers an observer.
    ///
    /// Registering the same observer twice is allowed, it will then be
    /// notified twice. Only a weak reference is kept.
    pub fn register_observer<O>(&self, observer: &Arc<Mutex<O>>) -> ObserverId
    where
        O: ScrollObserver + 'static,
    {
        let observer: Arc<Mutex<dyn ScrollObserver>> = observer.clone();

        let mut state = lock(&self.state);
        let id = ObserverId(state.next_id);
        state.next_id += 1;
        state.observers.push(Entry {
            id,
            observer: Arc::downgrade(&observer),
        });

        debug!("Registered scroll observer {:?}", id);
        id
    }

    /// Removes a registration.
    ///
    /// Returns `false` if `id` was not registered.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut state = lock(&self.state);
        let before = state.observers.len();
        state.observers.retain(|entry| entry.id != id);

        let removed = state.observers.len() != before;
        if removed {
            debug!("Unregistered scroll observer {:?}", id);
        }
        removed
    }

    /// Number of registered observers still alive.
    pub fn observer_count(&self) -> usize {
        lock(&self.state)
            .observers
            .iter()
            .filter(|entry| entry.observer.strong_count() > 0)
            .count()
    }

    /// Current vertical offset.
    pub fn offset(&self) -> ScrollOffset {
        lock(&self.state).offset
    }

    /// Records a new offset and notifies every observer.
    pub fn scroll_to(&self, offset: ScrollOffset) {
        lock(&self.state).offset = offset;
        self.broadcast(ViewportEvent::scrolled(offset));
    }

    /// Asks for the current offset to be re-sent once.
    ///
    /// Hosts call this when the viewport is resized, then
    /// [`flush_resettle`](ScrollSource::flush_resettle) once the following
    /// layout pass is done, because geometry is not final before that.
    pub fn request_resettle(&self) {
        lock(&self.state).pending_resettle = true;
    }

    /// Returns `true` if a resettle was requested and not yet delivered.
    pub fn has_pending_resettle(&self) -> bool {
        lock(&self.state).pending_resettle
    }

    /// Delivers a pending resettle, if any.
    ///
    /// Returns `true` if observers were notified.
    pub fn flush_resettle(&self) -> bool {
        let offset = {
            let mut state = lock(&self.state);
            if !std::mem::take(&mut state.pending_resettle) {
                return false;
            }
            state.offset
        };

        debug!("Re-settling observers at {}", offset);
        self.broadcast(ViewportEvent::resized(offset));
        true
    }

    /// Records the host row where the viewport top was drawn.
    pub fn set_viewport_origin(&self, row: i32) {
        lock(&self.state).viewport_origin = row;
    }

    /// Host row where the viewport top was last drawn.
    pub fn viewport_origin(&self) -> i32 {
        lock(&self.state).viewport_origin
    }

    /// Converts the row where some content was drawn into a document position.
    ///
    /// `drawn_at` is the host row of the content's own top edge, which may be
    /// above the viewport if the content is partially scrolled out.
    pub fn document_top(&self, drawn_at: i32) -> i32 {
        let state = lock(&self.state);
        drawn_at
            .saturating_sub(state.viewport_origin)
            .saturating_add(state.offset)
    }

    /// Walks up an ancestor chain and returns the first scroll source.
    ///
    /// This is for hosts that only know a region's parents at attach time.
    /// Returns `NoScrollSourceAncestor` if the chain has no scroll source.
    pub fn nearest<'a, A, I>(ancestors: I, region: &str) -> Result<&'a ScrollSource, Error>
    where
        A: Ancestor + ?Sized + 'a,
        I: IntoIterator<Item = &'a A>,
    {
        ancestors
            .into_iter()
            .find_map(|ancestor| ancestor.scroll_source())
            .ok_or_else(|| Error::NoScrollSourceAncestor {
                region: region.to_string(),
            })
    }

    fn broadcast(&self, event: ViewportEvent) {
        // Collect first, so observers are not called with the source locked.
        let observers: Vec<_> = {
            let mut state = lock(&self.state);
            state
                .observers
                .retain(|entry| entry.observer.strong_count() > 0);
            state
                .observers
                .iter()
                .filter_map(|entry| entry.observer.upgrade())
                .collect()
        };

        trace!("Broadcasting {:?} to {} observers", event, observers.len());
        for observer in observers {
            lock(&observer).on_viewport_event(event);
        }
    }
}

/// Element of an ancestor chain, as seen from a region.
pub trait Ancestor {
    /// Returns the scroll source this ancestor provides, if any.
    fn scroll_source(&self) -> Option<&ScrollSource>;
}

impl Ancestor for ScrollSource {
    fn scroll_source(&self) -> Option<&ScrollSource> {
        Some(self)
    }
}

impl<T: Ancestor> Ancestor for Option<T> {
    fn scroll_source(&self) -> Option<&ScrollSource> {
        self.as_ref().and_then(|ancestor| ancestor.scroll_source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Bounds, Measured};
    use crate::region::SyncRegion;
    use crate::Gravity;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<ViewportEvent>,
    }

    impl ScrollObserver for Recorder {
        fn on_viewport_event(&mut self, event: ViewportEvent) {
            self.seen.push(event);
        }
    }

    // Records the order in which observers are called.
    struct Tagged {
        tag: usize,
        log: Arc<Mutex<Vec<(usize, ScrollOffset)>>>,
    }

    impl ScrollObserver for Tagged {
        fn on_viewport_event(&mut self, event: ViewportEvent) {
            self.log.lock().unwrap().push((self.tag, event.offset));
        }
    }

    fn offsets(recorder: &Arc<Mutex<Recorder>>) -> Vec<ScrollOffset> {
        recorder.lock().unwrap().seen.iter().map(|e| e.offset).collect()
    }

    #[test]
    fn notifies_in_registration_order() {
        let source = ScrollSource::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let observers: Vec<_> = (0..3)
            .map(|tag| {
                Arc::new(Mutex::new(Tagged {
                    tag,
                    log: Arc::clone(&log),
                }))
            })
            .collect();
        for observer in &observers {
            source.register_observer(observer);
        }

        source.scroll_to(4);
        source.scroll_to(9);

        assert_eq!(
            *log.lock().unwrap(),
            vec![(0, 4), (1, 4), (2, 4), (0, 9), (1, 9), (2, 9)]
        );
    }

    #[test]
    fn duplicates_are_notified_twice() {
        let source = ScrollSource::new();
        let recorder = Arc::new(Mutex::new(Recorder::default()));

        source.register_observer(&recorder);
        source.register_observer(&recorder);
        source.scroll_to(12);

        assert_eq!(offsets(&recorder), vec![12, 12]);
        assert_eq!(source.observer_count(), 2);
    }

    #[test]
    fn unregister_stops_notifications() {
        let source = ScrollSource::new();
        let recorder = Arc::new(Mutex::new(Recorder::default()));

        let id = source.register_observer(&recorder);
        source.scroll_to(1);
        assert!(source.unregister(id));
        assert!(!source.unregister(id));
        source.scroll_to(2);

        assert_eq!(offsets(&recorder), vec![1]);
    }

    #[test]
    fn dropped_observers_are_pruned() {
        let source = ScrollSource::new();
        let kept = Arc::new(Mutex::new(Recorder::default()));
        let dropped = Arc::new(Mutex::new(Recorder::default()));

        source.register_observer(&kept);
        source.register_observer(&dropped);
        assert_eq!(source.observer_count(), 2);

        drop(dropped);
        assert_eq!(source.observer_count(), 1);

        source.scroll_to(3);
        assert_eq!(offsets(&kept), vec![3]);
        assert_eq!(lock(&source.state).observers.len(), 1);
    }

    #[test]
    fn resettle_fires_once_with_current_offset() {
        let source = ScrollSource::new();
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        source.register_observer(&recorder);

        assert!(!source.flush_resettle());

        source.scroll_to(30);
        source.request_resettle();
        assert!(source.has_pending_resettle());
        assert!(source.flush_resettle());
        assert!(!source.flush_resettle());

        let seen = recorder.lock().unwrap().seen.clone();
        assert_eq!(
            seen,
            vec![ViewportEvent::scrolled(30), ViewportEvent::resized(30)]
        );
    }

    #[test]
    fn regions_are_independent() {
        let source = ScrollSource::new();

        let upper = Arc::new(Mutex::new(SyncRegion::new("upper", Gravity::Start)));
        let lower = Arc::new(Mutex::new(SyncRegion::new("lower", Gravity::Start)));
        source.register_observer(&upper);
        source.register_observer(&lower);

        upper
            .lock()
            .unwrap()
            .on_layout(Bounds::new(0, 0, 80, 500), 10, 0, Measured::new(80, 5));
        lower
            .lock()
            .unwrap()
            .on_layout(Bounds::new(0, 500, 80, 500), 50, 0, Measured::new(80, 5));

        source.scroll_to(200);
        assert_eq!(upper.lock().unwrap().floating_top(), 200);
        assert_eq!(lower.lock().unwrap().floating_top(), 50);

        source.scroll_to(700);
        assert_eq!(upper.lock().unwrap().floating_top(), 495);
        assert_eq!(lower.lock().unwrap().floating_top(), 200);

        // Re-settling after a resize keeps everything in place.
        source.request_resettle();
        source.flush_resettle();
        assert_eq!(upper.lock().unwrap().floating_top(), 495);
        assert_eq!(lower.lock().unwrap().floating_top(), 200);
    }

    #[test]
    fn document_top_from_drawn_row() {
        let source = ScrollSource::new();
        source.set_viewport_origin(4);
        source.scroll_to(0);
        assert_eq!(source.document_top(10), 6);

        // Scrolling moves content up on screen, not in the document.
        source.scroll_to(5);
        assert_eq!(source.document_top(5), 6);
        assert_eq!(source.document_top(-1), 0);

        source.set_viewport_origin(i32::MIN);
        assert_eq!(source.document_top(i32::MAX), i32::MAX);
    }

    #[test]
    fn nearest_ancestor() {
        let source = ScrollSource::new();
        source.scroll_to(7);

        let chain = [None, None, Some(source.clone()), None];
        let found = ScrollSource::nearest(chain.iter(), "region").unwrap();
        assert_eq!(found.offset(), 7);

        let orphan: [Option<ScrollSource>; 2] = [None, None];
        match ScrollSource::nearest(orphan.iter(), "orphan") {
            Err(Error::NoScrollSourceAncestor { region }) => assert_eq!(region, "orphan"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
