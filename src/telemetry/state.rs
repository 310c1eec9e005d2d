use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::watch;

use crate::types::{Orientation, Sample};
use crate::window::SlidingWindow;

#[derive(Debug)]
struct Inner {
    orientation: Orientation,
    window: SlidingWindow,
    connected: bool,
    session: u64,
    revision: u64,
}

/// Consistent copy of the telemetry state handed to consumers.
#[derive(Debug, Clone)]
pub struct TelemetrySnapshot {
    pub orientation: Orientation,
    pub samples: Vec<Arc<Sample>>,
    pub connected: bool,
    pub revision: u64,
    pub capacity: usize,
}

impl TelemetrySnapshot {
    pub fn latest(&self) -> Option<&Arc<Sample>> {
        self.samples.last()
    }
}

/// Shared telemetry state: latest orientation, the sliding window and the
/// connectivity flag, always updated together under one write lock.
///
/// Only a [`SessionWriter`] obtained from [`TelemetryState::begin_session`]
/// can append samples, and only while its session is current. Ending the
/// session invalidates the writer, so a receive loop that is still draining
/// after a disconnect cannot touch the state anymore.
#[derive(Debug, Clone)]
pub struct TelemetryState {
    inner: Arc<RwLock<Inner>>,
    revisions: Arc<watch::Sender<u64>>,
}

impl TelemetryState {
    pub fn new(capacity: usize) -> Self {
        let (revisions, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(Inner {
                orientation: Orientation::default(),
                window: SlidingWindow::new(capacity),
                connected: false,
                session: 0,
                revision: 0,
            })),
            revisions: Arc::new(revisions),
        }
    }

    pub fn read(&self) -> TelemetrySnapshot {
        let inner = self.read_inner();
        TelemetrySnapshot {
            orientation: inner.orientation,
            samples: inner.window.snapshot(),
            connected: inner.connected,
            revision: inner.revision,
            capacity: inner.window.capacity(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.read_inner().orientation
    }

    pub fn is_connected(&self) -> bool {
        self.read_inner().connected
    }

    pub fn revision(&self) -> u64 {
        *self.revisions.borrow()
    }

    /// Receiver that changes on every state update.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revisions.subscribe()
    }

    /// Starts a new writer session, invalidating any previous writer.
    /// Buffered samples are kept until new ones push them out.
    pub fn begin_session(&self) -> SessionWriter {
        let mut inner = self.write_inner();
        inner.session += 1;
        SessionWriter {
            state: self.clone(),
            session: inner.session,
        }
    }

    /// Invalidates the current writer and clears the connectivity flag.
    pub fn end_session(&self) {
        let mut inner = self.write_inner();
        inner.session += 1;
        if inner.connected {
            inner.connected = false;
            self.publish(&mut inner);
        }
    }

    fn apply<F>(&self, session: u64, change: F) -> bool
    where
        F: FnOnce(&mut Inner),
    {
        let mut inner = self.write_inner();
        if inner.session != session {
            return false;
        }
        change(&mut inner);
        self.publish(&mut inner);
        true
    }

    fn publish(&self, inner: &mut Inner) {
        inner.revision += 1;
        self.revisions.send_replace(inner.revision);
    }

    // The guarded data is never left half-written by a panicking writer
    // (every mutation is a few field stores), so a poisoned lock is still usable.
    fn read_inner(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Write handle owned by one receive loop.
#[derive(Debug)]
pub struct SessionWriter {
    state: TelemetryState,
    session: u64,
}

impl SessionWriter {
    /// Appends the sample, mirrors its orientation and marks the state
    /// connected. Returns `false` if the session has already ended.
    pub fn update(&self, sample: Sample) -> bool {
        let sample = Arc::new(sample);
        self.state.apply(self.session, |inner| {
            inner.orientation = sample.orientation();
            inner.window.append(sample);
            inner.connected = true;
        })
    }

    pub fn mark_connected(&self) -> bool {
        self.state.apply(self.session, |inner| inner.connected = true)
    }

    /// Clears the connectivity flag if this session is still current.
    pub fn mark_disconnected(&self) -> bool {
        self.state.apply(self.session, |inner| inner.connected = false)
    }

    pub fn is_current(&self) -> bool {
        self.state.read_inner().session == self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Acceleration;

    fn sample(roll: f64, pitch: f64, yaw: f64) -> Sample {
        Sample::new(
            Orientation::new(roll, pitch, yaw),
            Acceleration::new(0.0, 0.0, 1.0),
            "2024-01-01 00:00:00.0000",
        )
    }

    #[test]
    fn starts_empty_and_disconnected() {
        let state = TelemetryState::new(50);
        let snapshot = state.read();
        assert_eq!(snapshot.orientation, Orientation::default());
        assert!(snapshot.samples.is_empty());
        assert!(!snapshot.connected);
        assert_eq!(snapshot.revision, 0);
    }

    #[test]
    fn update_mirrors_latest_orientation() {
        let state = TelemetryState::new(50);
        let writer = state.begin_session();
        for i in 0..60 {
            let f = i as f64;
            assert!(writer.update(sample(f, f * 2.0, -f)));
            let snapshot = state.read();
            assert_eq!(snapshot.orientation, Orientation::new(f, f * 2.0, -f));
            assert_eq!(snapshot.latest().map(|s| s.orientation()), Some(snapshot.orientation));
            assert!(snapshot.connected);
        }
        assert_eq!(state.read().samples.len(), 50);
    }

    #[test]
    fn ended_session_rejects_updates() {
        let state = TelemetryState::new(50);
        let writer = state.begin_session();
        writer.update(sample(1.0, 1.0, 1.0));
        state.end_session();

        let before = state.read();
        assert!(!before.connected);
        assert!(!writer.is_current());
        assert!(!writer.update(sample(9.0, 9.0, 9.0)));
        assert!(!writer.mark_connected());

        let after = state.read();
        assert_eq!(after.revision, before.revision);
        assert_eq!(after.orientation, Orientation::new(1.0, 1.0, 1.0));
        assert_eq!(after.samples.len(), 1);
    }

    #[test]
    fn new_session_keeps_stale_samples() {
        let state = TelemetryState::new(50);
        let first = state.begin_session();
        first.update(sample(0.5, 0.0, 0.0));
        first.mark_disconnected();

        let second = state.begin_session();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(state.read().samples.len(), 1);
        assert_eq!(state.orientation().roll, 0.5);
    }

    #[test]
    fn subscribers_see_each_revision() {
        let state = TelemetryState::new(50);
        let mut updates = state.subscribe();
        let writer = state.begin_session();
        writer.mark_connected();
        writer.update(sample(0.1, 0.2, 0.3));
        assert!(updates.has_changed().unwrap());
        assert_eq!(*updates.borrow_and_update(), 2);
        assert_eq!(state.revision(), 2);
    }

    #[test]
    fn readers_never_see_partial_updates() {
        let state = TelemetryState::new(50);
        let writer = state.begin_session();
        let reader = {
            let state = state.clone();
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    let snapshot = state.read();
                    if let Some(latest) = snapshot.latest() {
                        assert_eq!(latest.orientation(), snapshot.orientation);
                        assert!(snapshot.connected);
                    }
                }
            })
        };
        for i in 0..2_000 {
            let f = i as f64;
            writer.update(sample(f, -f, f * 0.5));
        }
        reader.join().unwrap();
    }
}
