//! Gesture lifecycle state machine.
//!
//! One coordinator owns the single authoritative session for a top-level
//! context. It consumes relayed frame messages in arrival order, feeds the
//! pattern builder, queries the matcher for live feedback, and emits
//! lifecycle events through a [`GestureEventSink`].
//!
//! Messages from different frames are not globally ordered, so two rules
//! compensate: `end` is authoritative and terminal no matter what arrives
//! after it, and any message addressed to a session that no longer exists
//! (superseded, cancelled or reaped) is dropped on the floor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use flick_commands::TargetContext;
use flick_pattern::{MatchingAlgorithm, Pattern, Point};

use crate::library::GestureLibrary;
use crate::protocol::{FrameMessage, GestureEvent, GestureEventSink, MatchedGesture};
use crate::session::{GestureSession, SessionId, SessionState};

/// The slice of configuration the coordinator consumes read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorSettings {
    pub distance_threshold: f64,
    pub deviation_tolerance: f64,
    pub matching_algorithm: MatchingAlgorithm,
    /// Reap an inactive session after this long. `None` disables reaping.
    pub session_timeout: Option<Duration>,
}

/// A finished, matched gesture the engine should execute.
#[derive(Debug)]
pub struct Dispatch {
    /// Index of the winning definition in the library.
    pub index: usize,
    pub pattern: Pattern,
    pub context: TargetContext,
    pub origin: Point,
}

pub struct GestureCoordinator {
    settings: CoordinatorSettings,
    library: Arc<GestureLibrary>,
    sink: Arc<dyn GestureEventSink>,
    session: Option<GestureSession>,
    next_serial: u64,
}

impl GestureCoordinator {
    pub fn new(
        settings: CoordinatorSettings,
        library: Arc<GestureLibrary>,
        sink: Arc<dyn GestureEventSink>,
    ) -> Self {
        Self {
            settings,
            library,
            sink,
            session: None,
            next_serial: 0,
        }
    }

    /// Swap in a replacement library. The active session, if any, keeps
    /// building its pattern; only lookups from now on see the new library.
    pub fn replace_library(&mut self, library: Arc<GestureLibrary>) {
        self.library = library;
    }

    /// Swap in replacement settings. They apply from the next session; the
    /// active one keeps the threshold it started with.
    pub fn replace_settings(&mut self, settings: CoordinatorSettings) {
        self.settings = settings;
    }

    /// Process one relayed frame message. Returns a [`Dispatch`] when the
    /// message ended a gesture that matched a registered definition.
    pub fn handle_message(&mut self, message: FrameMessage) -> Option<Dispatch> {
        match message {
            FrameMessage::Register {
                frame_id,
                target,
                x,
                y,
            } => {
                self.on_register(frame_id, target, Point::new(x, y));
                None
            }
            FrameMessage::Update { frame_id, points } => {
                self.on_update(frame_id, &points);
                None
            }
            FrameMessage::End { frame_id, x, y } => self.on_end(frame_id, Point::new(x, y)),
        }
    }

    /// Cooperative cancellation (a competing wheel or rocker input fired).
    ///
    /// Callable in any state and idempotent: the session, if one exists,
    /// goes terminal immediately, no end event is emitted and nothing is
    /// dispatched.
    pub fn cancel(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.state = SessionState::Aborting;
            log::debug!("session {:?} aborted", session.id);
        }
    }

    /// Deadline of the active session, for the engine's timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.as_ref().and_then(|s| s.deadline)
    }

    /// Reap the active session if its deadline has passed (the origin frame
    /// navigated away and will never send `end`). Returns whether a session
    /// was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .session
            .as_ref()
            .and_then(|s| s.deadline)
            .is_some_and(|deadline| deadline <= now);
        if expired {
            if let Some(session) = self.session.take() {
                log::warn!("session {:?} abandoned, reaping", session.id);
            }
        }
        expired
    }

    fn on_register(&mut self, frame_id: u32, target: TargetContext, origin: Point) {
        // At most one session per top-level context: a register that races
        // an active session is ignored, not an error.
        if let Some(session) = &self.session {
            log::debug!(
                "ignoring register from frame {frame_id}: session {:?} is active",
                session.id
            );
            return;
        }

        self.next_serial += 1;
        let id = SessionId {
            frame_id,
            serial: self.next_serial,
        };
        log::debug!("session {id:?} registering at ({}, {})", origin.x, origin.y);
        self.session = Some(GestureSession::new(
            id,
            origin,
            target,
            self.settings.distance_threshold,
            self.settings.session_timeout,
        ));
    }

    fn on_update(&mut self, frame_id: u32, points: &[Point]) {
        let timeout = self.settings.session_timeout;
        let Some(session) = self.session.as_mut() else {
            log::trace!("dropping update from frame {frame_id}: no session");
            return;
        };
        if session.id.frame_id != frame_id {
            log::trace!(
                "dropping update from frame {frame_id}: session belongs to frame {}",
                session.id.frame_id
            );
            return;
        }

        // The first qualifying move promotes the session to Tracking.
        if session.state == SessionState::Registering {
            session.state = SessionState::Tracking;
            let origin = session.origin;
            self.sink.dispatch(GestureEvent::Start {
                x: origin.x,
                y: origin.y,
            });
        }

        let appended = session.builder.feed_all(points);
        session.touch(timeout);

        if appended {
            let pattern = session.builder.pattern();
            let provisional_label = self
                .library
                .closest(
                    &pattern,
                    self.settings.deviation_tolerance,
                    self.settings.matching_algorithm,
                )
                .and_then(|m| self.library.get(m.index))
                .map(|definition| definition.display_label().to_string());
            self.sink.dispatch(GestureEvent::Change {
                pattern,
                provisional_label,
            });
        }
    }

    fn on_end(&mut self, frame_id: u32, point: Point) -> Option<Dispatch> {
        match &self.session {
            None => {
                log::trace!("dropping end from frame {frame_id}: no session");
                return None;
            }
            Some(session) if session.id.frame_id != frame_id => {
                log::trace!(
                    "dropping end from frame {frame_id}: session belongs to frame {}",
                    session.id.frame_id
                );
                return None;
            }
            Some(_) => {}
        }

        // End is authoritative: the session is destroyed here, so late
        // updates racing in from other frames find nothing.
        let mut session = self.session.take()?;
        session.state = SessionState::Ending;
        session.builder.feed(point);
        let pattern = session.builder.finish();

        let matched = self.library.closest(
            &pattern,
            self.settings.deviation_tolerance,
            self.settings.matching_algorithm,
        );
        let summary = matched.and_then(|m| {
            self.library.get(m.index).map(|definition| MatchedGesture {
                index: m.index,
                label: definition.display_label().to_string(),
                score: m.score,
            })
        });
        log::debug!(
            "session {:?} ended: {} vectors, match {:?}",
            session.id,
            pattern.len(),
            summary.as_ref().map(|m| m.label.as_str())
        );

        self.sink.dispatch(GestureEvent::End {
            pattern: pattern.clone(),
            matched: summary.clone(),
            context: session.target.clone(),
        });

        summary.map(|m| Dispatch {
            index: m.index,
            pattern,
            context: session.target,
            origin: session.origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_commands::CommandRegistry;
    use flick_config::{CommandSpec, GestureEntry};
    use flick_pattern::PatternVector;
    use parking_lot::Mutex;

    struct CollectingSink(Mutex<Vec<GestureEvent>>);

    impl CollectingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Vec::new())))
        }

        fn events(&self) -> Vec<GestureEvent> {
            self.0.lock().clone()
        }
    }

    impl GestureEventSink for CollectingSink {
        fn dispatch(&self, event: GestureEvent) {
            self.0.lock().push(event);
        }
    }

    fn settings() -> CoordinatorSettings {
        CoordinatorSettings {
            distance_threshold: 10.0,
            deviation_tolerance: 0.15,
            matching_algorithm: MatchingAlgorithm::Combined,
            session_timeout: None,
        }
    }

    fn library_with_up_gesture() -> Arc<GestureLibrary> {
        let registry = CommandRegistry::with_builtin_kinds();
        let entries = vec![GestureEntry {
            pattern: Pattern::from_vectors(vec![PatternVector::new(0.0, -1.0)]),
            commands: vec![CommandSpec::new("noop")],
            label: Some("scroll up".to_string()),
        }];
        Arc::new(GestureLibrary::from_entries(&registry, &entries))
    }

    fn coordinator(sink: Arc<CollectingSink>) -> GestureCoordinator {
        GestureCoordinator::new(settings(), library_with_up_gesture(), sink)
    }

    fn register(frame_id: u32) -> FrameMessage {
        FrameMessage::Register {
            frame_id,
            target: TargetContext::default(),
            x: 100.0,
            y: 100.0,
        }
    }

    fn update(frame_id: u32, points: &[(f64, f64)]) -> FrameMessage {
        FrameMessage::Update {
            frame_id,
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    #[test]
    fn test_full_lifecycle_dispatches_matching_gesture() {
        let sink = CollectingSink::new();
        let mut coordinator = coordinator(Arc::clone(&sink));

        assert!(coordinator.handle_message(register(0)).is_none());
        assert!(
            coordinator
                .handle_message(update(0, &[(100.0, 60.0), (100.0, 20.0)]))
                .is_none()
        );
        let dispatch = coordinator
            .handle_message(FrameMessage::End {
                frame_id: 0,
                x: 100.0,
                y: 10.0,
            })
            .expect("upward stroke should dispatch");
        assert_eq!(dispatch.index, 0);

        let events = sink.events();
        match &events[0] {
            GestureEvent::Start { x, y } => {
                assert_eq!(*x, 100.0);
                assert_eq!(*y, 100.0);
            }
            other => panic!("expected start event, got {other:?}"),
        }
        assert!(matches!(events[1], GestureEvent::Change { .. }));
        match events.last().unwrap() {
            GestureEvent::End { matched, .. } => {
                assert_eq!(matched.as_ref().unwrap().label, "scroll up");
            }
            other => panic!("expected end event, got {other:?}"),
        }
    }

    #[test]
    fn test_change_carries_provisional_label() {
        let sink = CollectingSink::new();
        let mut coordinator = coordinator(Arc::clone(&sink));

        coordinator.handle_message(register(0));
        coordinator.handle_message(update(0, &[(100.0, 40.0)]));

        let events = sink.events();
        match &events[1] {
            GestureEvent::Change {
                provisional_label, ..
            } => assert_eq!(provisional_label.as_deref(), Some("scroll up")),
            other => panic!("expected change event, got {other:?}"),
        }
    }

    #[test]
    fn test_stale_update_after_end_is_discarded() {
        let sink = CollectingSink::new();
        let mut coordinator = coordinator(Arc::clone(&sink));

        coordinator.handle_message(register(3));
        coordinator.handle_message(FrameMessage::End {
            frame_id: 3,
            x: 0.0,
            y: 0.0,
        });
        let events_after_end = sink.events().len();

        // Out-of-order leftover from frame 3 arrives after destruction.
        coordinator.handle_message(update(3, &[(50.0, 50.0)]));
        assert_eq!(sink.events().len(), events_after_end);
        assert!(coordinator.next_deadline().is_none());
    }

    #[test]
    fn test_cancel_mid_tracking_emits_nothing_and_dispatches_nothing() {
        let sink = CollectingSink::new();
        let mut coordinator = coordinator(Arc::clone(&sink));

        coordinator.handle_message(register(0));
        coordinator.handle_message(update(0, &[(100.0, 40.0)]));
        let events_before = sink.events().len();

        coordinator.cancel();
        coordinator.cancel(); // idempotent

        assert_eq!(sink.events().len(), events_before);
        // The stroke's end now lands on a dead session.
        assert!(
            coordinator
                .handle_message(FrameMessage::End {
                    frame_id: 0,
                    x: 100.0,
                    y: 10.0,
                })
                .is_none()
        );
        assert_eq!(sink.events().len(), events_before);
    }

    #[test]
    fn test_duplicate_register_is_ignored() {
        let sink = CollectingSink::new();
        let mut coordinator = coordinator(Arc::clone(&sink));

        coordinator.handle_message(register(0));
        coordinator.handle_message(register(5));
        coordinator.handle_message(update(0, &[(100.0, 40.0)]));

        // The session still belongs to frame 0; frame 5 never took over.
        let dispatch = coordinator.handle_message(FrameMessage::End {
            frame_id: 0,
            x: 100.0,
            y: 10.0,
        });
        assert!(dispatch.is_some());
    }

    #[test]
    fn test_update_from_other_frame_is_dropped() {
        let sink = CollectingSink::new();
        let mut coordinator = coordinator(Arc::clone(&sink));

        coordinator.handle_message(register(0));
        coordinator.handle_message(update(7, &[(100.0, 40.0)]));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_end_without_movement_matches_nothing() {
        let sink = CollectingSink::new();
        let mut coordinator = coordinator(Arc::clone(&sink));

        coordinator.handle_message(register(0));
        let dispatch = coordinator.handle_message(FrameMessage::End {
            frame_id: 0,
            x: 100.0,
            y: 100.0,
        });
        assert!(dispatch.is_none());

        // No start/change ever fired; only the end event.
        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            GestureEvent::End { matched, pattern, .. } => {
                assert!(matched.is_none());
                assert!(pattern.is_empty());
            }
            other => panic!("expected end event, got {other:?}"),
        }
    }

    #[test]
    fn test_expired_session_is_reaped_and_superseded() {
        let sink = CollectingSink::new();
        let mut coordinator = GestureCoordinator::new(
            CoordinatorSettings {
                session_timeout: Some(Duration::from_millis(5)),
                ..settings()
            },
            library_with_up_gesture(),
            sink.clone(),
        );

        coordinator.handle_message(register(0));
        let deadline = coordinator.next_deadline().unwrap();
        assert!(coordinator.expire(deadline + Duration::from_millis(1)));
        assert!(coordinator.next_deadline().is_none());

        // A fresh register takes over cleanly.
        coordinator.handle_message(register(1));
        coordinator.handle_message(update(1, &[(100.0, 40.0)]));
        assert!(
            coordinator
                .handle_message(FrameMessage::End {
                    frame_id: 1,
                    x: 100.0,
                    y: 10.0,
                })
                .is_some()
        );
    }
}
