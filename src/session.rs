//! Transient per-gesture tracking state.

use std::time::{Duration, Instant};

use flick_commands::TargetContext;
use flick_pattern::{PatternBuilder, Point};

/// Identifies one gesture performance: the origin frame plus a monotonic
/// serial, so messages belonging to a superseded session can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId {
    pub frame_id: u32,
    pub serial: u64,
}

/// Lifecycle of a session.
///
/// `Ending` and `Aborting` are terminal: the session is destroyed right
/// after entering either, and anything that arrives later for it is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Trigger is down; no qualifying movement yet.
    Registering,
    /// Movement arrived; the pattern is being built.
    Tracking,
    /// The trigger was released; the authoritative match ran.
    Ending,
    /// Cancelled without a match or dispatch.
    Aborting,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Ending | SessionState::Aborting)
    }
}

/// The single mutable entity the coordinator owns. Lives strictly within one
/// gesture's wall-clock duration; never persisted.
#[derive(Debug)]
pub(crate) struct GestureSession {
    pub id: SessionId,
    pub state: SessionState,
    pub origin: Point,
    pub target: TargetContext,
    pub builder: PatternBuilder,
    /// When the session is considered abandoned; refreshed by activity.
    pub deadline: Option<Instant>,
}

impl GestureSession {
    pub fn new(
        id: SessionId,
        origin: Point,
        target: TargetContext,
        distance_threshold: f64,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            id,
            state: SessionState::Registering,
            origin,
            target,
            builder: PatternBuilder::new(distance_threshold, origin),
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }

    /// Push the abandonment deadline out; called on every message that
    /// touches the session.
    pub fn touch(&mut self, timeout: Option<Duration>) {
        self.deadline = timeout.map(|t| Instant::now() + t);
    }
}
