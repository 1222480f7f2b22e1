//! Wire types relayed between frame contexts and the coordinator.
//!
//! Frames and the coordinating context share no memory; everything crosses
//! the boundary as one of these serializable messages. Subjects are tagged
//! so hosts can route them over whatever structured channel they have.

use flick_commands::TargetContext;
use flick_pattern::{Pattern, Point};
use serde::{Deserialize, Serialize};

/// Message sent from a frame controller toward the coordinating context.
///
/// Messages from the same frame arrive in send order; messages from
/// different frames carry no ordering guarantee relative to each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subject", rename_all = "lowercase")]
pub enum FrameMessage {
    /// A qualifying pointer-down happened in the frame.
    Register {
        frame_id: u32,
        target: TargetContext,
        x: f64,
        y: f64,
    },

    /// Coalesced pointer samples while the trigger is held.
    Update { frame_id: u32, points: Vec<Point> },

    /// The trigger button was released.
    End { frame_id: u32, x: f64, y: f64 },
}

impl FrameMessage {
    /// Frame the message originated in.
    pub fn frame_id(&self) -> u32 {
        match self {
            FrameMessage::Register { frame_id, .. }
            | FrameMessage::Update { frame_id, .. }
            | FrameMessage::End { frame_id, .. } => *frame_id,
        }
    }
}

/// Summary of the winning gesture attached to an end event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedGesture {
    /// Index into the gesture library, in registration order.
    pub index: usize,
    pub label: String,
    /// Dissimilarity score the gesture won with; `0` is an exact match.
    pub score: f64,
}

/// Lifecycle event emitted by the coordinator for external collaborators
/// (trace overlay, feedback UI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subject", rename_all = "lowercase")]
pub enum GestureEvent {
    /// Tracking started; carries the origin point for the trace overlay.
    Start { x: f64, y: f64 },

    /// A new direction was committed to the live pattern. The provisional
    /// label is the current best guess, for interactive feedback in the
    /// originating frame.
    Change {
        pattern: Pattern,
        provisional_label: Option<String>,
    },

    /// The gesture finished: the final pattern, the authoritative match (if
    /// any) and the target it was performed over.
    End {
        pattern: Pattern,
        matched: Option<MatchedGesture>,
        context: TargetContext,
    },
}

/// Receives coordinator lifecycle events.
///
/// Implementations must not block; the coordinator calls this inline while
/// processing a message.
pub trait GestureEventSink: Send + Sync {
    fn dispatch(&self, event: GestureEvent);
}

/// Forward events into a channel; the receiver side belongs to whatever UI
/// collaborator consumes them. A closed channel drops events silently.
impl GestureEventSink for tokio::sync::mpsc::UnboundedSender<GestureEvent> {
    fn dispatch(&self, event: GestureEvent) {
        let _ = self.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_wire_format() {
        let message = FrameMessage::Register {
            frame_id: 3,
            target: TargetContext::default(),
            x: 120.0,
            y: 48.5,
        };
        let json = serde_json::to_string(&message).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["subject"], "register");
        assert_eq!(parsed["frame_id"], 3);
        assert_eq!(parsed["x"], 120.0);

        let back: FrameMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn test_update_round_trip() {
        let message = FrameMessage::Update {
            frame_id: 1,
            points: vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
        };
        let json = serde_json::to_string(&message).unwrap();
        let back: FrameMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
        assert_eq!(back.frame_id(), 1);
    }

    #[test]
    fn test_end_event_carries_match() {
        let event = GestureEvent::End {
            pattern: Pattern::new(),
            matched: Some(MatchedGesture {
                index: 0,
                label: "close tab".to_string(),
                score: 0.04,
            }),
            context: TargetContext::default(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["subject"], "end");
        assert_eq!(parsed["matched"]["label"], "close tab");
    }
}
