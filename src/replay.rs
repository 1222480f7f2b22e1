//! Trace replay: feed a recorded pointer-event log through the full
//! pipeline.
//!
//! A trace is JSON lines, one [`TraceRecord`] per line. Records are replayed
//! in file order through per-frame controllers wired to a real engine, so a
//! trace exercises exactly what live input would: filtering, relay, the
//! state machine, matching and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use flick_commands::{CommandRegistry, Permission};
use flick_config::Config;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::engine::GestureEngine;
use crate::frame::{FrameController, PointerEvent};
use crate::library::GestureLibrary;
use crate::protocol::GestureEvent;

/// One line of a trace: which frame saw the event, and the event itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Originating frame; 0 is the coordinating (top) frame.
    #[serde(default)]
    pub frame: u32,
    pub event: PointerEvent,
}

/// Everything the coordinator emitted during a replay, in order.
#[derive(Debug)]
pub struct ReplaySummary {
    pub events: Vec<GestureEvent>,
}

impl ReplaySummary {
    /// Labels of the gestures that matched, in replay order.
    pub fn matched_labels(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                GestureEvent::End {
                    matched: Some(m), ..
                } => Some(m.label.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Parse a JSON-lines trace file. Blank lines are skipped; a malformed line
/// aborts with its line number.
pub fn read_trace(path: &std::path::Path) -> anyhow::Result<Vec<TraceRecord>> {
    use anyhow::Context;

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading trace {}", path.display()))?;
    let mut records = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: TraceRecord = serde_json::from_str(line)
            .with_context(|| format!("trace line {}", number + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Replay records through a fresh engine built from `config`.
///
/// Returns once every record has been processed and the engine has drained.
pub async fn replay(
    config: &Config,
    granted: Vec<Permission>,
    records: impl IntoIterator<Item = TraceRecord>,
) -> ReplaySummary {
    let registry = CommandRegistry::with_builtin_kinds();
    let library = Arc::new(GestureLibrary::from_entries(&registry, &config.gestures));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (engine, handle) =
        GestureEngine::new(config.into(), library, granted, Arc::new(event_tx));
    let engine_task = tokio::spawn(engine.run());

    let mut controllers: HashMap<u32, FrameController> = HashMap::new();
    for record in records {
        let controller = controllers.entry(record.frame).or_insert_with(|| {
            let mut controller = FrameController::new(
                record.frame,
                config.trigger_button,
                config.suppression_key,
                handle.frame_relay(),
            );
            controller.enable();
            controller
        });
        controller.handle_event(record.event);
    }

    // Shutdown is queued behind every relayed message, so awaiting the task
    // means the engine has processed the whole trace.
    handle.shutdown();
    if let Err(e) = engine_task.await {
        log::error!("engine task failed: {e}");
    }

    let mut events = Vec::new();
    while let Ok(event) = event_rx.try_recv() {
        events.push(event);
    }
    ReplaySummary { events }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_config::MouseButton;

    #[test]
    fn test_trace_record_round_trip() {
        let record = TraceRecord {
            frame: 2,
            event: PointerEvent::ButtonUp {
                button: MouseButton::Right,
                x: 4.0,
                y: 5.0,
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: TraceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_frame_defaults_to_top() {
        let record: TraceRecord =
            serde_json::from_str(r#"{"event":{"kind":"visibility_hidden"}}"#).unwrap();
        assert_eq!(record.frame, 0);
    }
}
