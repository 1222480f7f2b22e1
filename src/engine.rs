//! Engine wiring: the channel relay, the coordinator task and command
//! dispatch.
//!
//! The engine task is the coordinating context: it pulls one message at a
//! time off its channel, runs it to completion through the coordinator, and
//! awaits command chains inline. That single-consumer loop is what makes the
//! session single-writer without any locks. Library and settings swaps
//! travel over the same channel, so they are serialized with gesture traffic
//! instead of racing it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use flick_commands::{CommandContext, GestureData, Permission};
use flick_config::Config;
use tokio::sync::mpsc;

use crate::coordinator::{CoordinatorSettings, Dispatch, GestureCoordinator};
use crate::frame::FrameRelay;
use crate::library::GestureLibrary;
use crate::protocol::{FrameMessage, GestureEventSink};

/// Everything the engine accepts over its control channel.
#[derive(Debug)]
pub enum EngineMessage {
    Frame(FrameMessage),
    /// Cooperative cancellation of the in-progress gesture.
    Cancel,
    /// Swap the gesture library without restarting.
    ReplaceLibrary(Arc<GestureLibrary>),
    /// Swap the matcher/session settings without restarting.
    ReplaceSettings(CoordinatorSettings),
    Shutdown,
}

/// Cloneable handle for talking to a running engine.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineMessage>,
}

impl EngineHandle {
    /// A relay that frame controllers in the coordinating process use
    /// directly; cross-context frames reach the same channel through
    /// whatever bridge the host provides.
    pub fn frame_relay(&self) -> Box<dyn FrameRelay> {
        Box::new(HandleRelay {
            tx: self.tx.clone(),
        })
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(EngineMessage::Cancel);
    }

    pub fn replace_library(&self, library: Arc<GestureLibrary>) {
        let _ = self.tx.send(EngineMessage::ReplaceLibrary(library));
    }

    pub fn replace_settings(&self, settings: CoordinatorSettings) {
        let _ = self.tx.send(EngineMessage::ReplaceSettings(settings));
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(EngineMessage::Shutdown);
    }
}

struct HandleRelay {
    tx: mpsc::UnboundedSender<EngineMessage>,
}

impl FrameRelay for HandleRelay {
    fn relay(&self, message: FrameMessage) {
        let _ = self.tx.send(EngineMessage::Frame(message));
    }
}

impl From<&Config> for CoordinatorSettings {
    fn from(config: &Config) -> Self {
        Self {
            distance_threshold: config.distance_threshold,
            deviation_tolerance: config.deviation_tolerance,
            matching_algorithm: config.matching_algorithm,
            session_timeout: config.session_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// The coordinating context: coordinator plus command dispatch.
pub struct GestureEngine {
    coordinator: GestureCoordinator,
    library: Arc<GestureLibrary>,
    granted: Vec<Permission>,
    rx: mpsc::UnboundedReceiver<EngineMessage>,
}

impl GestureEngine {
    /// Build an engine and the handle used to feed it.
    pub fn new(
        settings: CoordinatorSettings,
        library: Arc<GestureLibrary>,
        granted: Vec<Permission>,
        sink: Arc<dyn GestureEventSink>,
    ) -> (Self, EngineHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = GestureCoordinator::new(settings, Arc::clone(&library), sink);
        (
            Self {
                coordinator,
                library,
                granted,
                rx,
            },
            EngineHandle { tx },
        )
    }

    /// Run until shutdown or until every handle is dropped.
    ///
    /// Messages are processed one at a time; the session timeout fires
    /// between messages when the origin frame went silent.
    pub async fn run(mut self) {
        loop {
            let message = match self.coordinator.next_deadline() {
                Some(deadline) => {
                    tokio::select! {
                        message = self.rx.recv() => message,
                        _ = tokio::time::sleep_until(deadline.into()) => {
                            self.coordinator.expire(Instant::now());
                            continue;
                        }
                    }
                }
                None => self.rx.recv().await,
            };
            let Some(message) = message else {
                log::debug!("all engine handles dropped, stopping");
                break;
            };
            match message {
                EngineMessage::Frame(frame_message) => {
                    if let Some(dispatch) = self.coordinator.handle_message(frame_message) {
                        self.dispatch(dispatch).await;
                    }
                }
                EngineMessage::Cancel => self.coordinator.cancel(),
                EngineMessage::ReplaceLibrary(library) => {
                    self.library = Arc::clone(&library);
                    self.coordinator.replace_library(library);
                }
                EngineMessage::ReplaceSettings(settings) => {
                    self.coordinator.replace_settings(settings);
                }
                EngineMessage::Shutdown => {
                    log::debug!("engine shutdown requested");
                    break;
                }
            }
        }
    }

    async fn dispatch(&self, dispatch: Dispatch) {
        let Some(definition) = self.library.get(dispatch.index) else {
            // The library was swapped between match and dispatch.
            log::warn!("matched gesture {} no longer in library", dispatch.index);
            return;
        };
        log::info!(
            "gesture '{}' matched, running its command chain",
            definition.display_label()
        );
        let ctx = CommandContext {
            target: dispatch.context,
            granted: self.granted.clone(),
        };
        let data = GestureData {
            pattern: dispatch.pattern,
            origin: dispatch.origin,
        };
        if !definition.stack().execute(&ctx, &data).await {
            log::info!(
                "no command in the '{}' chain reported success",
                definition.display_label()
            );
        }
    }
}
