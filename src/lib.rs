//! Pointer-gesture recognition engine.
//!
//! A user holds a configured trigger button and draws a stroke; the engine
//! compresses it into a resolution-independent directional pattern, matches
//! it against a configured gesture library, and executes the winning
//! gesture's fallback command chain. Strokes may start in any of several
//! isolated input contexts ("frames") that share no memory with the
//! coordinating context; everything crosses as asynchronous messages.
//!
//! Crate layout follows the data flow:
//!
//! - [`frame`]: per-frame capture, trigger/suppression filtering, relay
//! - [`protocol`]: the messages frames and collaborators exchange
//! - [`coordinator`]: the per-context gesture lifecycle state machine
//! - [`library`]: registered gestures, built from `flick-config` entries
//! - [`engine`]: the coordinating task, from relay to command dispatch
//!
//! Pattern construction and matching live in the `flick-pattern` crate;
//! the command contract and kind catalog in `flick-commands`.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod coordinator;
pub mod engine;
pub mod frame;
pub mod library;
pub mod logging;
pub mod protocol;
pub mod replay;
pub mod session;

pub use coordinator::{CoordinatorSettings, GestureCoordinator};
pub use engine::{EngineHandle, GestureEngine};
pub use frame::{FrameController, FrameRelay, Modifiers, PointerEvent};
pub use library::{GestureDefinition, GestureLibrary};
pub use protocol::{FrameMessage, GestureEvent, GestureEventSink, MatchedGesture};
pub use session::{SessionId, SessionState};
