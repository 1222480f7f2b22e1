//! Per-frame pointer capture.
//!
//! One controller runs in every frame of the page, including nested
//! cross-origin frames. It filters raw pointer events through the configured
//! trigger button and suppression key and relays the qualifying ones toward
//! the coordinating context; it never builds pattern state itself, the
//! coordinator owns that. The coordinating frame's controller uses the
//! engine's in-process sender, child frames use whatever bridge the host
//! provides; the controller does not care which.

use flick_commands::TargetContext;
use flick_config::{MouseButton, SuppressionKey};
use flick_pattern::Point;
use serde::{Deserialize, Serialize};

use crate::protocol::FrameMessage;

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

/// Whether the configured suppression key is held in a set of modifiers.
fn suppression_key_held(key: SuppressionKey, modifiers: &Modifiers) -> bool {
    match key {
        SuppressionKey::None => false,
        SuppressionKey::Alt => modifiers.alt,
        SuppressionKey::Ctrl => modifiers.ctrl,
        SuppressionKey::Shift => modifiers.shift,
        SuppressionKey::Meta => modifiers.meta,
    }
}

/// A raw pointer event as delivered by the host's input layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    ButtonDown {
        button: MouseButton,
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        target: TargetContext,
    },
    /// Coalesced movement samples; hosts without event coalescing send a
    /// single-sample batch.
    Move { points: Vec<Point> },
    ButtonUp { button: MouseButton, x: f64, y: f64 },
    /// The frame's document became hidden (tab switch, navigation away).
    VisibilityHidden,
}

/// Sends frame messages toward the coordinating context.
pub trait FrameRelay: Send {
    fn relay(&self, message: FrameMessage);
}

/// In-process relay: the coordinating frame feeds the engine directly.
impl FrameRelay for tokio::sync::mpsc::UnboundedSender<FrameMessage> {
    fn relay(&self, message: FrameMessage) {
        let _ = self.send(message);
    }
}

/// Captures and filters pointer events for one frame.
pub struct FrameController {
    frame_id: u32,
    trigger_button: MouseButton,
    suppression_key: SuppressionKey,
    relay: Box<dyn FrameRelay>,
    enabled: bool,
    /// The trigger button is currently held after a qualifying down.
    active: bool,
    suppress_context_menu: bool,
    suppress_click: bool,
}

impl FrameController {
    pub fn new(
        frame_id: u32,
        trigger_button: MouseButton,
        suppression_key: SuppressionKey,
        relay: Box<dyn FrameRelay>,
    ) -> Self {
        Self {
            frame_id,
            trigger_button,
            suppression_key,
            relay,
            enabled: false,
            active: false,
            suppress_context_menu: false,
            suppress_click: false,
        }
    }

    /// Install capture. Idempotent.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        log::debug!("frame {} capture enabled", self.frame_id);
    }

    /// Remove capture and forget any in-progress trigger. Idempotent.
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        self.active = false;
        log::debug!("frame {} capture disabled", self.frame_id);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Feed one raw pointer event through the trigger/suppression filter.
    pub fn handle_event(&mut self, event: PointerEvent) {
        if !self.enabled {
            return;
        }
        match event {
            PointerEvent::ButtonDown {
                button,
                x,
                y,
                modifiers,
                target,
            } => self.on_button_down(button, x, y, modifiers, target),
            PointerEvent::Move { points } => self.on_move(points),
            PointerEvent::ButtonUp { button, x, y } => self.on_button_up(button, x, y),
            PointerEvent::VisibilityHidden => self.on_visibility_hidden(),
        }
    }

    /// Default drag and text-selection behavior must stay suppressed while a
    /// stroke is in progress.
    pub fn should_suppress_drag(&self) -> bool {
        self.active
    }

    /// Whether the next native context menu should be suppressed. Reading
    /// the decision resets it.
    pub fn take_context_menu_suppression(&mut self) -> bool {
        std::mem::take(&mut self.suppress_context_menu)
    }

    /// Whether the next click should be suppressed. Reading the decision
    /// resets it.
    pub fn take_click_suppression(&mut self) -> bool {
        std::mem::take(&mut self.suppress_click)
    }

    fn on_button_down(
        &mut self,
        button: MouseButton,
        x: f64,
        y: f64,
        modifiers: Modifiers,
        target: TargetContext,
    ) {
        if button != self.trigger_button {
            return;
        }
        if suppression_key_held(self.suppression_key, &modifiers) {
            log::trace!("frame {}: suppression key held, trigger ignored", self.frame_id);
            return;
        }
        self.active = true;
        self.relay.relay(FrameMessage::Register {
            frame_id: self.frame_id,
            target,
            x,
            y,
        });
    }

    fn on_move(&mut self, points: Vec<Point>) {
        if !self.active || points.is_empty() {
            return;
        }
        self.relay.relay(FrameMessage::Update {
            frame_id: self.frame_id,
            points,
        });
    }

    fn on_button_up(&mut self, button: MouseButton, x: f64, y: f64) {
        if button != self.trigger_button {
            return;
        }
        // A release with no preceding down (focus was elsewhere) sends
        // nothing.
        if !self.active {
            return;
        }
        self.active = false;
        self.relay.relay(FrameMessage::End {
            frame_id: self.frame_id,
            x,
            y,
        });
    }

    fn on_visibility_hidden(&mut self) {
        if !self.active {
            return;
        }
        // The stroke moved to another tab or the frame is going away; the
        // next menu/click decision defaults to "suppress" so a stray native
        // context menu or click cannot fire after the fact.
        self.active = false;
        self.suppress_context_menu = true;
        self.suppress_click = true;
        log::debug!(
            "frame {} hidden mid-stroke, next menu/click suppressed",
            self.frame_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CollectingRelay(Arc<Mutex<Vec<FrameMessage>>>);

    impl FrameRelay for CollectingRelay {
        fn relay(&self, message: FrameMessage) {
            self.0.lock().push(message);
        }
    }

    fn controller(relay: CollectingRelay) -> FrameController {
        let mut controller = FrameController::new(
            4,
            MouseButton::Right,
            SuppressionKey::Alt,
            Box::new(relay),
        );
        controller.enable();
        controller
    }

    fn down(button: MouseButton) -> PointerEvent {
        PointerEvent::ButtonDown {
            button,
            x: 10.0,
            y: 20.0,
            modifiers: Modifiers::default(),
            target: TargetContext::default(),
        }
    }

    #[test]
    fn test_trigger_down_sends_register() {
        let relay = CollectingRelay::default();
        let mut controller = controller(relay.clone());

        controller.handle_event(down(MouseButton::Right));

        let sent = relay.0.lock();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            FrameMessage::Register { frame_id, x, y, .. } => {
                assert_eq!(*frame_id, 4);
                assert_eq!((*x, *y), (10.0, 20.0));
            }
            other => panic!("expected register, got {other:?}"),
        }
        assert!(controller.should_suppress_drag());
    }

    #[test]
    fn test_non_trigger_button_is_ignored() {
        let relay = CollectingRelay::default();
        let mut controller = controller(relay.clone());

        controller.handle_event(down(MouseButton::Left));
        controller.handle_event(PointerEvent::Move {
            points: vec![Point::new(50.0, 50.0)],
        });

        assert!(relay.0.lock().is_empty());
        assert!(!controller.should_suppress_drag());
    }

    #[test]
    fn test_suppression_key_blocks_capture() {
        let relay = CollectingRelay::default();
        let mut controller = controller(relay.clone());

        controller.handle_event(PointerEvent::ButtonDown {
            button: MouseButton::Right,
            x: 0.0,
            y: 0.0,
            modifiers: Modifiers {
                alt: true,
                ..Modifiers::default()
            },
            target: TargetContext::default(),
        });

        assert!(relay.0.lock().is_empty());
    }

    #[test]
    fn test_moves_relay_only_while_active() {
        let relay = CollectingRelay::default();
        let mut controller = controller(relay.clone());

        // Moves before the trigger are not relayed.
        controller.handle_event(PointerEvent::Move {
            points: vec![Point::new(1.0, 1.0)],
        });
        assert!(relay.0.lock().is_empty());

        controller.handle_event(down(MouseButton::Right));
        controller.handle_event(PointerEvent::Move {
            points: vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
        });

        let sent = relay.0.lock();
        assert_eq!(sent.len(), 2);
        match &sent[1] {
            FrameMessage::Update { points, .. } => assert_eq!(points.len(), 2),
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_release_without_down_sends_nothing() {
        let relay = CollectingRelay::default();
        let mut controller = controller(relay.clone());

        controller.handle_event(PointerEvent::ButtonUp {
            button: MouseButton::Right,
            x: 5.0,
            y: 5.0,
        });

        assert!(relay.0.lock().is_empty());
    }

    #[test]
    fn test_up_sends_end_and_deactivates() {
        let relay = CollectingRelay::default();
        let mut controller = controller(relay.clone());

        controller.handle_event(down(MouseButton::Right));
        controller.handle_event(PointerEvent::ButtonUp {
            button: MouseButton::Right,
            x: 30.0,
            y: 40.0,
        });

        let sent = relay.0.lock();
        assert!(matches!(sent.last(), Some(FrameMessage::End { .. })));
        drop(sent);
        assert!(!controller.should_suppress_drag());
    }

    #[test]
    fn test_visibility_loss_forces_suppression_default() {
        let relay = CollectingRelay::default();
        let mut controller = controller(relay.clone());

        controller.handle_event(down(MouseButton::Right));
        controller.handle_event(PointerEvent::VisibilityHidden);

        assert!(controller.take_context_menu_suppression());
        // Decide-and-reset: the second read is back to the default.
        assert!(!controller.take_context_menu_suppression());
        assert!(controller.take_click_suppression());
        assert!(!controller.take_click_suppression());
    }

    #[test]
    fn test_visibility_loss_while_idle_changes_nothing() {
        let relay = CollectingRelay::default();
        let mut controller = controller(relay.clone());

        controller.handle_event(PointerEvent::VisibilityHidden);
        assert!(!controller.take_context_menu_suppression());
    }

    #[test]
    fn test_enable_disable_idempotent() {
        let relay = CollectingRelay::default();
        let mut controller = controller(relay.clone());

        controller.enable();
        controller.enable();
        assert!(controller.is_enabled());

        controller.handle_event(down(MouseButton::Right));
        controller.disable();
        controller.disable();
        assert!(!controller.is_enabled());

        // Disabled controllers drop everything.
        controller.handle_event(PointerEvent::Move {
            points: vec![Point::new(9.0, 9.0)],
        });
        assert_eq!(relay.0.lock().len(), 1);
    }
}
