use crossbeam_channel::{Receiver, Sender, unbounded};
use hovertip_core::{IconKind, LogicalTarget, Rect, Vec2, WindowHandle};
use serde::{Deserialize, Serialize};

pub mod telemetry;

/// Kinds of input the tooltip filter reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    MouseMove,
    MouseLeave,
    KeyDown,
    Other,
}

/// One message seen by the host window's input filter.
///
/// Pointer position and the foreground window travel with the event so the
/// tracker never has to query ambient platform state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: EventKind,
    /// Window the message was addressed to.
    pub target: WindowHandle,
    /// Pointer position in screen coordinates.
    pub pointer: Vec2,
    /// Window that was foreground when the message arrived.
    pub foreground: WindowHandle,
}

impl InputEvent {
    pub fn new(
        kind: EventKind,
        target: WindowHandle,
        pointer: Vec2,
        foreground: WindowHandle,
    ) -> Self {
        Self {
            kind,
            target,
            pointer,
            foreground,
        }
    }

    pub fn mouse_move(target: WindowHandle, pointer: Vec2) -> Self {
        Self::new(EventKind::MouseMove, target, pointer, target)
    }

    pub fn mouse_leave(target: WindowHandle, pointer: Vec2) -> Self {
        Self::new(EventKind::MouseLeave, target, pointer, target)
    }

    pub fn key_down(target: WindowHandle) -> Self {
        Self::new(EventKind::KeyDown, target, Vec2::ZERO, target)
    }
}

/// Whether an input filter swallowed a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOutcome {
    Consumed,
    NotConsumed,
}

/// Notifications published by the tracker for host UIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TooltipEvent {
    Shown {
        target: LogicalTarget,
        bounds: Rect,
        icon: IconKind,
        manual: bool,
    },
    Moved {
        target: LogicalTarget,
        bounds: Rect,
    },
    Hidden {
        target: LogicalTarget,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<TooltipEvent>,
    rx: Receiver<TooltipEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn receiver(&self) -> Receiver<TooltipEvent> {
        self.rx.clone()
    }

    pub fn publish(&self, event: TooltipEvent) {
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    /// This is useful for processing events in the UI loop.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to tooltip notifications.
pub trait EventListener {
    fn handle_event(&mut self, event: &TooltipEvent);
}
