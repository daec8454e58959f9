//! Seams to the native windowing layer.

use hovertip_core::{Rect, TipError, Vec2, WindowHandle};
use std::time::{Duration, Instant};

/// Creation flags for the popup window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupStyle {
    pub no_activate: bool,
    pub topmost: bool,
    pub borderless: bool,
}

impl Default for PopupStyle {
    fn default() -> Self {
        Self {
            no_activate: true,
            topmost: true,
            borderless: true,
        }
    }
}

/// Flags for repositioning the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsFlags {
    pub no_activate: bool,
    pub topmost: bool,
}

impl Default for BoundsFlags {
    fn default() -> Self {
        Self {
            no_activate: true,
            topmost: true,
        }
    }
}

/// The native popup window and the text metrics of its font.
///
/// Only the tracker calls into a surface; nothing else may move, show or
/// hide the popup it creates.
pub trait PopupSurface {
    fn create_popup(
        &mut self,
        parent: WindowHandle,
        style: PopupStyle,
    ) -> Result<WindowHandle, TipError>;

    fn set_popup_bounds(&mut self, popup: WindowHandle, bounds: Rect, flags: BoundsFlags);

    fn show(&mut self, popup: WindowHandle);

    fn hide(&mut self, popup: WindowHandle);

    /// Request a repaint; the host then calls `HoverTracker::paint`.
    fn invalidate(&mut self, popup: WindowHandle);

    fn destroy_popup(&mut self, popup: WindowHandle);

    /// Size of `text` rendered in the popup font.
    fn measure_text(&self, text: &str) -> Vec2;

    /// Bounds of the monitor showing the host window.
    fn screen_bounds(&self) -> Rect;
}

/// Identifies one armed timer. Tokens are never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// One-shot timers on the UI thread plus the clock they run on.
///
/// When an armed timer expires the host calls `HoverTracker::on_timer`
/// with its token, from the same event loop that delivers input.
pub trait Scheduler {
    fn now(&self) -> Instant;

    fn arm(&mut self, delay: Duration) -> TimerToken;

    fn cancel(&mut self, token: TimerToken);
}
