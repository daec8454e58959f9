//! Simulated platform: a popup surface that records what it is told and a
//! scheduler driven by hand. Used by the scenario replayer and the tests.

use crate::platform::{BoundsFlags, PopupStyle, PopupSurface, Scheduler, TimerToken};
use crate::tracker::HoverTracker;
use hovertip_core::{Rect, TipError, Vec2, WindowHandle};
use hovertip_layout::WidgetHost;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Create { parent: WindowHandle },
    SetBounds(Rect),
    Show,
    Hide,
    Invalidate,
    Destroy,
}

/// Popup surface that records every call and measures text with a fixed
/// per-character advance.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    screen: Rect,
    char_width: f32,
    line_height: f32,
    popup: WindowHandle,
    visible: bool,
    bounds: Rect,
}

impl RecordingSurface {
    pub fn new(screen: Rect) -> Self {
        Self {
            calls: Vec::new(),
            screen,
            char_width: 8.0,
            line_height: 16.0,
            popup: WindowHandle(0xF00D),
            visible: false,
            bounds: Rect::NOTHING,
        }
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Return and forget the calls recorded so far.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl PopupSurface for RecordingSurface {
    fn create_popup(
        &mut self,
        parent: WindowHandle,
        _style: PopupStyle,
    ) -> Result<WindowHandle, TipError> {
        self.calls.push(SurfaceCall::Create { parent });
        Ok(self.popup)
    }

    fn set_popup_bounds(&mut self, _popup: WindowHandle, bounds: Rect, _flags: BoundsFlags) {
        self.bounds = bounds;
        self.calls.push(SurfaceCall::SetBounds(bounds));
    }

    fn show(&mut self, _popup: WindowHandle) {
        self.visible = true;
        self.calls.push(SurfaceCall::Show);
    }

    fn hide(&mut self, _popup: WindowHandle) {
        self.visible = false;
        self.calls.push(SurfaceCall::Hide);
    }

    fn invalidate(&mut self, _popup: WindowHandle) {
        self.calls.push(SurfaceCall::Invalidate);
    }

    fn destroy_popup(&mut self, _popup: WindowHandle) {
        self.visible = false;
        self.calls.push(SurfaceCall::Destroy);
    }

    fn measure_text(&self, text: &str) -> Vec2 {
        let lines: Vec<&str> = text.lines().collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Vec2::new(
            widest as f32 * self.char_width,
            lines.len().max(1) as f32 * self.line_height,
        )
    }

    fn screen_bounds(&self) -> Rect {
        self.screen
    }
}

/// Scheduler whose clock only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    origin: Instant,
    elapsed: Duration,
    next_token: u64,
    pending: Vec<(TimerToken, Duration)>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            next_token: 0,
            pending: Vec::new(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Clock reading at which the earliest armed timer expires.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|&(_, due)| due).min()
    }

    /// Move the clock forward and return the timers that expired, earliest
    /// first. Expired timers are disarmed.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerToken> {
        self.elapsed += by;
        let now = self.elapsed;
        let mut fired: Vec<(TimerToken, Duration)> = Vec::new();
        self.pending.retain(|&(token, due)| {
            if due <= now {
                fired.push((token, due));
                false
            } else {
                true
            }
        });
        fired.sort_by_key(|&(token, due)| (due, token));
        fired.into_iter().map(|(token, _)| token).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn arm(&mut self, delay: Duration) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending.push((token, self.elapsed + delay));
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|(t, _)| *t != token);
    }
}

impl<S: PopupSurface> HoverTracker<S, ManualScheduler> {
    /// Run the clock forward by `by`, delivering every timer that expires on
    /// the way. Timers armed by a delivery fire too if they fall in range.
    pub fn advance(&mut self, host: &dyn WidgetHost, by: Duration) -> Result<(), TipError> {
        let deadline = self.scheduler().elapsed() + by;
        while let Some(due) = self.scheduler().next_due().filter(|due| *due <= deadline) {
            let step = due.saturating_sub(self.scheduler().elapsed());
            for token in self.scheduler_mut().advance(step) {
                self.on_timer(host, token)?;
            }
        }
        let rest = deadline.saturating_sub(self.scheduler().elapsed());
        self.scheduler_mut().advance(rest);
        Ok(())
    }
}
