//! egui adapters for the tracker: the popup lives in a tooltip-order
//! [`egui::Area`] and timers are polled once per frame.

use eframe::egui;
use hovertip_core::{Color, Rect, TipError, Vec2, WindowHandle};
use hovertip_layout::PaintCommand;
use hovertip_tracker::{BoundsFlags, PopupStyle, PopupSurface, Scheduler, TimerToken};
use std::time::{Duration, Instant};

pub fn to_egui_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_max(
        egui::pos2(rect.min.x, rect.min.y),
        egui::pos2(rect.max.x, rect.max.y),
    )
}

pub fn from_egui_rect(rect: egui::Rect) -> Rect {
    Rect::from_min_max(
        Vec2::new(rect.min.x, rect.min.y),
        Vec2::new(rect.max.x, rect.max.y),
    )
}

pub fn color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

const POPUP_HANDLE: WindowHandle = WindowHandle(0x7001);

pub struct EguiSurface {
    ctx: egui::Context,
    font: egui::FontId,
    screen: Rect,
    popup: Option<WindowHandle>,
    bounds: Rect,
    visible: bool,
}

impl EguiSurface {
    pub fn new(ctx: egui::Context, font: egui::FontId) -> Self {
        Self {
            ctx,
            font,
            screen: Rect::from_xywh(0.0, 0.0, 1280.0, 720.0),
            popup: None,
            bounds: Rect::NOTHING,
            visible: false,
        }
    }

    /// The whole viewport, refreshed every frame.
    pub fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
    }

    pub fn font(&self) -> &egui::FontId {
        &self.font
    }

    pub fn visible_bounds(&self) -> Option<Rect> {
        self.visible.then_some(self.bounds)
    }
}

impl PopupSurface for EguiSurface {
    fn create_popup(
        &mut self,
        _parent: WindowHandle,
        _style: PopupStyle,
    ) -> Result<WindowHandle, TipError> {
        if self.popup.is_some() {
            return Err(TipError::Surface("popup already created".into()));
        }
        self.popup = Some(POPUP_HANDLE);
        Ok(POPUP_HANDLE)
    }

    fn set_popup_bounds(&mut self, _popup: WindowHandle, bounds: Rect, _flags: BoundsFlags) {
        self.bounds = bounds;
        self.ctx.request_repaint();
    }

    fn show(&mut self, _popup: WindowHandle) {
        self.visible = true;
        self.ctx.request_repaint();
    }

    fn hide(&mut self, _popup: WindowHandle) {
        self.visible = false;
        self.ctx.request_repaint();
    }

    fn invalidate(&mut self, _popup: WindowHandle) {
        self.ctx.request_repaint();
    }

    fn destroy_popup(&mut self, _popup: WindowHandle) {
        self.popup = None;
        self.visible = false;
    }

    fn measure_text(&self, text: &str) -> Vec2 {
        let painter = egui::Painter::new(
            self.ctx.clone(),
            egui::LayerId::background(),
            egui::Rect::EVERYTHING,
        );
        let size = painter
            .layout_no_wrap(text.to_owned(), self.font.clone(), egui::Color32::BLACK)
            .size();
        Vec2::new(size.x, size.y)
    }

    fn screen_bounds(&self) -> Rect {
        self.screen
    }
}

/// Paint the popup at `bounds` from the tracker's draw list.
pub fn paint_popup(
    ctx: &egui::Context,
    bounds: Rect,
    commands: &[PaintCommand],
    font: &egui::FontId,
) {
    egui::Area::new(egui::Id::new("hovertip_popup"))
        .order(egui::Order::Tooltip)
        .fixed_pos(egui::pos2(bounds.min.x, bounds.min.y))
        .interactable(false)
        .show(ctx, |ui| {
            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(bounds.width(), bounds.height()),
                egui::Sense::hover(),
            );
            let painter = ui.painter_at(rect);
            let origin = rect.min.to_vec2();
            for command in commands {
                match command {
                    PaintCommand::FillRect { rect, color } => {
                        let area = to_egui_rect(*rect).translate(origin);
                        painter.rect_filled(area, 0.0, color32(*color));
                    }
                    PaintCommand::StrokeRect { rect, color, width } => {
                        painter.rect_stroke(
                            to_egui_rect(*rect).translate(origin),
                            0.0,
                            egui::Stroke::new(*width, color32(*color)),
                            egui::StrokeKind::Inside,
                        );
                    }
                    PaintCommand::Glyph { rect, glyph } => {
                        painter.text(
                            to_egui_rect(*rect).translate(origin).center(),
                            egui::Align2::CENTER_CENTER,
                            glyph.symbol(),
                            font.clone(),
                            egui::Color32::BLACK,
                        );
                    }
                    PaintCommand::Text { rect, text, color } => {
                        painter.text(
                            to_egui_rect(*rect).translate(origin).left_top(),
                            egui::Align2::LEFT_TOP,
                            text,
                            font.clone(),
                            color32(*color),
                        );
                    }
                }
            }
        });
}

/// Wall-clock timers, polled from the frame loop.
#[derive(Debug, Default)]
pub struct ClockScheduler {
    next_token: u64,
    pending: Vec<(TimerToken, Instant)>,
}

impl ClockScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disarm and return the timers that have expired, earliest first.
    pub fn poll(&mut self) -> Vec<TimerToken> {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> Vec<TimerToken> {
        let mut fired: Vec<(TimerToken, Instant)> = Vec::new();
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

    /// How long until the next timer expires.
    pub fn time_to_next(&self) -> Option<Duration> {
        let now = Instant::now();
        self.pending
            .iter()
            .map(|&(_, due)| due.saturating_duration_since(now))
            .min()
    }
}

impl Scheduler for ClockScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn arm(&mut self, delay: Duration) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending.push((token, Instant::now() + delay));
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|(t, _)| *t != token);
    }
}
