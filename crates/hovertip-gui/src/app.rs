use crate::surface::{ClockScheduler, EguiSurface, from_egui_rect, paint_popup, to_egui_rect};
use eframe::egui;
use hovertip_core::{
    IconKind, ItemHandle, LogicalTarget, Rect, TipError, TypeTag, Vec2, WidgetId, WindowHandle,
};
use hovertip_events::{EventBus, EventListener, InputEvent, TooltipEvent};
use hovertip_layout::{WidgetHost, WidgetTree};
use hovertip_tracker::{HoverTracker, ProviderRegistry, TipBook, TooltipConfig};
use std::collections::VecDeque;
use std::time::Duration;

const HOST_WINDOW: WindowHandle = WindowHandle(1);
const LOG_LINES: usize = 14;

enum Shape {
    Plain,
    Rows { count: usize, height: f32 },
    Items(Vec<(ItemHandle, Rect, String)>),
}

struct DemoWidget {
    id: WidgetId,
    label: String,
    shape: Shape,
}

#[derive(Default)]
struct EventLog {
    lines: VecDeque<String>,
}

impl EventLog {
    fn push(&mut self, line: String) {
        if self.lines.len() == LOG_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

impl EventListener for EventLog {
    fn handle_event(&mut self, event: &TooltipEvent) {
        let line = match event {
            TooltipEvent::Shown {
                target,
                icon,
                manual,
                ..
            } => {
                let how = if *manual { ", manual" } else { "" };
                format!("shown {target} ({icon:?}{how})")
            }
            TooltipEvent::Moved { target, .. } => format!("moved to {target}"),
            TooltipEvent::Hidden { target } => format!("hidden {target}"),
        };
        self.push(line);
    }
}

fn missing(parent: WidgetId) -> TipError {
    TipError::StaleTargetReference {
        target: LogicalTarget::Widget(parent),
    }
}

pub struct DemoApp {
    tree: WidgetTree,
    book: TipBook,
    root: WidgetId,
    widgets: Vec<DemoWidget>,
    save: WidgetId,
    list: WidgetId,
    tracker: HoverTracker<EguiSurface, ClockScheduler>,
    bus: EventBus,
    log: EventLog,
    /// Last pointer position delivered while inside the host area.
    inside: Option<Vec2>,
    save_tip: String,
    row_tips: bool,
    enabled: bool,
}

impl DemoApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, TipError> {
        let config = TooltipConfig::load();
        let enabled = config.enabled;
        let mut tree = WidgetTree::new();
        let book = TipBook::new();
        let root = tree.add_window(Rect::from_xywh(0.0, 0.0, 640.0, 560.0));
        let mut widgets = Vec::new();

        let toolbar_bounds = Rect::from_xywh(12.0, 12.0, 600.0, 40.0);
        let toolbar = tree
            .add_child(root, TypeTag::PANEL, toolbar_bounds)
            .ok_or(missing(root))?;
        widgets.push(DemoWidget {
            id: toolbar,
            label: String::new(),
            shape: Shape::Plain,
        });

        let buttons = [
            ("Save", TypeTag::BUTTON, 6.0, 90.0, "Save the document"),
            ("Delete", TypeTag::BUTTON, 102.0, 90.0, "!Deletes the selection without asking"),
            ("Help", TypeTag::BUTTON, 198.0, 90.0, "?Opens the manual"),
            ("Saved just now", TypeTag::LABEL, 294.0, 300.0, "i)Autosave runs every five minutes"),
        ];
        let mut save = None;
        for (label, tag, x, width, tip) in buttons {
            let id = tree
                .add_child(toolbar, tag, Rect::from_xywh(x, 6.0, width, 28.0))
                .ok_or(missing(toolbar))?;
            book.set_tip(id, tip);
            save.get_or_insert(id);
            widgets.push(DemoWidget {
                id,
                label: label.to_string(),
                shape: Shape::Plain,
            });
        }
        let save = save.ok_or(missing(toolbar))?;

        let rows = 15;
        let list = tree
            .add_list(root, Rect::from_xywh(12.0, 64.0, 220.0, 300.0), 20.0, rows)
            .ok_or(missing(root))?;
        book.set_tip(list, "Recent files");
        book.set_row_tip(list, 0, "i)Pinned");
        for index in 1..rows {
            book.set_row_tip(list, index, format!("notes_{index}.txt"));
        }
        widgets.push(DemoWidget {
            id: list,
            label: "Recent files".into(),
            shape: Shape::Rows {
                count: rows,
                height: 20.0,
            },
        });

        let mut tiles = Vec::new();
        for n in 0..9u64 {
            let (col, row) = ((n % 3) as f32, (n / 3) as f32);
            let rect = Rect::from_xywh(8.0 + col * 120.0, 8.0 + row * 96.0, 110.0, 86.0);
            tiles.push((ItemHandle(n + 1), rect, format!("Tile {}", n + 1)));
        }
        let gallery = tree
            .add_item_view(
                root,
                TypeTag::ITEM_VIEW,
                Rect::from_xywh(244.0, 64.0, 368.0, 300.0),
                tiles.iter().map(|(h, r, _)| (*h, *r)).collect(),
            )
            .ok_or(missing(root))?;
        for (handle, _, label) in &tiles {
            let tip = if handle.0 == 5 {
                format!("!{label} is locked")
            } else {
                format!("{label}: 1920x1080")
            };
            book.set_item_tip(gallery, *handle, tip);
        }
        widgets.push(DemoWidget {
            id: gallery,
            label: String::new(),
            shape: Shape::Items(tiles),
        });

        let panels = vec![
            (ItemHandle(1), Rect::from_xywh(0.0, 0.0, 200.0, 24.0), "Ready".to_string()),
            (ItemHandle(2), Rect::from_xywh(200.0, 0.0, 120.0, 24.0), "Ln 4, Col 18".to_string()),
            (ItemHandle(3), Rect::from_xywh(320.0, 0.0, 120.0, 24.0), "UTF-8".to_string()),
        ];
        let status = tree
            .add_item_view(
                root,
                TypeTag::STATUS_BAR,
                Rect::from_xywh(12.0, 376.0, 600.0, 24.0),
                panels.iter().map(|(h, r, _)| (*h, *r)).collect(),
            )
            .ok_or(missing(root))?;
        book.set_item_tip(status, ItemHandle(1), "Nothing is running");
        book.set_item_tip(status, ItemHandle(2), "?Cursor line and column");
        book.set_item_tip(status, ItemHandle(3), "File encoding");
        widgets.push(DemoWidget {
            id: status,
            label: String::new(),
            shape: Shape::Items(panels),
        });

        let banner_bounds = Rect::from_xywh(12.0, 412.0, 600.0, 28.0);
        let banner = tree
            .add_child(root, TypeTag::LABEL, banner_bounds)
            .ok_or(missing(root))?;
        book.set_tip(banner, "OK");
        book.set_show_interval(banner, Duration::ZERO);
        widgets.push(DemoWidget {
            id: banner,
            label: "Wide banner, tip shows at once".into(),
            shape: Shape::Plain,
        });

        let surface = EguiSurface::new(cc.egui_ctx.clone(), egui::FontId::proportional(13.0));
        let bus = EventBus::new();
        let tracker = HoverTracker::new(
            config,
            root,
            HOST_WINDOW,
            surface,
            ClockScheduler::new(),
            ProviderRegistry::with_defaults(book.clone()),
        )?
        .with_event_bus(bus.clone());

        Ok(Self {
            tree,
            book,
            root,
            widgets,
            save,
            list,
            tracker,
            bus,
            log: EventLog::default(),
            inside: None,
            save_tip: "Save the document".into(),
            row_tips: false,
            enabled,
        })
    }

    fn report(&mut self, result: Result<(), TipError>) {
        if let Err(e) = result {
            tracing::error!(error = %e, "tooltip error");
            self.log.push(format!("error: {e}"));
        }
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tooltips");
        if ui.checkbox(&mut self.enabled, "Enabled").changed() {
            self.tracker.set_enabled(self.enabled);
        }
        if ui
            .checkbox(&mut self.row_tips, "Per-row tips in the file list")
            .changed()
        {
            self.tracker.set_item_tips(self.list, self.row_tips);
        }

        ui.add_space(6.0);
        ui.label("Save button tip");
        if ui.text_edit_singleline(&mut self.save_tip).changed() {
            self.book.set_tip(self.save, self.save_tip.as_str());
        }

        ui.horizontal(|ui| {
            if ui.button("Show warning").clicked() {
                let result = self.tracker.show(
                    &self.tree,
                    LogicalTarget::Widget(self.save),
                    IconKind::Warning,
                    Some(Duration::from_secs(3)),
                    "Unsaved changes",
                );
                self.report(result);
            }
            if ui.button("Hide").clicked() {
                self.tracker.hide();
            }
        });

        ui.separator();
        let config = self.tracker.config();
        ui.label(format!(
            "show after {} ms, hide after {} ms, reshow within {} ms",
            config.show_delay_ms, config.hide_delay_ms, config.reshow_delay_ms
        ));
        if ui.button("Save settings").clicked() {
            self.tracker.config().save();
        }
        if let Some(path) = TooltipConfig::default_path() {
            ui.small(path.display().to_string());
        }

        ui.separator();
        ui.label("Events");
        for line in &self.log.lines {
            ui.monospace(line);
        }
    }

    fn draw_widgets(&self, ui: &egui::Ui) {
        let painter = ui.painter();
        let visuals = ui.visuals();
        let font = egui::FontId::proportional(13.0);
        let text_color = visuals.text_color();
        let current = self.tracker.current_target().map(|t| t.widget());

        for widget in &self.widgets {
            let Some(bounds) = self.tree.screen_bounds(widget.id) else {
                continue;
            };
            let rect = to_egui_rect(bounds);
            let stroke = if current == Some(widget.id) {
                visuals.selection.stroke
            } else {
                visuals.widgets.noninteractive.bg_stroke
            };
            painter.rect_filled(rect, 4.0, visuals.extreme_bg_color);
            painter.rect_stroke(rect, 4.0, stroke, egui::StrokeKind::Inside);

            match &widget.shape {
                Shape::Plain => {
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        &widget.label,
                        font.clone(),
                        text_color,
                    );
                }
                Shape::Rows { count, height } => {
                    for index in 0..*count {
                        let top = rect.top() + index as f32 * height;
                        if top + height > rect.bottom() {
                            break;
                        }
                        let text = if index == 0 {
                            "pinned.txt".to_string()
                        } else {
                            format!("notes_{index}.txt")
                        };
                        painter.text(
                            egui::pos2(rect.left() + 6.0, top + height / 2.0),
                            egui::Align2::LEFT_CENTER,
                            text,
                            font.clone(),
                            text_color,
                        );
                    }
                }
                Shape::Items(items) => {
                    for (_, local, label) in items {
                        let item = to_egui_rect(*local).translate(rect.min.to_vec2());
                        painter.rect_stroke(
                            item,
                            2.0,
                            visuals.widgets.noninteractive.bg_stroke,
                            egui::StrokeKind::Inside,
                        );
                        painter.text(
                            item.center(),
                            egui::Align2::CENTER_CENTER,
                            label,
                            font.clone(),
                            text_color,
                        );
                    }
                }
            }
        }
    }

    fn feed_input(&mut self, ctx: &egui::Context, host: egui::Rect) {
        let (hover, focused, key_down) = ctx.input(|i| {
            (
                i.pointer.hover_pos(),
                i.focused,
                i.events
                    .iter()
                    .any(|e| matches!(e, egui::Event::Key { pressed: true, .. })),
            )
        });
        self.tracker.set_foreground(focused);

        let inside = hover
            .filter(|p| host.contains(*p))
            .map(|p| Vec2::new(p.x, p.y));
        if let Some(pointer) = inside {
            if self.inside != Some(pointer) {
                self.inside = Some(pointer);
                let result = self
                    .tracker
                    .handle_input(&self.tree, &InputEvent::mouse_move(HOST_WINDOW, pointer))
                    .map(|_| ());
                self.report(result);
            }
        } else if self.inside.take().is_some() {
            let pointer = hover
                .map(|p| Vec2::new(p.x, p.y))
                .unwrap_or(Vec2::new(f32::MIN, f32::MIN));
            let result = self
                .tracker
                .handle_input(&self.tree, &InputEvent::mouse_leave(HOST_WINDOW, pointer))
                .map(|_| ());
            self.report(result);
        }

        if key_down {
            let result = self
                .tracker
                .handle_input(&self.tree, &InputEvent::key_down(HOST_WINDOW))
                .map(|_| ());
            self.report(result);
        }
    }

    fn fire_timers(&mut self, ctx: &egui::Context) {
        for token in self.tracker.scheduler_mut().poll() {
            let result = self.tracker.on_timer(&self.tree, token);
            self.report(result);
        }
        if let Some(wait) = self.tracker.scheduler().time_to_next() {
            ctx.request_repaint_after(wait);
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let side = egui::SidePanel::right("tooltip_controls")
            .resizable(false)
            .min_width(280.0)
            .show(ctx, |ui| self.controls_ui(ui));

        let central = egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.max_rect();
            self.tree.set_bounds(self.root, from_egui_rect(rect));
            self.draw_widgets(ui);
            rect
        });

        let screen = side.response.rect.union(central.response.rect);
        self.tracker.surface_mut().set_screen(from_egui_rect(screen));
        self.feed_input(ctx, central.inner);
        self.fire_timers(ctx);
        self.bus.dispatch_to(&mut self.log);

        if let Some(bounds) = self.tracker.surface().visible_bounds() {
            let font = self.tracker.surface().font();
            paint_popup(ctx, bounds, &self.tracker.paint(), font);
        }
    }
}
