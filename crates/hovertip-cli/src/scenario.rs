//! Scenario files: a widget tree, its tips and a list of input steps,
//! replayed against the recording surface and a hand-driven clock.

use anyhow::{Context, Result, bail};
use hovertip_core::{
    IconKind, ItemHandle, LogicalTarget, Rect, TypeTag, Vec2, WidgetId, WindowHandle,
};
use hovertip_events::InputEvent;
use hovertip_layout::WidgetTree;
use hovertip_tracker::{
    HoverTracker, ManualScheduler, ProviderRegistry, RecordingSurface, TipBook, TooltipConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

const HOST_WINDOW: WindowHandle = WindowHandle(1);

type Tracker = HoverTracker<RecordingSurface, ManualScheduler>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Button,
    Label,
    TextBox,
    Panel,
    List,
    ItemView,
    StatusBar,
}

impl WidgetKind {
    fn tag(self) -> TypeTag {
        match self {
            Self::Button => TypeTag::BUTTON,
            Self::Label => TypeTag::LABEL,
            Self::TextBox => TypeTag::TEXT_BOX,
            Self::Panel => TypeTag::PANEL,
            Self::List => TypeTag::LIST_BOX,
            Self::ItemView => TypeTag::ITEM_VIEW,
            Self::StatusBar => TypeTag::STATUS_BAR,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemSpec {
    pub id: u64,
    /// `[x, y, width, height]` relative to the container.
    pub rect: [f32; 4],
    #[serde(default)]
    pub tip: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WidgetSpec {
    pub name: String,
    pub kind: WidgetKind,
    /// Name of an earlier widget; the window when absent.
    #[serde(default)]
    pub parent: Option<String>,
    /// `[x, y, width, height]` relative to the parent.
    pub rect: [f32; 4],
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub show_interval_ms: Option<u64>,
    #[serde(default = "default_row_height")]
    pub row_height: f32,
    #[serde(default)]
    pub rows: usize,
    #[serde(default)]
    pub row_tips: HashMap<usize, String>,
    /// Opt a list in to per-row tips.
    #[serde(default)]
    pub item_tips: bool,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

fn default_row_height() -> f32 {
    18.0
}

fn default_screen() -> [f32; 4] {
    [0.0, 0.0, 1920.0, 1080.0]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Move([f32; 2]),
    Leave([f32; 2]),
    KeyDown,
    /// Advance the clock by this many milliseconds.
    Wait(u64),
    Show {
        widget: String,
        #[serde(default)]
        icon: IconKind,
        text: String,
        #[serde(default)]
        delay_ms: Option<u64>,
    },
    Hide,
    Foreground(bool),
    Remove(String),
    Shutdown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_screen")]
    pub screen: [f32; 4],
    pub window: [f32; 4],
    #[serde(default)]
    pub widgets: Vec<WidgetSpec>,
    pub steps: Vec<Step>,
}

/// What the popup surface saw while one step ran.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: String,
    pub calls: Vec<String>,
    pub current: Option<String>,
    pub error: Option<String>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.index, self.step)?;
        for call in &self.calls {
            writeln!(f, "    {}", call)?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "    error: {}", error)?;
        }
        match &self.current {
            Some(target) => write!(f, "    showing {}", target),
            None => write!(f, "    idle"),
        }
    }
}

struct World {
    tree: WidgetTree,
    book: TipBook,
    root: WidgetId,
    names: HashMap<String, WidgetId>,
    item_tips: Vec<WidgetId>,
}

impl World {
    fn widget(&self, name: &str) -> Result<WidgetId> {
        self.names
            .get(name)
            .copied()
            .with_context(|| format!("unknown widget {name:?}"))
    }
}

fn rect([x, y, w, h]: [f32; 4]) -> Rect {
    Rect::from_xywh(x, y, w, h)
}

fn build(scenario: &Scenario) -> Result<World> {
    let mut tree = WidgetTree::new();
    let book = TipBook::new();
    let root = tree.add_window(rect(scenario.window));
    let mut world = World {
        tree,
        book,
        root,
        names: HashMap::new(),
        item_tips: Vec::new(),
    };

    for spec in &scenario.widgets {
        if world.names.contains_key(&spec.name) {
            bail!("duplicate widget name {:?}", spec.name);
        }
        let parent = match &spec.parent {
            Some(name) => world.widget(name)?,
            None => root,
        };
        let bounds = rect(spec.rect);
        let id = match spec.kind {
            WidgetKind::List => world.tree.add_list(parent, bounds, spec.row_height, spec.rows),
            WidgetKind::ItemView | WidgetKind::StatusBar => {
                let items = spec
                    .items
                    .iter()
                    .map(|item| (ItemHandle(item.id), rect(item.rect)))
                    .collect();
                world.tree.add_item_view(parent, spec.kind.tag(), bounds, items)
            }
            kind => world.tree.add_child(parent, kind.tag(), bounds),
        }
        .with_context(|| format!("cannot add {:?}", spec.name))?;

        if let Some(tip) = &spec.tip {
            world.book.set_tip(id, tip.as_str());
        }
        if let Some(ms) = spec.show_interval_ms {
            world.book.set_show_interval(id, Duration::from_millis(ms));
        }
        for (index, tip) in &spec.row_tips {
            world.book.set_row_tip(id, *index, tip.as_str());
        }
        for item in &spec.items {
            if let Some(tip) = &item.tip {
                world.book.set_item_tip(id, ItemHandle(item.id), tip.as_str());
            }
        }
        if spec.item_tips {
            world.item_tips.push(id);
        }
        world.names.insert(spec.name.clone(), id);
    }

    Ok(world)
}

fn apply(tracker: &mut Tracker, world: &mut World, step: &Step) -> Result<()> {
    match step {
        Step::Move([x, y]) => {
            let event = InputEvent::mouse_move(HOST_WINDOW, Vec2::new(*x, *y));
            tracker.handle_input(&world.tree, &event)?;
        }
        Step::Leave([x, y]) => {
            let event = InputEvent::mouse_leave(HOST_WINDOW, Vec2::new(*x, *y));
            tracker.handle_input(&world.tree, &event)?;
        }
        Step::KeyDown => {
            tracker.handle_input(&world.tree, &InputEvent::key_down(HOST_WINDOW))?;
        }
        Step::Wait(ms) => tracker.advance(&world.tree, Duration::from_millis(*ms))?,
        Step::Show {
            widget,
            icon,
            text,
            delay_ms,
        } => {
            let id = world.widget(widget)?;
            tracker.show(
                &world.tree,
                LogicalTarget::Widget(id),
                *icon,
                delay_ms.map(Duration::from_millis),
                text,
            )?;
        }
        Step::Hide => tracker.hide(),
        Step::Foreground(foreground) => tracker.set_foreground(*foreground),
        Step::Remove(name) => {
            let id = world.widget(name)?;
            world.tree.remove(id);
        }
        Step::Shutdown => tracker.shutdown(),
    }
    Ok(())
}

/// Run every step in order and collect the surface calls each produced.
///
/// A failing step is reported and the replay goes on; only a scenario that
/// cannot be built is an error.
pub fn replay(scenario: &Scenario, config: TooltipConfig) -> Result<Vec<StepReport>> {
    let mut world = build(scenario)?;
    let mut tracker = HoverTracker::new(
        config,
        world.root,
        HOST_WINDOW,
        RecordingSurface::new(rect(scenario.screen)),
        ManualScheduler::new(),
        ProviderRegistry::with_defaults(world.book.clone()),
    )?;
    for container in &world.item_tips {
        tracker.set_item_tips(*container, true);
    }
    tracker.set_foreground(true);
    tracker.surface_mut().take_calls();
    info!(
        widgets = world.names.len(),
        steps = scenario.steps.len(),
        "replaying scenario"
    );

    let mut report = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let outcome = apply(&mut tracker, &mut world, step);
        if let Err(e) = &outcome {
            error!(step = index, error = %e, "step failed");
        }
        report.push(StepReport {
            index,
            step: format!("{step:?}"),
            calls: tracker
                .surface_mut()
                .take_calls()
                .iter()
                .map(|c| format!("{c:?}"))
                .collect(),
            current: tracker.current_target().map(|t| t.to_string()),
            error: outcome.err().map(|e| e.to_string()),
        });
    }
    Ok(report)
}
