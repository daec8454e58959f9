use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

pub mod content;
pub mod error;
pub mod geometry;
pub mod style;

pub use content::{IconKind, TipContent};
pub use error::TipError;
pub use geometry::{Rect, Vec2};
pub use style::Color;

/// Handle to a widget owned by the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Item object exposed by a container that manages its own items
/// (tree nodes, list-view rows, status bar panels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemHandle(pub u64);

/// Native window handle, as reported by the input filter and the popup surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);

impl WindowHandle {
    pub const NONE: Self = Self(0);
}

/// Stable identifier of a widget or target kind, used to key resolvers and
/// tip providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag(&'static str);

impl TypeTag {
    /// Catch-all kind every widget tag can fall back to.
    pub const WIDGET: Self = Self("widget");
    pub const WINDOW: Self = Self("window");
    pub const PANEL: Self = Self("panel");
    pub const BUTTON: Self = Self("button");
    pub const LABEL: Self = Self("label");
    pub const TEXT_BOX: Self = Self("text_box");
    /// Index-based list container.
    pub const LIST_BOX: Self = Self("list_box");
    /// Container exposing item objects.
    pub const ITEM_VIEW: Self = Self("item_view");
    pub const STATUS_BAR: Self = Self("status_bar");
    /// Kind of every `LogicalTarget::SubItem`.
    pub const SUB_ITEM: Self = Self("sub_item");
    /// Kind of every `LogicalTarget::Item`.
    pub const ITEM: Self = Self("item");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The thing a tooltip is about.
///
/// Targets borrow into a widget tree the tracker does not own; they must be
/// validated against the host before use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum LogicalTarget {
    Widget(WidgetId),
    /// Row of an index-based list. `local` is the pointer position inside
    /// the container when the row was resolved and takes no part in equality.
    SubItem {
        container: WidgetId,
        index: usize,
        local: Vec2,
    },
    Item {
        container: WidgetId,
        item: ItemHandle,
    },
}

impl LogicalTarget {
    /// The widget that owns this target.
    pub fn widget(&self) -> WidgetId {
        match *self {
            Self::Widget(id) => id,
            Self::SubItem { container, .. } | Self::Item { container, .. } => container,
        }
    }

    pub fn as_widget(&self) -> Option<WidgetId> {
        match *self {
            Self::Widget(id) => Some(id),
            _ => None,
        }
    }
}

impl PartialEq for LogicalTarget {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Widget(a), Self::Widget(b)) => a == b,
            (
                Self::SubItem {
                    container: ca,
                    index: ia,
                    ..
                },
                Self::SubItem {
                    container: cb,
                    index: ib,
                    ..
                },
            ) => ca == cb && ia == ib,
            (
                Self::Item {
                    container: ca,
                    item: ia,
                },
                Self::Item {
                    container: cb,
                    item: ib,
                },
            ) => ca == cb && ia == ib,
            _ => false,
        }
    }
}

impl Eq for LogicalTarget {}

impl Hash for LogicalTarget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Widget(id) => {
                0u8.hash(state);
                id.hash(state);
            }
            Self::SubItem {
                container, index, ..
            } => {
                1u8.hash(state);
                container.hash(state);
                index.hash(state);
            }
            Self::Item { container, item } => {
                2u8.hash(state);
                container.hash(state);
                item.hash(state);
            }
        }
    }
}

impl fmt::Display for LogicalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Widget(id) => write!(f, "widget {id}"),
            Self::SubItem {
                container, index, ..
            } => write!(f, "row {index} of {container}"),
            Self::Item { container, item } => write!(f, "item {} of {container}", item.0),
        }
    }
}
