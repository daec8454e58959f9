use hovertip_core::{ItemHandle, LogicalTarget, Rect, TipError, TypeTag, WidgetId};
use hovertip_layout::WidgetHost;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Supplies tip text, bounds and visibility for one kind of target.
pub trait TipDataProvider {
    /// Raw tip text, empty when none is assigned.
    fn tip(&self, host: &dyn WidgetHost, target: &LogicalTarget) -> String;

    /// Absolute screen bounds, or `None` when the target no longer exists.
    fn bounds(&self, host: &dyn WidgetHost, target: &LogicalTarget) -> Option<Rect>;

    fn visible(&self, host: &dyn WidgetHost, target: &LogicalTarget) -> bool;

    /// Adjust the delay before this target's tip appears. Zero shows it
    /// immediately.
    fn show_interval(
        &self,
        _host: &dyn WidgetHost,
        _target: &LogicalTarget,
        _delay: &mut Duration,
    ) {
    }
}

#[derive(Debug, Default)]
struct TipTable {
    widgets: HashMap<WidgetId, String>,
    rows: HashMap<(WidgetId, usize), String>,
    items: HashMap<(WidgetId, ItemHandle), String>,
    intervals: HashMap<WidgetId, Duration>,
}

/// Tip texts assigned by the host application.
///
/// Cloning shares the same table, so the application keeps a handle while
/// the providers registered with a tracker read from it.
#[derive(Debug, Clone, Default)]
pub struct TipBook {
    inner: Arc<RwLock<TipTable>>,
}

impl TipBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign or clear (with an empty string) a widget's tip.
    pub fn set_tip(&self, widget: WidgetId, text: impl Into<String>) {
        let text = text.into();
        let mut table = self.inner.write();
        if text.is_empty() {
            table.widgets.remove(&widget);
        } else {
            table.widgets.insert(widget, text);
        }
    }

    pub fn set_row_tip(&self, list: WidgetId, index: usize, text: impl Into<String>) {
        self.inner.write().rows.insert((list, index), text.into());
    }

    pub fn set_item_tip(&self, container: WidgetId, item: ItemHandle, text: impl Into<String>) {
        self.inner.write().items.insert((container, item), text.into());
    }

    /// Per-widget override of the show delay.
    pub fn set_show_interval(&self, widget: WidgetId, delay: Duration) {
        self.inner.write().intervals.insert(widget, delay);
    }

    /// Drop everything assigned to a widget, its rows and items included.
    pub fn forget(&self, widget: WidgetId) {
        let mut table = self.inner.write();
        table.widgets.remove(&widget);
        table.rows.retain(|(w, _), _| *w != widget);
        table.items.retain(|(w, _), _| *w != widget);
        table.intervals.remove(&widget);
    }

    pub fn tip(&self, widget: WidgetId) -> Option<String> {
        self.inner.read().widgets.get(&widget).cloned()
    }

    pub fn row_tip(&self, list: WidgetId, index: usize) -> Option<String> {
        self.inner.read().rows.get(&(list, index)).cloned()
    }

    pub fn item_tip(&self, container: WidgetId, item: ItemHandle) -> Option<String> {
        self.inner.read().items.get(&(container, item)).cloned()
    }

    fn interval(&self, widget: WidgetId) -> Option<Duration> {
        self.inner.read().intervals.get(&widget).copied()
    }
}

/// Tips attached to whole widgets.
#[derive(Debug, Clone)]
pub struct WidgetTipProvider {
    book: TipBook,
}

impl WidgetTipProvider {
    pub fn new(book: TipBook) -> Self {
        Self { book }
    }
}

impl TipDataProvider for WidgetTipProvider {
    fn tip(&self, _host: &dyn WidgetHost, target: &LogicalTarget) -> String {
        self.book.tip(target.widget()).unwrap_or_default()
    }

    fn bounds(&self, host: &dyn WidgetHost, target: &LogicalTarget) -> Option<Rect> {
        host.screen_bounds(target.widget())
    }

    fn visible(&self, host: &dyn WidgetHost, target: &LogicalTarget) -> bool {
        host.is_visible(target.widget())
    }

    fn show_interval(&self, _host: &dyn WidgetHost, target: &LogicalTarget, delay: &mut Duration) {
        if let Some(interval) = self.book.interval(target.widget()) {
            *delay = interval;
        }
    }
}

/// Tips for the rows of index-based lists.
#[derive(Debug, Clone)]
pub struct ListRowTipProvider {
    book: TipBook,
}

impl ListRowTipProvider {
    pub fn new(book: TipBook) -> Self {
        Self { book }
    }
}

impl TipDataProvider for ListRowTipProvider {
    fn tip(&self, _host: &dyn WidgetHost, target: &LogicalTarget) -> String {
        match *target {
            LogicalTarget::SubItem {
                container, index, ..
            } => self.book.row_tip(container, index).unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn bounds(&self, host: &dyn WidgetHost, target: &LogicalTarget) -> Option<Rect> {
        let LogicalTarget::SubItem {
            container, index, ..
        } = *target
        else {
            return None;
        };
        let local = host.list_item_bounds(container, index)?;
        host.to_screen(container, local)
    }

    fn visible(&self, host: &dyn WidgetHost, target: &LogicalTarget) -> bool {
        host.is_visible(target.widget())
    }
}

/// Tips for item objects of trees, list views and status bars.
#[derive(Debug, Clone)]
pub struct CollectionItemTipProvider {
    book: TipBook,
}

impl CollectionItemTipProvider {
    pub fn new(book: TipBook) -> Self {
        Self { book }
    }
}

impl TipDataProvider for CollectionItemTipProvider {
    fn tip(&self, _host: &dyn WidgetHost, target: &LogicalTarget) -> String {
        match *target {
            LogicalTarget::Item { container, item } => {
                self.book.item_tip(container, item).unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    fn bounds(&self, host: &dyn WidgetHost, target: &LogicalTarget) -> Option<Rect> {
        let LogicalTarget::Item { container, item } = *target else {
            return None;
        };
        let local = host.item_bounds(container, item)?;
        host.to_screen(container, local)
    }

    fn visible(&self, host: &dyn WidgetHost, target: &LogicalTarget) -> bool {
        host.is_visible(target.widget())
    }
}

/// Providers keyed by target kind, with an explicit fallback chain per kind.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<TypeTag, Box<dyn TipDataProvider>>,
    fallbacks: HashMap<TypeTag, TypeTag>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget, row and item providers reading from `book`, with every
    /// built-in widget kind falling back to [`TypeTag::WIDGET`].
    pub fn with_defaults(book: TipBook) -> Self {
        let mut registry = Self::new();
        registry.register(TypeTag::WIDGET, WidgetTipProvider::new(book.clone()));
        registry.register(TypeTag::SUB_ITEM, ListRowTipProvider::new(book.clone()));
        registry.register(TypeTag::ITEM, CollectionItemTipProvider::new(book));
        for tag in [
            TypeTag::WINDOW,
            TypeTag::PANEL,
            TypeTag::BUTTON,
            TypeTag::LABEL,
            TypeTag::TEXT_BOX,
            TypeTag::LIST_BOX,
            TypeTag::ITEM_VIEW,
            TypeTag::STATUS_BAR,
        ] {
            registry.fallbacks.insert(tag, TypeTag::WIDGET);
        }
        registry
    }

    pub fn register(&mut self, tag: TypeTag, provider: impl TipDataProvider + 'static) {
        self.providers.insert(tag, Box::new(provider));
    }

    /// Make `tag` use `parent`'s provider when it has none of its own.
    ///
    /// Fails if the link would close a cycle.
    pub fn register_fallback(&mut self, tag: TypeTag, parent: TypeTag) -> Result<(), TipError> {
        let mut cursor = Some(parent);
        while let Some(t) = cursor {
            if t == tag {
                return Err(TipError::Config(format!(
                    "fallback from `{tag}` to `{parent}` would form a cycle"
                )));
            }
            cursor = self.fallbacks.get(&t).copied();
        }
        self.fallbacks.insert(tag, parent);
        Ok(())
    }

    /// Exact match first, then each fallback in chain order.
    pub fn lookup(&self, tag: TypeTag) -> Result<&dyn TipDataProvider, TipError> {
        let mut seen = HashSet::new();
        let mut cursor = Some(tag);
        while let Some(t) = cursor {
            if !seen.insert(t) {
                break;
            }
            if let Some(provider) = self.providers.get(&t) {
                return Ok(provider.as_ref());
            }
            cursor = self.fallbacks.get(&t).copied();
        }
        Err(TipError::NoProviderForTarget { tag })
    }
}
