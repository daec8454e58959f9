//! The widget tree seen through the tooltip's eyes.
//!
//! Tooltips never own widgets. Everything they learn about the host UI goes
//! through [`WidgetHost`], and every lookup may come back empty because the
//! widget was destroyed in the meantime.

use hovertip_core::{ItemHandle, LogicalTarget, Rect, TypeTag, Vec2, WidgetId};
use std::collections::HashMap;

pub trait WidgetHost {
    fn is_alive(&self, widget: WidgetId) -> bool;

    fn type_tag(&self, widget: WidgetId) -> Option<TypeTag>;

    /// Visible on screen, including all ancestors.
    fn is_visible(&self, widget: WidgetId) -> bool;

    /// Absolute screen bounds of a widget.
    fn screen_bounds(&self, widget: WidgetId) -> Option<Rect>;

    /// Topmost visible direct child under a container-local point.
    fn child_at(&self, container: WidgetId, local: Vec2) -> Option<WidgetId>;

    /// Row index of an index-based list under a container-local point.
    fn list_index_at(&self, container: WidgetId, local: Vec2) -> Option<usize>;

    /// Container-local bounds of a list row.
    fn list_item_bounds(&self, container: WidgetId, index: usize) -> Option<Rect>;

    /// Item object under a container-local point.
    fn item_at(&self, container: WidgetId, local: Vec2) -> Option<ItemHandle>;

    /// Container-local bounds of an item object.
    fn item_bounds(&self, container: WidgetId, item: ItemHandle) -> Option<Rect>;

    fn to_local(&self, widget: WidgetId, screen: Vec2) -> Option<Vec2> {
        self.screen_bounds(widget).map(|b| screen.sub(b.min))
    }

    fn to_screen(&self, widget: WidgetId, local: Rect) -> Option<Rect> {
        self.screen_bounds(widget).map(|b| local.translate(b.min))
    }

    /// Kind used to look up a tip provider, or `None` when the target's
    /// widget is gone.
    fn target_tag(&self, target: &LogicalTarget) -> Option<TypeTag> {
        match target {
            LogicalTarget::Widget(id) => self.type_tag(*id),
            LogicalTarget::SubItem { container, .. } => {
                self.is_alive(*container).then_some(TypeTag::SUB_ITEM)
            }
            LogicalTarget::Item { container, .. } => {
                self.is_alive(*container).then_some(TypeTag::ITEM)
            }
        }
    }
}

/// What a node contains besides child widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetContent {
    Plain,
    /// Uniform rows stacked from the top of the widget.
    List { row_height: f32, rows: usize },
    /// Free-form item objects with container-local bounds.
    Items(Vec<(ItemHandle, Rect)>),
}

#[derive(Debug, Clone)]
struct WidgetNode {
    tag: TypeTag,
    parent: Option<WidgetId>,
    /// Relative to the parent; absolute for top-level windows.
    bounds: Rect,
    visible: bool,
    children: Vec<WidgetId>,
    content: WidgetContent,
}

/// In-memory [`WidgetHost`] used by the demo front-ends, the scenario
/// replayer and the tests.
#[derive(Debug, Clone, Default)]
pub struct WidgetTree {
    nodes: HashMap<WidgetId, WidgetNode>,
    next_id: u64,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> WidgetId {
        self.next_id += 1;
        WidgetId(self.next_id)
    }

    fn insert(
        &mut self,
        parent: Option<WidgetId>,
        tag: TypeTag,
        bounds: Rect,
        content: WidgetContent,
    ) -> WidgetId {
        let id = self.alloc();
        self.nodes.insert(
            id,
            WidgetNode {
                tag,
                parent,
                bounds,
                visible: true,
                children: Vec::new(),
                content,
            },
        );
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(id);
        }
        id
    }

    /// Add a top-level window with absolute screen bounds.
    pub fn add_window(&mut self, bounds: Rect) -> WidgetId {
        self.insert(None, TypeTag::WINDOW, bounds, WidgetContent::Plain)
    }

    /// Add a plain child. Later siblings are drawn above earlier ones.
    ///
    /// Returns `None` when the parent does not exist.
    pub fn add_child(&mut self, parent: WidgetId, tag: TypeTag, bounds: Rect) -> Option<WidgetId> {
        self.nodes
            .contains_key(&parent)
            .then(|| self.insert(Some(parent), tag, bounds, WidgetContent::Plain))
    }

    pub fn add_list(
        &mut self,
        parent: WidgetId,
        bounds: Rect,
        row_height: f32,
        rows: usize,
    ) -> Option<WidgetId> {
        self.nodes.contains_key(&parent).then(|| {
            self.insert(
                Some(parent),
                TypeTag::LIST_BOX,
                bounds,
                WidgetContent::List { row_height, rows },
            )
        })
    }

    pub fn add_item_view(
        &mut self,
        parent: WidgetId,
        tag: TypeTag,
        bounds: Rect,
        items: Vec<(ItemHandle, Rect)>,
    ) -> Option<WidgetId> {
        self.nodes
            .contains_key(&parent)
            .then(|| self.insert(Some(parent), tag, bounds, WidgetContent::Items(items)))
    }

    /// Remove a widget and its whole subtree.
    pub fn remove(&mut self, widget: WidgetId) {
        let Some(node) = self.nodes.remove(&widget) else {
            return;
        };
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != widget);
        }
        for child in node.children {
            self.remove(child);
        }
    }

    pub fn set_visible(&mut self, widget: WidgetId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&widget) {
            node.visible = visible;
        }
    }

    pub fn set_bounds(&mut self, widget: WidgetId, bounds: Rect) {
        if let Some(node) = self.nodes.get_mut(&widget) {
            node.bounds = bounds;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth of the deepest widget below `root`, counting `root` as 1.
    pub fn depth(&self, root: WidgetId) -> usize {
        self.nodes.get(&root).map_or(0, |node| {
            1 + node
                .children
                .iter()
                .map(|c| self.depth(*c))
                .max()
                .unwrap_or(0)
        })
    }
}

impl WidgetHost for WidgetTree {
    fn is_alive(&self, widget: WidgetId) -> bool {
        self.nodes.contains_key(&widget)
    }

    fn type_tag(&self, widget: WidgetId) -> Option<TypeTag> {
        self.nodes.get(&widget).map(|n| n.tag)
    }

    fn is_visible(&self, widget: WidgetId) -> bool {
        let mut cursor = Some(widget);
        while let Some(id) = cursor {
            match self.nodes.get(&id) {
                Some(node) if node.visible => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }

    fn screen_bounds(&self, widget: WidgetId) -> Option<Rect> {
        let node = self.nodes.get(&widget)?;
        match node.parent {
            None => Some(node.bounds),
            Some(parent) => {
                let origin = self.screen_bounds(parent)?.min;
                Some(node.bounds.translate(origin))
            }
        }
    }

    fn child_at(&self, container: WidgetId, local: Vec2) -> Option<WidgetId> {
        let node = self.nodes.get(&container)?;
        node.children.iter().rev().copied().find(|child| {
            self.nodes
                .get(child)
                .is_some_and(|c| c.visible && c.bounds.contains(local))
        })
    }

    fn list_index_at(&self, container: WidgetId, local: Vec2) -> Option<usize> {
        let node = self.nodes.get(&container)?;
        let WidgetContent::List { row_height, rows } = node.content else {
            return None;
        };
        if row_height <= 0.0 || local.y < 0.0 || local.x < 0.0 || local.x >= node.bounds.width() {
            return None;
        }
        let index = (local.y / row_height) as usize;
        (index < rows).then_some(index)
    }

    fn list_item_bounds(&self, container: WidgetId, index: usize) -> Option<Rect> {
        let node = self.nodes.get(&container)?;
        let WidgetContent::List { row_height, rows } = node.content else {
            return None;
        };
        let top = index as f32 * row_height;
        (index < rows).then(|| Rect::from_xywh(0.0, top, node.bounds.width(), row_height))
    }

    fn item_at(&self, container: WidgetId, local: Vec2) -> Option<ItemHandle> {
        let node = self.nodes.get(&container)?;
        let WidgetContent::Items(items) = &node.content else {
            return None;
        };
        items
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(local))
            .map(|(item, _)| *item)
    }

    fn item_bounds(&self, container: WidgetId, item: ItemHandle) -> Option<Rect> {
        let node = self.nodes.get(&container)?;
        let WidgetContent::Items(items) = &node.content else {
            return None;
        };
        items.iter().find(|(h, _)| *h == item).map(|(_, rect)| *rect)
    }
}
