use crate::host::WidgetHost;
use hovertip_core::{LogicalTarget, TypeTag, Vec2, WidgetId};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Descends from a container to the most specific target under the pointer.
///
/// `pointer` is in screen coordinates. Returning `None` or the container
/// itself both end the descent.
pub trait TargetResolver {
    fn resolve(
        &self,
        host: &dyn WidgetHost,
        container: WidgetId,
        pointer: Vec2,
    ) -> Option<LogicalTarget>;
}

/// Plain containers: whatever child sits under the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildAtPointResolver;

impl TargetResolver for ChildAtPointResolver {
    fn resolve(
        &self,
        host: &dyn WidgetHost,
        container: WidgetId,
        pointer: Vec2,
    ) -> Option<LogicalTarget> {
        let local = host.to_local(container, pointer)?;
        host.child_at(container, local).map(LogicalTarget::Widget)
    }
}

/// Index-based lists. Dead space below the last row yields the list itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListRowResolver;

impl TargetResolver for ListRowResolver {
    fn resolve(
        &self,
        host: &dyn WidgetHost,
        container: WidgetId,
        pointer: Vec2,
    ) -> Option<LogicalTarget> {
        let local = host.to_local(container, pointer)?;
        Some(match host.list_index_at(container, local) {
            Some(index) => LogicalTarget::SubItem {
                container,
                index,
                local,
            },
            None => LogicalTarget::Widget(container),
        })
    }
}

/// Containers that expose their own item objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemCollectionResolver;

impl TargetResolver for ItemCollectionResolver {
    fn resolve(
        &self,
        host: &dyn WidgetHost,
        container: WidgetId,
        pointer: Vec2,
    ) -> Option<LogicalTarget> {
        let local = host.to_local(container, pointer)?;
        Some(match host.item_at(container, local) {
            Some(item) => LogicalTarget::Item { container, item },
            None => LogicalTarget::Widget(container),
        })
    }
}

type ResolveFn = dyn Fn(&dyn WidgetHost, WidgetId, Vec2) -> Option<LogicalTarget>;

/// Resolver backed by a user-supplied function.
pub struct FnResolver {
    f: Box<ResolveFn>,
}

impl FnResolver {
    pub fn new(
        f: impl Fn(&dyn WidgetHost, WidgetId, Vec2) -> Option<LogicalTarget> + 'static,
    ) -> Self {
        Self { f: Box::new(f) }
    }
}

impl TargetResolver for FnResolver {
    fn resolve(
        &self,
        host: &dyn WidgetHost,
        container: WidgetId,
        pointer: Vec2,
    ) -> Option<LogicalTarget> {
        (self.f)(host, container, pointer)
    }
}

/// When a registered resolver may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescendPolicy {
    Always,
    /// Only for containers explicitly opted in to per-item tips.
    OptIn,
}

struct ResolverEntry {
    resolver: Box<dyn TargetResolver>,
    policy: DescendPolicy,
}

/// Resolvers keyed by the container's type tag.
#[derive(Default)]
pub struct ResolverRegistry {
    entries: HashMap<TypeTag, ResolverEntry>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panels and windows descend to children, lists to rows (opt-in),
    /// item views and status bars to their items.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TypeTag::WINDOW, ChildAtPointResolver, DescendPolicy::Always);
        registry.register(TypeTag::PANEL, ChildAtPointResolver, DescendPolicy::Always);
        registry.register(TypeTag::LIST_BOX, ListRowResolver, DescendPolicy::OptIn);
        registry.register(
            TypeTag::ITEM_VIEW,
            ItemCollectionResolver,
            DescendPolicy::Always,
        );
        registry.register(
            TypeTag::STATUS_BAR,
            ItemCollectionResolver,
            DescendPolicy::Always,
        );
        registry
    }

    /// Register or replace the resolver for a container kind.
    pub fn register(
        &mut self,
        tag: TypeTag,
        resolver: impl TargetResolver + 'static,
        policy: DescendPolicy,
    ) {
        self.entries.insert(
            tag,
            ResolverEntry {
                resolver: Box::new(resolver),
                policy,
            },
        );
    }

    /// Find the most specific target under `pointer`, starting from the
    /// children of `root`.
    ///
    /// Descent stops when the current target has no usable resolver, when a
    /// resolver yields nothing, or when it yields a target already visited.
    pub fn resolve_chain(
        &self,
        host: &dyn WidgetHost,
        root: WidgetId,
        pointer: Vec2,
        opted_in: &HashSet<WidgetId>,
    ) -> Option<LogicalTarget> {
        let mut target = ChildAtPointResolver.resolve(host, root, pointer)?;
        let mut visited = HashSet::from([LogicalTarget::Widget(root), target]);

        while let Some(container) = target.as_widget() {
            let tag = host.type_tag(container);
            let Some(entry) = tag.and_then(|t| self.entries.get(&t)) else {
                break;
            };
            if entry.policy == DescendPolicy::OptIn && !opted_in.contains(&container) {
                break;
            }
            let Some(next) = entry.resolver.resolve(host, container, pointer) else {
                break;
            };
            if !visited.insert(next) {
                break;
            }
            trace!(from = %target, to = %next, "descend");
            target = next;
        }

        Some(target)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::host::WidgetTree;
    use hovertip_core::Rect;
    use proptest::prelude::*;

    /// A chain of panels nested `depth` deep, each inset by 5px.
    fn nested(depth: usize) -> (WidgetTree, WidgetId, Vec<WidgetId>) {
        let mut tree = WidgetTree::new();
        let window = tree.add_window(Rect::from_xywh(0.0, 0.0, 1000.0, 1000.0));
        let mut chain = Vec::new();
        let mut parent = window;
        let mut size = 990.0;
        for _ in 0..depth {
            let id = tree
                .add_child(
                    parent,
                    TypeTag::PANEL,
                    Rect::from_xywh(5.0, 5.0, size, size),
                )
                .unwrap();
            chain.push(id);
            parent = id;
            size -= 10.0;
        }
        (tree, window, chain)
    }

    proptest! {
        #[test]
        fn prop_chain_reaches_innermost_panel(depth in 1usize..40, self_loop in any::<bool>()) {
            let (tree, window, chain) = nested(depth);
            let mut registry = ResolverRegistry::with_defaults();
            if self_loop {
                registry.register(
                    TypeTag::PANEL,
                    FnResolver::new(|host, container, pointer| {
                        ChildAtPointResolver
                            .resolve(host, container, pointer)
                            .or(Some(LogicalTarget::Widget(container)))
                    }),
                    DescendPolicy::Always,
                );
            }
            let pointer = Vec2::new(500.0, 500.0);
            let target = registry.resolve_chain(&tree, window, pointer, &HashSet::new());
            prop_assert_eq!(target, chain.last().copied().map(LogicalTarget::Widget));
            prop_assert_eq!(tree.depth(window), depth + 1);
        }
    }
}
