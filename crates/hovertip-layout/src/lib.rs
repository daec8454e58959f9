pub mod host;
pub mod placement;
pub mod render;
pub mod resolver;

pub use host::{WidgetContent, WidgetHost, WidgetTree};
pub use placement::{
    ArrowDirection, HorizontalSide, PlacementContext, PlacementMetrics, RenderPlacement,
    VerticalSide, needs_full_hide,
};
pub use render::{PaintCommand, TipGlyph, TipStyle, icon_rect, paint_commands, text_rect};
pub use resolver::{
    ChildAtPointResolver, DescendPolicy, FnResolver, ItemCollectionResolver, ListRowResolver,
    ResolverRegistry, TargetResolver,
};
