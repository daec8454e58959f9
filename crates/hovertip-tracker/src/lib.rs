//! Hover tracking for tooltips: decides which logical target owns the tip,
//! when it appears and hides, and where the popup goes.

pub mod config;
pub mod platform;
pub mod provider;
pub mod sim;
pub mod tracker;

pub use config::TooltipConfig;
pub use platform::{BoundsFlags, PopupStyle, PopupSurface, Scheduler, TimerToken};
pub use provider::{
    CollectionItemTipProvider, ListRowTipProvider, ProviderRegistry, TipBook, TipDataProvider,
    WidgetTipProvider,
};
pub use sim::{ManualScheduler, RecordingSurface, SurfaceCall};
pub use tracker::HoverTracker;
