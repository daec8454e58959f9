use crate::config::TooltipConfig;
use crate::platform::{BoundsFlags, PopupStyle, PopupSurface, Scheduler, TimerToken};
use crate::provider::{ProviderRegistry, TipDataProvider};
use hovertip_core::{
    IconKind, LogicalTarget, Rect, TipContent, TipError, TypeTag, Vec2, WidgetId, WindowHandle,
};
use hovertip_events::{EventBus, EventKind, FilterOutcome, InputEvent, TooltipEvent, telemetry};
use hovertip_layout::{
    PaintCommand, PlacementContext, RenderPlacement, ResolverRegistry, WidgetHost, paint_commands,
};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy)]
struct PendingShow {
    token: TimerToken,
    target: LogicalTarget,
}

/// Decides which target owns the tooltip and drives the popup surface.
///
/// One tracker serves one host window for that window's lifetime. All entry
/// points run on the UI thread: [`handle_input`](Self::handle_input) for the
/// input filter, [`on_timer`](Self::on_timer) for expired timers and
/// [`paint`](Self::paint) for the popup's paint callback.
pub struct HoverTracker<S: PopupSurface, K: Scheduler> {
    config: TooltipConfig,
    surface: S,
    scheduler: K,
    host_root: WidgetId,
    popup: Option<WindowHandle>,
    resolvers: ResolverRegistry,
    providers: ProviderRegistry,
    item_tip_containers: HashSet<WidgetId>,
    events: Option<EventBus>,

    /// Set exactly while the popup is visible.
    current: Option<LogicalTarget>,
    pending_show: Option<PendingShow>,
    manual: Option<LogicalTarget>,
    /// Recently hidden target, for reshowing without delay.
    last: Option<LogicalTarget>,
    last_shown_at: Option<Instant>,
    placement: Option<RenderPlacement>,
    hide_timer: Option<TimerToken>,
    cycle_id: String,

    filter_registered: bool,
    disposing: bool,
}

impl<S: PopupSurface, K: Scheduler> HoverTracker<S, K> {
    /// Create the tracker and its popup window for the host window whose
    /// widget tree is rooted at `host_root`.
    pub fn new(
        config: TooltipConfig,
        host_root: WidgetId,
        host_window: WindowHandle,
        mut surface: S,
        scheduler: K,
        providers: ProviderRegistry,
    ) -> Result<Self, TipError> {
        config.validate()?;
        let popup = surface.create_popup(host_window, PopupStyle::default())?;
        debug!(root = %host_root, popup = popup.0, "tooltip popup created");
        Ok(Self {
            config,
            surface,
            scheduler,
            host_root,
            popup: Some(popup),
            resolvers: ResolverRegistry::with_defaults(),
            providers,
            item_tip_containers: HashSet::new(),
            events: None,
            current: None,
            pending_show: None,
            manual: None,
            last: None,
            last_shown_at: None,
            placement: None,
            hide_timer: None,
            cycle_id: String::new(),
            filter_registered: false,
            disposing: false,
        })
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn config(&self) -> &TooltipConfig {
        &self.config
    }

    pub fn resolvers_mut(&mut self) -> &mut ResolverRegistry {
        &mut self.resolvers
    }

    pub fn providers_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.providers
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &K {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut K {
        &mut self.scheduler
    }

    pub fn popup(&self) -> Option<WindowHandle> {
        self.popup
    }

    pub fn current_target(&self) -> Option<LogicalTarget> {
        self.current
    }

    pub fn pending_target(&self) -> Option<LogicalTarget> {
        self.pending_show.map(|p| p.target)
    }

    pub fn manual_target(&self) -> Option<LogicalTarget> {
        self.manual
    }

    pub fn last_target(&self) -> Option<LogicalTarget> {
        self.last
    }

    pub fn placement(&self) -> Option<&RenderPlacement> {
        self.placement.as_ref()
    }

    pub fn is_filter_registered(&self) -> bool {
        self.filter_registered
    }

    pub fn is_disposed(&self) -> bool {
        self.disposing
    }

    /// Opt a list container in or out of per-row tips.
    pub fn set_item_tips(&mut self, container: WidgetId, enabled: bool) {
        if enabled {
            self.item_tip_containers.insert(container);
        } else {
            self.item_tip_containers.remove(&container);
        }
    }

    pub fn item_tips_enabled(&self, container: WidgetId) -> bool {
        self.item_tip_containers.contains(&container)
    }

    /// Turn automatic tips on or off. Turning them off hides whatever shows.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.cancel_show_timer();
            self.hide_full("disabled");
        }
    }

    /// Register the input filter while the host window is foreground and
    /// drop it otherwise.
    pub fn set_foreground(&mut self, foreground: bool) {
        if self.disposing || self.filter_registered == foreground {
            return;
        }
        self.filter_registered = foreground;
        debug!(foreground, "input filter registration changed");
        if !foreground {
            self.cancel_show_timer();
        }
    }

    /// Input filter entry point. Never consumes the message.
    pub fn handle_input(
        &mut self,
        host: &dyn WidgetHost,
        event: &InputEvent,
    ) -> Result<FilterOutcome, TipError> {
        if self.disposing || !self.filter_registered || !self.config.enabled {
            return Ok(FilterOutcome::NotConsumed);
        }
        match event.kind {
            EventKind::MouseMove => self.on_pointer_move(host, event.pointer)?,
            EventKind::MouseLeave => self.on_pointer_leave(host, event),
            EventKind::KeyDown => {
                self.hide_full("key_down");
                self.cancel_show_timer();
            }
            EventKind::Other => {}
        }
        Ok(FilterOutcome::NotConsumed)
    }

    /// Timer expiry entry point. Tokens that are no longer armed are ignored.
    pub fn on_timer(&mut self, host: &dyn WidgetHost, token: TimerToken) -> Result<(), TipError> {
        if self.disposing {
            return Ok(());
        }
        if let Some(pending) = self.pending_show.filter(|p| p.token == token) {
            self.pending_show = None;
            if self.manual.is_some() {
                trace!("show timer ignored while a manual tip is up");
                return Ok(());
            }
            return self.do_show(host, pending.target);
        }
        if self.hide_timer == Some(token) {
            self.hide_timer = None;
            self.hide_full("hide_timer");
            return Ok(());
        }
        trace!(token = token.0, "stale timer");
        Ok(())
    }

    /// Show `text` for `target` right away, overriding hover tracking until
    /// [`hide`](Self::hide) is called or `delay` (default: the configured
    /// hide delay) runs out.
    pub fn show(
        &mut self,
        host: &dyn WidgetHost,
        target: LogicalTarget,
        icon: IconKind,
        delay: Option<Duration>,
        text: &str,
    ) -> Result<(), TipError> {
        if self.disposing {
            return Ok(());
        }
        let tag = host
            .target_tag(&target)
            .ok_or(TipError::StaleTargetReference { target })?;
        let provider = self.lookup_provider(tag, &target)?;
        if !provider.visible(host, &target) {
            telemetry::tip_aborted(&target, "target not visible", false);
            return Ok(());
        }
        let bounds = provider
            .bounds(host, &target)
            .ok_or(TipError::StaleTargetReference { target })?;

        self.manual = Some(target);
        let content = TipContent::new(icon, text, delay);
        self.present(host, target, content, bounds, true);
        Ok(())
    }

    /// Hide a tip shown with [`show`](Self::show). Hover tips expire on
    /// their own and are left alone.
    pub fn hide(&mut self) {
        if self.manual.is_some() {
            self.hide_full("manual_hide");
        }
    }

    /// Draw list for the popup's paint callback, in popup-local coordinates.
    pub fn paint(&self) -> Vec<PaintCommand> {
        self.placement
            .as_ref()
            .map(|p| paint_commands(p, &self.config.metrics, &self.config.style))
            .unwrap_or_default()
    }

    /// Cancel timers, drop the input filter and destroy the popup.
    /// Later calls into the tracker do nothing.
    pub fn shutdown(&mut self) {
        if self.disposing {
            return;
        }
        self.disposing = true;
        self.cancel_show_timer();
        self.cancel_hide_timer();
        self.filter_registered = false;
        if let Some(popup) = self.popup.take() {
            if self.current.is_some() {
                self.surface.hide(popup);
            }
            self.surface.destroy_popup(popup);
        }
        self.current = None;
        self.manual = None;
        self.last = None;
        self.placement = None;
        debug!(root = %self.host_root, "tooltip tracker shut down");
    }

    /// Most specific target under `pointer`, if any.
    pub fn find_current_target(
        &self,
        host: &dyn WidgetHost,
        pointer: Vec2,
    ) -> Option<LogicalTarget> {
        if !host.is_alive(self.host_root) {
            return None;
        }
        self.resolvers
            .resolve_chain(host, self.host_root, pointer, &self.item_tip_containers)
    }

    fn on_pointer_move(&mut self, host: &dyn WidgetHost, pointer: Vec2) -> Result<(), TipError> {
        let target = self.find_current_target(host, pointer);

        if let Some(target) = target {
            let known = [self.pending_target(), self.last, self.current, self.manual];
            if !known.contains(&Some(target)) {
                self.cancel_show_timer();
                let delay = self.show_delay_for(host, &target)?;
                if !delay.is_zero() {
                    let token = self.scheduler.arm(delay);
                    self.pending_show = Some(PendingShow { token, target });
                    trace!(%target, ?delay, "show timer armed");
                } else if self.manual.is_none() {
                    self.do_show(host, target)?;
                }
            }
        }

        if self.last.is_some() && target != self.last && self.reshow_window_expired() {
            trace!("reshow window expired");
            self.last = None;
        }

        if let (Some(target), None) = (target, self.manual) {
            match (self.current, self.last) {
                (Some(current), _) if current != target => self.do_show(host, target)?,
                // Reshow fast path runs only while no tip is up, never over a
                // tip that is already showing.
                (None, Some(last)) if last != target => self.do_show(host, target)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn on_pointer_leave(&mut self, host: &dyn WidgetHost, event: &InputEvent) {
        let target = self.find_current_target(host, event.pointer);
        let on_popup = self
            .popup
            .is_some_and(|p| p == event.target || p == event.foreground);
        let has_bounds = self
            .placement
            .as_ref()
            .is_some_and(|p| !p.bounds().is_empty());
        if self.manual.is_none() && self.current != target && !on_popup && has_bounds {
            self.hide_full("pointer_leave");
        }
        self.cancel_show_timer();
    }

    fn show_delay_for(
        &self,
        host: &dyn WidgetHost,
        target: &LogicalTarget,
    ) -> Result<Duration, TipError> {
        let mut delay = self.config.show_delay();
        if let Some(tag) = host.target_tag(target) {
            self.lookup_provider(tag, target)?
                .show_interval(host, target, &mut delay);
        }
        Ok(delay)
    }

    fn reshow_window_expired(&self) -> bool {
        match self.last_shown_at {
            Some(at) => self.scheduler.now() > at + self.config.reshow_delay(),
            None => true,
        }
    }

    fn lookup_provider(
        &self,
        tag: TypeTag,
        target: &LogicalTarget,
    ) -> Result<&dyn TipDataProvider, TipError> {
        self.providers.lookup(tag).inspect_err(|e| {
            telemetry::tip_aborted(target, &e.to_string(), true);
        })
    }

    fn do_show(&mut self, host: &dyn WidgetHost, target: LogicalTarget) -> Result<(), TipError> {
        let Some(tag) = host.target_tag(&target) else {
            telemetry::tip_aborted(&target, "stale target", false);
            return Ok(());
        };
        let provider = self.lookup_provider(tag, &target)?;
        if !provider.visible(host, &target) {
            telemetry::tip_aborted(&target, "target not visible", false);
            return Ok(());
        }
        let text = provider.tip(host, &target);
        if TipContent::is_blank(&text) {
            trace!(%target, "no tip text");
            return Ok(());
        }
        let content = match TipContent::parse(&text) {
            Ok(content) => content,
            Err(e) => {
                telemetry::tip_aborted(&target, &e.to_string(), false);
                return Ok(());
            }
        };
        let Some(bounds) = provider.bounds(host, &target) else {
            telemetry::tip_aborted(&target, "stale target", false);
            return Ok(());
        };

        self.present(host, target, content, bounds, false);
        Ok(())
    }

    fn present(
        &mut self,
        host: &dyn WidgetHost,
        target: LogicalTarget,
        content: TipContent,
        target_bounds: Rect,
        manual: bool,
    ) {
        let Some(popup) = self.popup else {
            return;
        };
        let screen = self.surface.screen_bounds();
        let ctx = PlacementContext {
            target: target_bounds,
            host: host.screen_bounds(self.host_root).unwrap_or(screen),
            screen,
        };
        let metrics = self.config.metrics;
        let size = metrics.popup_size(self.surface.measure_text(content.text()));
        let hide_delay = content.delay().unwrap_or(self.config.hide_delay());
        let icon = content.icon();
        let placement = RenderPlacement::compute(content, &ctx, &metrics, size);

        let threshold = self.config.overlap_threshold_percent;
        if placement.needs_full_hide(self.placement.as_ref(), threshold) {
            self.hide_full("replaced");
        }
        if manual {
            self.manual = Some(target);
        }

        let bounds = placement.bounds();
        self.surface.set_popup_bounds(popup, bounds, BoundsFlags::default());
        if self.current.is_none() {
            self.cycle_id = telemetry::new_cycle_id();
            self.surface.show(popup);
            telemetry::tip_shown(&self.cycle_id, &target, bounds, manual);
            self.publish(TooltipEvent::Shown {
                target,
                bounds,
                icon,
                manual,
            });
        } else {
            self.surface.invalidate(popup);
            telemetry::tip_moved(&self.cycle_id, &target, bounds);
            self.publish(TooltipEvent::Moved { target, bounds });
        }

        self.current = Some(target);
        self.placement = Some(placement);
        self.cancel_show_timer();
        self.cancel_hide_timer();
        if !hide_delay.is_zero() {
            self.hide_timer = Some(self.scheduler.arm(hide_delay));
        }
    }

    /// Hide the popup and remember what was showing. Does nothing when no
    /// tip is up.
    fn hide_full(&mut self, reason: &str) {
        let Some(current) = self.current else {
            return;
        };
        self.cancel_hide_timer();
        if let Some(popup) = self.popup {
            self.surface.hide(popup);
        }
        if self.manual.is_none() {
            self.last = Some(current);
        }
        self.current = None;
        self.placement = None;
        self.manual = None;
        self.last_shown_at = Some(self.scheduler.now());
        telemetry::tip_hidden(&self.cycle_id, &current, reason);
        self.publish(TooltipEvent::Hidden { target: current });
    }

    fn cancel_show_timer(&mut self) {
        if let Some(pending) = self.pending_show.take() {
            self.scheduler.cancel(pending.token);
        }
    }

    fn cancel_hide_timer(&mut self) {
        if let Some(token) = self.hide_timer.take() {
            self.scheduler.cancel(token);
        }
    }

    fn publish(&self, event: TooltipEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}

impl<S: PopupSurface, K: Scheduler> Drop for HoverTracker<S, K> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::TipBook;
    use crate::sim::{ManualScheduler, RecordingSurface};
    use hovertip_core::TypeTag;
    use hovertip_layout::{ChildAtPointResolver, DescendPolicy, WidgetTree};

    fn tracker(
        tree: &mut WidgetTree,
    ) -> (HoverTracker<RecordingSurface, ManualScheduler>, WidgetId) {
        let root = tree.add_window(Rect::from_xywh(0.0, 0.0, 400.0, 300.0));
        let bounds = Rect::from_xywh(10.0, 10.0, 50.0, 20.0);
        let button = tree.add_child(root, TypeTag::BUTTON, bounds).unwrap();
        let book = TipBook::new();
        book.set_tip(button, "Save");
        let tracker = HoverTracker::new(
            TooltipConfig::default(),
            root,
            WindowHandle(7),
            RecordingSurface::new(Rect::from_xywh(0.0, 0.0, 1024.0, 768.0)),
            ManualScheduler::new(),
            ProviderRegistry::with_defaults(book),
        )
        .unwrap();
        (tracker, button)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TooltipConfig {
            overlap_threshold_percent: 250.0,
            ..TooltipConfig::default()
        };
        let result = HoverTracker::new(
            config,
            WidgetId(1),
            WindowHandle(7),
            RecordingSurface::new(Rect::from_xywh(0.0, 0.0, 10.0, 10.0)),
            ManualScheduler::new(),
            ProviderRegistry::new(),
        );
        assert!(matches!(result, Err(TipError::Config(_))));
    }

    #[test]
    fn test_no_target_once_root_is_gone() {
        let mut tree = WidgetTree::new();
        let (tracker, button) = tracker(&mut tree);
        let pointer = Vec2::new(20.0, 15.0);
        assert_eq!(
            tracker.find_current_target(&tree, pointer),
            Some(LogicalTarget::Widget(button))
        );
        tree.remove(tracker.host_root);
        assert_eq!(tracker.find_current_target(&tree, pointer), None);
    }

    #[test]
    fn test_show_timer_replaced_not_stacked() {
        let mut tree = WidgetTree::new();
        let (mut tracker, _) = tracker(&mut tree);
        let bounds = Rect::from_xywh(100.0, 10.0, 50.0, 20.0);
        let other = tree
            .add_child(tracker.host_root, TypeTag::LABEL, bounds)
            .unwrap();
        tracker.set_foreground(true);

        let first = InputEvent::mouse_move(WindowHandle(7), Vec2::new(20.0, 15.0));
        tracker.handle_input(&tree, &first).unwrap();
        let second = InputEvent::mouse_move(WindowHandle(7), Vec2::new(120.0, 15.0));
        tracker.handle_input(&tree, &second).unwrap();
        assert_eq!(tracker.scheduler().pending(), 1);
        assert_eq!(tracker.pending_target(), Some(LogicalTarget::Widget(other)));
    }

    #[test]
    fn test_custom_container_registered_at_runtime() {
        let mut tree = WidgetTree::new();
        let root = tree.add_window(Rect::from_xywh(0.0, 0.0, 400.0, 300.0));
        let toolbar_tag = TypeTag::new("toolbar");
        let bar_bounds = Rect::from_xywh(10.0, 50.0, 200.0, 30.0);
        let toolbar = tree.add_child(root, toolbar_tag, bar_bounds).unwrap();
        let tool_bounds = Rect::from_xywh(5.0, 5.0, 40.0, 20.0);
        let tool = tree.add_child(toolbar, TypeTag::BUTTON, tool_bounds).unwrap();
        let book = TipBook::new();
        book.set_tip(tool, "Cut");
        let mut tracker = HoverTracker::new(
            TooltipConfig::default(),
            root,
            WindowHandle(7),
            RecordingSurface::new(Rect::from_xywh(0.0, 0.0, 1024.0, 768.0)),
            ManualScheduler::new(),
            ProviderRegistry::with_defaults(book),
        )
        .unwrap();
        tracker.set_foreground(true);

        let pointer = Vec2::new(20.0, 60.0);
        assert_eq!(
            tracker.find_current_target(&tree, pointer),
            Some(LogicalTarget::Widget(toolbar))
        );

        tracker
            .resolvers_mut()
            .register(toolbar_tag, ChildAtPointResolver, DescendPolicy::Always);
        tracker
            .providers_mut()
            .register_fallback(toolbar_tag, TypeTag::WIDGET)
            .unwrap();
        assert_eq!(
            tracker.find_current_target(&tree, pointer),
            Some(LogicalTarget::Widget(tool))
        );

        let event = InputEvent::mouse_move(WindowHandle(7), pointer);
        tracker.handle_input(&tree, &event).unwrap();
        tracker.advance(&tree, Duration::from_secs(5)).unwrap();
        assert_eq!(tracker.current_target(), Some(LogicalTarget::Widget(tool)));
    }

    #[test]
    fn test_stale_token_ignored() {
        let mut tree = WidgetTree::new();
        let (mut tracker, _) = tracker(&mut tree);
        tracker.on_timer(&tree, TimerToken(99)).unwrap();
        assert_eq!(tracker.current_target(), None);
        assert_eq!(tracker.surface().calls().len(), 1);
    }

    #[test]
    fn test_shutdown_destroys_popup() {
        let mut tree = WidgetTree::new();
        let (mut tracker, _) = tracker(&mut tree);
        tracker.shutdown();
        assert_eq!(tracker.popup(), None);
        assert_eq!(
            tracker.surface().calls().last(),
            Some(&crate::sim::SurfaceCall::Destroy)
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::provider::TipBook;
    use crate::sim::{ManualScheduler, RecordingSurface};
    use hovertip_core::TypeTag;
    use hovertip_layout::WidgetTree;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Move(f32, f32),
        Leave,
        Key,
        Wait(u64),
        Show(bool),
        Hide,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0.0f32..300.0, 0.0f32..200.0).prop_map(|(x, y)| Op::Move(x, y)),
            1 => Just(Op::Leave),
            1 => Just(Op::Key),
            3 => (0u64..6000).prop_map(Op::Wait),
            1 => any::<bool>().prop_map(Op::Show),
            1 => Just(Op::Hide),
        ]
    }

    proptest! {
        #[test]
        fn prop_popup_visibility_tracks_current_target(ops in prop::collection::vec(op(), 1..60)) {
            let mut tree = WidgetTree::new();
            let root = tree.add_window(Rect::from_xywh(0.0, 0.0, 300.0, 200.0));
            let a_bounds = Rect::from_xywh(10.0, 10.0, 40.0, 20.0);
            let a = tree.add_child(root, TypeTag::BUTTON, a_bounds).unwrap();
            let b_bounds = Rect::from_xywh(60.0, 10.0, 40.0, 20.0);
            let b = tree.add_child(root, TypeTag::BUTTON, b_bounds).unwrap();
            let list_bounds = Rect::from_xywh(10.0, 50.0, 100.0, 100.0);
            let list = tree.add_list(root, list_bounds, 20.0, 5).unwrap();
            let instant_bounds = Rect::from_xywh(150.0, 50.0, 100.0, 40.0);
            let instant = tree.add_child(root, TypeTag::LABEL, instant_bounds).unwrap();

            let book = TipBook::new();
            book.set_tip(a, "A");
            book.set_tip(b, "!B");
            for row in 0..5 {
                book.set_row_tip(list, row, format!("row {row}"));
            }
            book.set_tip(instant, "Z");
            book.set_show_interval(instant, Duration::ZERO);

            let host = WindowHandle(1);
            let mut tracker = HoverTracker::new(
                TooltipConfig::default(),
                root,
                host,
                RecordingSurface::new(Rect::from_xywh(0.0, 0.0, 640.0, 480.0)),
                ManualScheduler::new(),
                ProviderRegistry::with_defaults(book),
            )
            .unwrap();
            tracker.set_foreground(true);
            tracker.set_item_tips(list, true);

            for op in ops {
                match op {
                    Op::Move(x, y) => {
                        let event = InputEvent::mouse_move(host, Vec2::new(x, y));
                        tracker.handle_input(&tree, &event).unwrap();
                    }
                    Op::Leave => {
                        let event = InputEvent::mouse_leave(host, Vec2::new(-5.0, -5.0));
                        tracker.handle_input(&tree, &event).unwrap();
                    }
                    Op::Key => {
                        tracker.handle_input(&tree, &InputEvent::key_down(host)).unwrap();
                    }
                    Op::Wait(ms) => tracker.advance(&tree, Duration::from_millis(ms)).unwrap(),
                    Op::Show(first) => {
                        let target = LogicalTarget::Widget(if first { a } else { b });
                        tracker.show(&tree, target, IconKind::Question, None, "manual").unwrap();
                    }
                    Op::Hide => tracker.hide(),
                }

                let showing = tracker.current_target().is_some();
                prop_assert_eq!(showing, tracker.surface().is_visible());
                prop_assert_eq!(showing, tracker.placement().is_some());
                prop_assert!(tracker.scheduler().pending() <= 2);
                if let Some(manual) = tracker.manual_target() {
                    prop_assert_eq!(tracker.current_target(), Some(manual));
                }
                if let Some(bounds) = tracker.placement().map(|p| p.bounds()) {
                    prop_assert_eq!(tracker.surface().bounds(), bounds);
                }
            }
        }
    }
}
