use hovertip_core::{Rect, TipContent, Vec2};
use serde::{Deserialize, Serialize};

/// Side of the popup the icon sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalSide {
    Left,
    Right,
}

/// Edge of the popup the icon row sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalSide {
    Top,
    Bottom,
}

/// Where the arrow glyph of an Arrow tip points, relative to the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrowDirection {
    Up,
    Down,
    UpRight,
    DownRight,
}

/// Fixed spacing used to size and position the popup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementMetrics {
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub padding: f32,
    pub border: f32,
    pub icon_size: Vec2,
}

impl Default for PlacementMetrics {
    fn default() -> Self {
        Self {
            margin_top: 2.0,
            margin_bottom: 2.0,
            margin_left: 2.0,
            margin_right: 2.0,
            padding: 2.0,
            border: 1.0,
            icon_size: Vec2::new(16.0, 16.0),
        }
    }
}

impl PlacementMetrics {
    /// Outer popup size for a measured text block: border, padding around
    /// and between the icon slot and the text.
    pub fn popup_size(&self, text: Vec2) -> Vec2 {
        let chrome = self.border * 2.0 + self.padding * 2.0;
        Vec2::new(
            chrome + self.icon_size.x + self.padding + text.x,
            chrome + self.icon_size.y.max(text.y),
        )
    }
}

/// Rectangles a placement is computed against, all in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementContext {
    pub target: Rect,
    /// Bounds of the host window.
    pub host: Rect,
    /// Bounds of the monitor the host is on.
    pub screen: Rect,
}

/// Geometry and orientation of one popup showing.
///
/// The orientation changes are one-way; compute a fresh placement for every
/// decision instead of reusing one that has already been flipped.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlacement {
    content: TipContent,
    bounds: Rect,
    horizontal: HorizontalSide,
    vertical: VerticalSide,
    arrow: ArrowDirection,
}

impl RenderPlacement {
    /// Unplaced popup: icon top-left, arrow pointing up at the target.
    pub fn new(content: TipContent) -> Self {
        Self {
            content,
            bounds: Rect::NOTHING,
            horizontal: HorizontalSide::Left,
            vertical: VerticalSide::Top,
            arrow: ArrowDirection::Up,
        }
    }

    /// Place a popup of `size` next to `ctx.target`.
    ///
    /// The popup starts below the target, left-aligned with it. It moves
    /// above the target when it would run past the host's bottom edge and
    /// is short enough for that to help. It swings to the left, right-aligned
    /// with the target, when it would run past the host's right edge and the
    /// flipped position still fits, or whenever it would leave the screen.
    pub fn compute(
        content: TipContent,
        ctx: &PlacementContext,
        metrics: &PlacementMetrics,
        size: Vec2,
    ) -> Self {
        let mut placement = Self::new(content);
        let target = ctx.target;

        let mut rect = Rect::from_pos_size(
            Vec2::new(
                target.min.x + metrics.margin_left,
                target.max.y + metrics.margin_top,
            ),
            size,
        );

        if rect.max.y > ctx.host.max.y && rect.height() < ctx.host.height() {
            rect = rect.with_min(Vec2::new(
                rect.min.x,
                target.min.y - metrics.margin_bottom - rect.height(),
            ));
            placement.move_icon_down();
        }

        let is_out_of_right = rect.max.x > ctx.host.max.x;
        let future_left = target.max.x - metrics.margin_right - rect.width();
        let is_out_of_left = future_left < ctx.host.min.x;
        let narrower_than_window = rect.width() < ctx.host.width();
        let is_out_of_screen = rect.max.x > ctx.screen.max.x;
        if (is_out_of_right && !is_out_of_left && narrower_than_window) || is_out_of_screen {
            rect = rect.with_min(Vec2::new(future_left, rect.min.y));
            placement.move_icon_right();
        }

        if rect.width() * 2.0 < target.width() {
            placement.redirect_arrow_right();
        }

        placement.bounds = rect;
        placement
    }

    /// Popup sits above the target: icon row moves to the bottom edge.
    pub fn move_icon_down(&mut self) {
        self.vertical = VerticalSide::Bottom;
        self.arrow = match self.arrow {
            ArrowDirection::Up | ArrowDirection::Down => ArrowDirection::Down,
            ArrowDirection::UpRight | ArrowDirection::DownRight => ArrowDirection::DownRight,
        };
    }

    /// Popup sits left of the target's right edge: icon moves to the right.
    pub fn move_icon_right(&mut self) {
        self.horizontal = HorizontalSide::Right;
        self.point_arrow_right();
    }

    /// Content much narrower than the target: point the arrow along it.
    pub fn redirect_arrow_right(&mut self) {
        self.point_arrow_right();
    }

    fn point_arrow_right(&mut self) {
        self.arrow = match self.arrow {
            ArrowDirection::Up | ArrowDirection::UpRight => ArrowDirection::UpRight,
            ArrowDirection::Down | ArrowDirection::DownRight => ArrowDirection::DownRight,
        };
    }

    pub fn content(&self) -> &TipContent {
        &self.content
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn horizontal(&self) -> HorizontalSide {
        self.horizontal
    }

    pub fn vertical(&self) -> VerticalSide {
        self.vertical
    }

    pub fn arrow(&self) -> ArrowDirection {
        self.arrow
    }

    /// Whether switching from `previous` to `self` needs a hide/show cycle
    /// rather than a plain move.
    pub fn needs_full_hide(
        &self,
        previous: Option<&RenderPlacement>,
        threshold_percent: f32,
    ) -> bool {
        needs_full_hide(previous.map(|p| p.bounds), self.bounds, threshold_percent)
    }
}

/// True unless at least `threshold_percent` of `next` overlaps `previous`.
pub fn needs_full_hide(previous: Option<Rect>, next: Rect, threshold_percent: f32) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    let Some(overlap) = previous.intersection(&next) else {
        return true;
    };
    let area = next.area();
    if area <= 0.0 {
        return true;
    }
    overlap.area() * 100.0 / area < threshold_percent
}

#[cfg(test)]
mod tests {
    use super::*;
    use hovertip_core::IconKind;

    fn content() -> TipContent {
        TipContent::new(IconKind::Arrow, "Hello", None)
    }

    fn metrics() -> PlacementMetrics {
        PlacementMetrics {
            margin_top: 2.0,
            margin_bottom: 2.0,
            margin_left: 2.0,
            margin_right: 2.0,
            padding: 2.0,
            border: 2.0,
            icon_size: Vec2::new(16.0, 16.0),
        }
    }

    fn ctx(target: Rect) -> PlacementContext {
        PlacementContext {
            target,
            host: Rect::from_xywh(0.0, 0.0, 800.0, 600.0),
            screen: Rect::from_xywh(0.0, 0.0, 1920.0, 1080.0),
        }
    }

    const HELLO: Vec2 = Vec2::new(40.0, 16.0);

    #[test]
    fn test_popup_size() {
        // 2 border + 2 padding each side, 16 icon, 2 gap, 40 text.
        assert_eq!(metrics().popup_size(HELLO), Vec2::new(66.0, 24.0));
    }

    #[test]
    fn test_default_placement_below_left() {
        let m = metrics();
        let button = Rect::from_xywh(10.0, 10.0, 80.0, 30.0);
        let p = RenderPlacement::compute(content(), &ctx(button), &m, m.popup_size(HELLO));
        assert_eq!(p.bounds(), Rect::from_xywh(12.0, 42.0, 66.0, 24.0));
        assert_eq!(p.horizontal(), HorizontalSide::Left);
        assert_eq!(p.vertical(), VerticalSide::Top);
        assert_eq!(p.arrow(), ArrowDirection::Up);
    }

    #[test]
    fn test_flips_above_near_bottom() {
        let m = metrics();
        let button = Rect::from_xywh(10.0, 570.0, 80.0, 25.0);
        let p = RenderPlacement::compute(content(), &ctx(button), &m, m.popup_size(HELLO));
        assert_eq!(p.bounds(), Rect::from_xywh(12.0, 544.0, 66.0, 24.0));
        assert_eq!(p.vertical(), VerticalSide::Bottom);
        assert_eq!(p.arrow(), ArrowDirection::Down);
    }

    #[test]
    fn test_button_at_bottom_edge_gets_tip_above() {
        let m = metrics();
        let button = Rect::from_xywh(10.0, 590.0, 80.0, 20.0);
        let p = RenderPlacement::compute(content(), &ctx(button), &m, m.popup_size(HELLO));
        assert_eq!(p.bounds(), Rect::from_xywh(12.0, 564.0, 66.0, 24.0));
        assert_eq!(p.bounds().max.y, 588.0);
        assert_eq!(p.vertical(), VerticalSide::Bottom);
        assert_eq!(p.arrow(), ArrowDirection::Down);
    }

    #[test]
    fn test_does_not_flip_when_taller_than_host() {
        let m = metrics();
        let button = Rect::from_xywh(10.0, 570.0, 80.0, 25.0);
        let p = RenderPlacement::compute(content(), &ctx(button), &m, Vec2::new(66.0, 700.0));
        assert_eq!(p.bounds().min.y, 597.0);
        assert_eq!(p.vertical(), VerticalSide::Top);
    }

    #[test]
    fn test_flips_left_near_right_edge() {
        let m = metrics();
        let button = Rect::from_xywh(740.0, 10.0, 50.0, 30.0);
        let p = RenderPlacement::compute(content(), &ctx(button), &m, m.popup_size(HELLO));
        // Right edge of the popup sits 2px inside the button's right edge.
        assert_eq!(p.bounds(), Rect::from_xywh(722.0, 42.0, 66.0, 24.0));
        assert_eq!(p.horizontal(), HorizontalSide::Right);
        assert_eq!(p.arrow(), ArrowDirection::UpRight);
    }

    #[test]
    fn test_stays_when_flipping_would_leave_host_on_the_left() {
        let m = metrics();
        let c = PlacementContext {
            target: Rect::from_xywh(30.0, 10.0, 20.0, 20.0),
            host: Rect::from_xywh(0.0, 0.0, 100.0, 600.0),
            screen: Rect::from_xywh(0.0, 0.0, 1920.0, 1080.0),
        };
        let p = RenderPlacement::compute(content(), &c, &m, Vec2::new(90.0, 24.0));
        assert_eq!(p.horizontal(), HorizontalSide::Left);
        assert_eq!(p.bounds().min.x, 32.0);
    }

    #[test]
    fn test_screen_overflow_always_flips() {
        let m = metrics();
        let c = PlacementContext {
            target: Rect::from_xywh(1880.0, 10.0, 30.0, 20.0),
            host: Rect::from_xywh(0.0, 0.0, 2500.0, 600.0),
            screen: Rect::from_xywh(0.0, 0.0, 1920.0, 1080.0),
        };
        let p = RenderPlacement::compute(content(), &c, &m, m.popup_size(HELLO));
        assert_eq!(p.horizontal(), HorizontalSide::Right);
    }

    #[test]
    fn test_bottom_right_corner_flips_both_ways() {
        let m = metrics();
        let button = Rect::from_xywh(740.0, 570.0, 50.0, 25.0);
        let p = RenderPlacement::compute(content(), &ctx(button), &m, m.popup_size(HELLO));
        assert_eq!(p.vertical(), VerticalSide::Bottom);
        assert_eq!(p.horizontal(), HorizontalSide::Right);
        assert_eq!(p.arrow(), ArrowDirection::DownRight);
    }

    #[test]
    fn test_wide_target_redirects_arrow_only() {
        let m = metrics();
        let wide = Rect::from_xywh(10.0, 10.0, 400.0, 30.0);
        let p = RenderPlacement::compute(content(), &ctx(wide), &m, m.popup_size(HELLO));
        assert_eq!(p.horizontal(), HorizontalSide::Left);
        assert_eq!(p.arrow(), ArrowDirection::UpRight);
        assert_eq!(p.bounds().min.x, 12.0);
    }

    #[test]
    fn test_arrow_transition_table() {
        use ArrowDirection::*;

        fn from(arrow: ArrowDirection) -> RenderPlacement {
            let mut p = RenderPlacement::new(content());
            match arrow {
                Up => {}
                Down => p.move_icon_down(),
                UpRight => p.move_icon_right(),
                DownRight => {
                    p.move_icon_down();
                    p.move_icon_right();
                }
            }
            assert_eq!(p.arrow(), arrow);
            p
        }

        let table = [
            (Up, Down, UpRight, UpRight),
            (Down, Down, DownRight, DownRight),
            (UpRight, DownRight, UpRight, UpRight),
            (DownRight, DownRight, DownRight, DownRight),
        ];
        for (state, down, right, redirect) in table {
            let mut p = from(state);
            p.move_icon_down();
            assert_eq!(p.arrow(), down, "move_icon_down from {state:?}");

            let mut p = from(state);
            p.move_icon_right();
            assert_eq!(p.arrow(), right, "move_icon_right from {state:?}");

            let mut p = from(state);
            p.redirect_arrow_right();
            assert_eq!(p.arrow(), redirect, "redirect_arrow_right from {state:?}");
        }
    }

    #[test]
    fn test_down_then_right_is_down_right() {
        let mut p = RenderPlacement::new(content());
        p.move_icon_down();
        p.move_icon_right();
        assert_eq!(p.arrow(), ArrowDirection::DownRight);
    }

    #[test]
    fn test_move_right_is_idempotent() {
        let mut p = RenderPlacement::new(content());
        p.move_icon_right();
        assert_eq!(p.arrow(), ArrowDirection::UpRight);
        p.move_icon_right();
        assert_eq!(p.arrow(), ArrowDirection::UpRight);
    }

    #[test]
    fn test_needs_full_hide() {
        let a = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        assert!(needs_full_hide(None, a, 25.0));
        let hides = |b: Rect| needs_full_hide(Some(a), b, 25.0);
        assert!(hides(Rect::from_xywh(200.0, 0.0, 50.0, 50.0)));
        assert!(!hides(Rect::from_xywh(10.0, 10.0, 50.0, 50.0)));
        // Exactly 25% overlap is close enough to move.
        assert!(!hides(Rect::from_xywh(50.0, 50.0, 100.0, 100.0)));
        // 20% overlap is not.
        assert!(hides(Rect::from_xywh(80.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_metrics_deserialize_with_defaults() {
        let m: PlacementMetrics = serde_json::from_str(r#"{"padding": 4.0}"#).unwrap();
        assert_eq!(m.padding, 4.0);
        assert_eq!(m.border, 1.0);
        assert_eq!(m.icon_size, Vec2::new(16.0, 16.0));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (0.0f32..500.0, 0.0f32..500.0, 1.0f32..200.0, 1.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::from_xywh(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_no_previous_always_hides(next in rect_strategy()) {
            prop_assert!(needs_full_hide(None, next, 25.0));
        }

        #[test]
        fn prop_contained_rect_never_hides(
            outer in rect_strategy(),
            fx in 0.0f32..0.5,
            fy in 0.0f32..0.5,
        ) {
            let inner = Rect::from_xywh(
                outer.min.x + outer.width() * fx,
                outer.min.y + outer.height() * fy,
                outer.width() * 0.5,
                outer.height() * 0.5,
            );
            prop_assume!(!inner.is_empty());
            prop_assert!(!needs_full_hide(Some(outer), inner, 25.0));
        }

        #[test]
        fn prop_disjoint_rects_always_hide(a in rect_strategy(), gap in 0.0f32..100.0) {
            let b = a.translate(Vec2::new(a.width() + gap, 0.0));
            prop_assert!(needs_full_hide(Some(a), b, 25.0));
        }

        #[test]
        fn prop_popup_stays_inside_host_when_it_can(
            tx in 0.0f32..700.0,
            ty in 0.0f32..570.0,
            w in 10.0f32..200.0,
        ) {
            let m = PlacementMetrics::default();
            let ctx = PlacementContext {
                target: Rect::from_xywh(tx, ty, 60.0, 25.0),
                host: Rect::from_xywh(0.0, 0.0, 800.0, 600.0),
                screen: Rect::from_xywh(0.0, 0.0, 1920.0, 1080.0),
            };
            let size = Vec2::new(w, 24.0);
            let p = RenderPlacement::compute(
                TipContent::new(hovertip_core::IconKind::Arrow, "x", None),
                &ctx,
                &m,
                size,
            );
            prop_assert_eq!(p.bounds().size(), size);
            prop_assert!(p.bounds().max.y <= 600.0);
        }
    }
}
