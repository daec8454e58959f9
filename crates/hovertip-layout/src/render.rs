use crate::placement::{
    ArrowDirection, HorizontalSide, PlacementMetrics, RenderPlacement, VerticalSide,
};
use hovertip_core::{Color, IconKind, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Glyph drawn in the icon slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipGlyph {
    Arrow(ArrowDirection),
    Warning,
    Question,
    Information,
}

impl TipGlyph {
    pub fn for_placement(placement: &RenderPlacement) -> Self {
        match placement.content().icon() {
            IconKind::Arrow => Self::Arrow(placement.arrow()),
            IconKind::Warning => Self::Warning,
            IconKind::Question => Self::Question,
            IconKind::Information => Self::Information,
        }
    }

    /// Single-character fallback for surfaces without icon bitmaps.
    pub fn symbol(self) -> char {
        match self {
            Self::Arrow(ArrowDirection::Up) => '↑',
            Self::Arrow(ArrowDirection::Down) => '↓',
            Self::Arrow(ArrowDirection::UpRight) => '↗',
            Self::Arrow(ArrowDirection::DownRight) => '↘',
            Self::Warning => '!',
            Self::Question => '?',
            Self::Information => 'i',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TipStyle {
    pub border_color: Color,
    pub text_color: Color,
}

impl Default for TipStyle {
    fn default() -> Self {
        Self {
            border_color: Color::rgb(60, 60, 60),
            text_color: Color::BLACK,
        }
    }
}

const ICON_FRAME_SHADE: f32 = 0.35;

/// Draw operation in popup-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaintCommand {
    FillRect { rect: Rect, color: Color },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
    },
    Glyph { rect: Rect, glyph: TipGlyph },
    Text {
        rect: Rect,
        text: String,
        color: Color,
    },
}

/// Icon slot inside the popup, on the sides chosen by the placement.
pub fn icon_rect(placement: &RenderPlacement, metrics: &PlacementMetrics) -> Rect {
    let size = placement.bounds().size();
    let inset = metrics.border + metrics.padding;
    let x = match placement.horizontal() {
        HorizontalSide::Left => inset,
        HorizontalSide::Right => size.x - inset - metrics.icon_size.x,
    };
    let y = match placement.vertical() {
        VerticalSide::Top => inset,
        VerticalSide::Bottom => size.y - inset - metrics.icon_size.y,
    };
    Rect::from_pos_size(Vec2::new(x, y), metrics.icon_size)
}

/// Space left for text beside the icon slot.
pub fn text_rect(placement: &RenderPlacement, metrics: &PlacementMetrics) -> Rect {
    let size = placement.bounds().size();
    let inset = metrics.border + metrics.padding;
    let icon_span = metrics.icon_size.x + metrics.padding;
    let (left, right) = match placement.horizontal() {
        HorizontalSide::Left => (inset + icon_span, size.x - inset),
        HorizontalSide::Right => (inset, size.x - inset - icon_span),
    };
    Rect::from_min_max(Vec2::new(left, inset), Vec2::new(right, size.y - inset))
}

/// Everything needed to paint one popup, in drawing order.
///
/// Bitmap icons get a frame one shade darker than the popup background;
/// arrow glyphs are drawn bare.
pub fn paint_commands(
    placement: &RenderPlacement,
    metrics: &PlacementMetrics,
    style: &TipStyle,
) -> Vec<PaintCommand> {
    let icon = placement.content().icon();
    let background = icon.background_color();
    let local = Rect::from_pos_size(Vec2::ZERO, placement.bounds().size());
    let mut commands = vec![PaintCommand::FillRect {
        rect: local,
        color: background,
    }];
    if metrics.border > 0.0 {
        commands.push(PaintCommand::StrokeRect {
            rect: local,
            color: style.border_color,
            width: metrics.border,
        });
    }
    let slot = icon_rect(placement, metrics);
    if icon.has_bitmap() {
        commands.push(PaintCommand::StrokeRect {
            rect: slot,
            color: background.darken(ICON_FRAME_SHADE),
            width: 1.0,
        });
    }
    commands.push(PaintCommand::Glyph {
        rect: slot,
        glyph: TipGlyph::for_placement(placement),
    });
    if !placement.content().text().is_empty() {
        commands.push(PaintCommand::Text {
            rect: text_rect(placement, metrics),
            text: placement.content().text().to_string(),
            color: style.text_color,
        });
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacementContext;
    use hovertip_core::TipContent;

    fn place(raw: &str, target: Rect) -> RenderPlacement {
        let metrics = PlacementMetrics::default();
        let ctx = PlacementContext {
            target,
            host: Rect::from_xywh(0.0, 0.0, 800.0, 600.0),
            screen: Rect::from_xywh(0.0, 0.0, 1920.0, 1080.0),
        };
        RenderPlacement::compute(
            TipContent::parse(raw).unwrap(),
            &ctx,
            &metrics,
            metrics.popup_size(Vec2::new(40.0, 14.0)),
        )
    }

    #[test]
    fn test_warning_tip_paints_red_with_bitmap_glyph() {
        let p = place("!Careful", Rect::from_xywh(10.0, 10.0, 80.0, 30.0));
        let commands = paint_commands(&p, &PlacementMetrics::default(), &TipStyle::default());
        assert_eq!(commands.len(), 5);
        assert!(matches!(
            commands[0],
            PaintCommand::FillRect { color, .. } if color == Color::RED
        ));
        assert!(matches!(
            commands[2],
            PaintCommand::StrokeRect { color, .. } if color == Color::RED.darken(0.35)
        ));
        assert!(matches!(
            commands[3],
            PaintCommand::Glyph {
                glyph: TipGlyph::Warning,
                ..
            }
        ));
        match &commands[4] {
            PaintCommand::Text { text, .. } => assert_eq!(text, "Careful"),
            other => panic!("Expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_arrow_glyph_follows_direction() {
        let p = place("Hi", Rect::from_xywh(10.0, 570.0, 80.0, 25.0));
        assert_eq!(
            TipGlyph::for_placement(&p),
            TipGlyph::Arrow(ArrowDirection::Down)
        );
        assert_eq!(TipGlyph::for_placement(&p).symbol(), '↓');
    }

    #[test]
    fn test_icon_slot_follows_sides() {
        let m = PlacementMetrics::default();
        let plain = place("Hi", Rect::from_xywh(10.0, 10.0, 80.0, 30.0));
        assert_eq!(icon_rect(&plain, &m).min, Vec2::new(3.0, 3.0));
        assert_eq!(text_rect(&plain, &m).min.x, 21.0);

        let flipped = place("Hi", Rect::from_xywh(740.0, 570.0, 50.0, 25.0));
        let size = flipped.bounds().size();
        let icon = icon_rect(&flipped, &m);
        assert_eq!(icon.max, Vec2::new(size.x - 3.0, size.y - 3.0));
        assert_eq!(text_rect(&flipped, &m).min.x, 3.0);
    }

    #[test]
    fn test_arrow_glyph_has_no_icon_frame() {
        let p = place("Hi", Rect::from_xywh(10.0, 10.0, 80.0, 30.0));
        let commands = paint_commands(&p, &PlacementMetrics::default(), &TipStyle::default());
        let strokes = commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::StrokeRect { .. }))
            .count();
        assert_eq!(strokes, 1);
        assert_eq!(commands.len(), 4);
    }

    #[test]
    fn test_icon_only_tip_has_no_text_command() {
        let p = place("?", Rect::from_xywh(10.0, 10.0, 80.0, 30.0));
        let commands = paint_commands(&p, &PlacementMetrics::default(), &TipStyle::default());
        assert!(!commands.iter().any(|c| matches!(c, PaintCommand::Text { .. })));
    }
}
