use serde::{Deserialize, Serialize};

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const ORANGE: Self = Self::rgb(255, 200, 120);
    pub const RED: Self = Self::rgb(255, 140, 140);
    pub const GREEN: Self = Self::rgb(160, 225, 150);
    pub const BLUE: Self = Self::rgb(150, 195, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale the color channels toward black; `amount` is clamped to `0..=1`.
    pub fn darken(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);
        let scale = |channel: u8| (f32::from(channel) * keep).round() as u8;
        Self::rgba(scale(self.r), scale(self.g), scale(self.b), self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darken_scales_channels_and_keeps_alpha() {
        let c = Color::rgba(200, 100, 50, 128).darken(0.5);
        assert_eq!(c, Color::rgba(100, 50, 25, 128));
    }

    #[test]
    fn test_darken_clamps_amount() {
        assert_eq!(Color::GREEN.darken(0.0), Color::GREEN);
        assert_eq!(Color::GREEN.darken(-1.0), Color::GREEN);
        assert_eq!(Color::BLUE.darken(3.0), Color::BLACK);
    }
}
