use crate::error::TipError;
use crate::style::Color;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Severity glyph shown in the tip's icon slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IconKind {
    /// No bitmap; the slot shows an arrow pointing at the target.
    #[default]
    Arrow,
    Warning,
    Question,
    Information,
}

impl IconKind {
    pub fn background_color(self) -> Color {
        match self {
            Self::Arrow => Color::ORANGE,
            Self::Warning => Color::RED,
            Self::Question => Color::GREEN,
            Self::Information => Color::BLUE,
        }
    }

    /// Arrow tips draw a direction glyph instead of a bitmap.
    pub fn has_bitmap(self) -> bool {
        !matches!(self, Self::Arrow)
    }
}

/// What a tooltip displays: icon, text and an optional display duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipContent {
    icon: IconKind,
    text: String,
    delay: Option<Duration>,
}

impl TipContent {
    pub fn new(icon: IconKind, text: impl Into<String>, delay: Option<Duration>) -> Self {
        Self {
            icon,
            text: text.into(),
            delay,
        }
    }

    /// Parse raw tip text, reading the icon from its prefix.
    ///
    /// `i)` selects Information, a leading `!` Warning and `?` Question; the
    /// prefix is stripped. Anything else is an Arrow tip with the text kept
    /// verbatim. The remaining text may be empty.
    pub fn parse(raw: &str) -> Result<Self, TipError> {
        if raw.is_empty() {
            return Err(TipError::EmptyTipText);
        }

        let (icon, text) = if let Some(rest) = raw.strip_prefix("i)") {
            (IconKind::Information, rest)
        } else if let Some(rest) = raw.strip_prefix('!') {
            (IconKind::Warning, rest)
        } else if let Some(rest) = raw.strip_prefix('?') {
            (IconKind::Question, rest)
        } else {
            (IconKind::Arrow, raw)
        };

        Ok(Self::new(icon, text, None))
    }

    pub fn icon(&self) -> IconKind {
        self.icon
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Raw tip text that should not produce a popup at all: empty or
    /// whitespace-only. A bare prefix such as `!` is not blank.
    pub fn is_blank(raw: &str) -> bool {
        raw.trim().is_empty()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_information_prefix(rest in ".*") {
            let raw = format!("i){rest}");
            let tip = TipContent::parse(&raw).unwrap();
            prop_assert_eq!(tip.icon(), IconKind::Information);
            prop_assert_eq!(tip.text(), &raw[2..]);
        }

        #[test]
        fn prop_single_char_prefixes(bang in any::<bool>(), rest in ".*") {
            let (prefix, icon) = if bang {
                ('!', IconKind::Warning)
            } else {
                ('?', IconKind::Question)
            };
            let raw = format!("{prefix}{rest}");
            let tip = TipContent::parse(&raw).unwrap();
            prop_assert_eq!(tip.icon(), icon);
            prop_assert_eq!(tip.text(), &raw[1..]);
        }

        #[test]
        fn prop_unprefixed_text_is_kept(raw in "[^!?i].*|i([^)].*)?") {
            let tip = TipContent::parse(&raw).unwrap();
            prop_assert_eq!(tip.icon(), IconKind::Arrow);
            prop_assert_eq!(tip.text(), raw.as_str());
        }
    }
}
