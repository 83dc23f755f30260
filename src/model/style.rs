//! Text styling types.

use serde::{Deserialize, Serialize};

/// Styling for text and heading nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyles {
    /// Bold text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    /// Italic text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,

    /// Underlined text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,

    /// Font size class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,

    /// Text alignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,

    /// Color token (e.g. "gray-700")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TextStyles {
    /// Check if any emphasis is applied.
    pub fn has_emphasis(&self) -> bool {
        self.bold.unwrap_or(false)
            || self.italic.unwrap_or(false)
            || self.underline.unwrap_or(false)
    }
}

/// Font size classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSize {
    /// Extra small
    #[serde(rename = "xs")]
    Xs,
    /// Small
    #[serde(rename = "sm")]
    Sm,
    /// Body size (default)
    #[default]
    #[serde(rename = "base")]
    Base,
    /// Large
    #[serde(rename = "lg")]
    Lg,
    /// Extra large
    #[serde(rename = "xl")]
    Xl,
    /// 2x large
    #[serde(rename = "2xl")]
    Xl2,
    /// 3x large
    #[serde(rename = "3xl")]
    Xl3,
}

impl FontSize {
    /// All size classes, smallest first.
    pub const ALL: [FontSize; 7] = [
        FontSize::Xs,
        FontSize::Sm,
        FontSize::Base,
        FontSize::Lg,
        FontSize::Xl,
        FontSize::Xl2,
        FontSize::Xl3,
    ];

    /// The serialized class token.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Xs => "xs",
            FontSize::Sm => "sm",
            FontSize::Base => "base",
            FontSize::Lg => "lg",
            FontSize::Xl => "xl",
            FontSize::Xl2 => "2xl",
            FontSize::Xl3 => "3xl",
        }
    }

    /// Nominal size in points, used by estimating measurers.
    pub fn points(&self) -> f32 {
        match self {
            FontSize::Xs => 9.0,
            FontSize::Sm => 10.5,
            FontSize::Base => 12.0,
            FontSize::Lg => 13.5,
            FontSize::Xl => 15.0,
            FontSize::Xl2 => 18.0,
            FontSize::Xl3 => 22.5,
        }
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// All alignments.
    pub const ALL: [Alignment; 4] = [
        Alignment::Left,
        Alignment::Center,
        Alignment::Right,
        Alignment::Justify,
    ];

    /// The serialized token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_camel_case() {
        let styles = TextStyles {
            bold: Some(true),
            font_size: Some(FontSize::Xl2),
            alignment: Some(Alignment::Center),
            ..Default::default()
        };
        let json = serde_json::to_value(&styles).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "bold": true, "fontSize": "2xl", "alignment": "center" })
        );
    }

    #[test]
    fn test_has_emphasis() {
        assert!(!TextStyles::default().has_emphasis());
        let italic = TextStyles {
            italic: Some(true),
            ..Default::default()
        };
        assert!(italic.has_emphasis());
    }

    #[test]
    fn test_font_size_tokens_round_trip() {
        for size in FontSize::ALL {
            let json = serde_json::to_string(&size).unwrap();
            assert_eq!(json, format!("\"{}\"", size.as_str()));
        }
    }
}
