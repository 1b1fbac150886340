use crate::color::Color;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT: &str = "Helvetica";
pub const DEFAULT_FONT_SIZE: f32 = 12.0;
pub const DEFAULT_LINE_HEIGHT: f32 = 1.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// A partial text style. Unset fields inherit from the enclosing element.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italics: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
}

impl TextStyle {
    pub fn is_empty(&self) -> bool {
        *self == TextStyle::default()
    }

    /// Returns a style where every field set on `overlay` replaces the one here.
    pub fn merge(&self, overlay: &TextStyle) -> TextStyle {
        TextStyle {
            font: overlay.font.clone().or_else(|| self.font.clone()),
            font_size: overlay.font_size.or(self.font_size),
            bold: overlay.bold.or(self.bold),
            italics: overlay.italics.or(self.italics),
            color: overlay.color.or(self.color),
            alignment: overlay.alignment.or(self.alignment),
            line_height: overlay.line_height.or(self.line_height),
        }
    }

    /// Fills the unset fields with the engine defaults.
    pub fn resolve(&self) -> ResolvedStyle {
        ResolvedStyle {
            font: self.font.clone().unwrap_or_else(|| DEFAULT_FONT.to_string()),
            font_size: self.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            bold: self.bold.unwrap_or(false),
            italics: self.italics.unwrap_or(false),
            color: self.color.unwrap_or(Color::BLACK),
            alignment: self.alignment.unwrap_or_default(),
            line_height: self.line_height.unwrap_or(DEFAULT_LINE_HEIGHT),
        }
    }
}

/// A fully specified text style, ready for measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub font: String,
    pub font_size: f32,
    pub bold: bool,
    pub italics: bool,
    pub color: Color,
    pub alignment: Alignment,
    pub line_height: f32,
}
