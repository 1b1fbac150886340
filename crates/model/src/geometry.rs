use serde::{Deserialize, Serialize};

/// Page dimensions in PDF points (1/72 inch).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A3: PageSize = PageSize::new(841.89, 1190.55);
    pub const A4: PageSize = PageSize::new(595.28, 841.89);
    pub const A5: PageSize = PageSize::new(419.53, 595.28);
    pub const LETTER: PageSize = PageSize::new(612.0, 792.0);
    pub const LEGAL: PageSize = PageSize::new(612.0, 1008.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Looks up a named paper size, case-insensitively.
    pub fn from_name(name: &str) -> Option<PageSize> {
        match name.to_ascii_uppercase().as_str() {
            "A3" => Some(Self::A3),
            "A4" => Some(Self::A4),
            "A5" => Some(Self::A5),
            "LETTER" => Some(Self::LETTER),
            "LEGAL" => Some(Self::LEGAL),
            _ => None,
        }
    }

    pub fn oriented(self, orientation: Orientation) -> PageSize {
        let (short, long) = if self.width <= self.height {
            (self.width, self.height)
        } else {
            (self.height, self.width)
        };
        match orientation {
            Orientation::Portrait => PageSize::new(short, long),
            Orientation::Landscape => PageSize::new(long, short),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Box spacing in points.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margins {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub const fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Width request for a column or table column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SizeSpec {
    /// Exact width in points.
    Fixed(f32),
    /// Share of the available width, 0..=100.
    Percent(f32),
    /// Equal share of whatever the other columns leave over.
    #[default]
    Star,
    /// Natural width of the content.
    Auto,
}
