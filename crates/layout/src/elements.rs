use crate::fonts::{FontKey, LoadedFont};
use crate::image::ImageData;
use folio_model::{Color, PageSize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// An element placed on a page. `y` grows downwards from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ElementKind,
}

impl PositionedElement {
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Text(TextFragment),
    /// A stroked line from (x, y) to (x + width, y + height).
    Line { color: Color, thickness: f32 },
    Image { src: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub font: FontKey,
    pub size: f32,
    pub color: Color,
    /// Baseline offset from the element's top.
    pub baseline: f32,
}

#[derive(Debug, Clone, Default)]
pub struct LaidOutPage {
    /// 1-based page number.
    pub number: usize,
    pub elements: Vec<PositionedElement>,
}

impl LaidOutPage {
    pub fn text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|e| match &e.kind {
                ElementKind::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Layout output: pages plus the fonts and images they reference.
#[derive(Debug, Clone)]
pub struct LaidOutDocument {
    pub page_size: PageSize,
    pub pages: Vec<LaidOutPage>,
    pub fonts: BTreeMap<FontKey, Arc<LoadedFont>>,
    pub images: BTreeMap<String, Arc<ImageData>>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
