use crate::geometry::{Margins, PageSize, SizeSpec};
use crate::style::TextStyle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The renderer's output: page setup, metadata and a tree of blocks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    pub page_size: PageSize,
    pub page_margins: Margins,
    #[serde(default)]
    pub info: DocumentInfo,
    #[serde(default, skip_serializing_if = "TextStyle::is_empty")]
    pub default_style: TextStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<PageRegion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<PageRegion>,
    pub content: Vec<Block>,
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            page_margins: Margins::all(40.0),
            info: DocumentInfo::default(),
            default_style: TextStyle::default(),
            header: None,
            footer: None,
            content: Vec::new(),
        }
    }
}

impl DocumentModel {
    /// Every font family/variant combination some text in the document resolves to.
    pub fn referenced_fonts(&self) -> BTreeSet<FontRequest> {
        let mut fonts = BTreeSet::new();
        let regions = self.header.iter().chain(self.footer.iter());
        for block in regions.flat_map(|r| r.blocks.iter()).chain(self.content.iter()) {
            collect_fonts(block, &self.default_style, &mut fonts);
        }
        fonts
    }
}

fn collect_fonts(block: &Block, inherited: &TextStyle, out: &mut BTreeSet<FontRequest>) {
    let style = inherited.merge(&block.style);
    match &block.kind {
        BlockKind::Paragraph(runs) => {
            for run in runs {
                out.insert(FontRequest::from_style(&style.merge(&run.style)));
            }
        }
        BlockKind::Stack(children) => {
            for child in children {
                collect_fonts(child, &style, out);
            }
        }
        BlockKind::Columns(columns) => {
            for column in &columns.columns {
                collect_fonts(&column.block, &style, out);
            }
        }
        BlockKind::Table(table) => {
            for cell in table.rows.iter().flatten() {
                collect_fonts(cell, &style, out);
            }
        }
        BlockKind::List(list) => {
            out.insert(FontRequest::from_style(&style));
            for item in &list.items {
                collect_fonts(item, &style, out);
            }
        }
        BlockKind::Image(_) => {}
    }
}

/// One family/variant a document needs from the font registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontRequest {
    pub family: String,
    pub bold: bool,
    pub italics: bool,
}

impl FontRequest {
    pub fn from_style(style: &TextStyle) -> Self {
        let resolved = style.resolve();
        Self {
            family: resolved.font,
            bold: resolved.bold,
            italics: resolved.italics,
        }
    }
}

/// Values written to the PDF document information dictionary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

/// Content repeated on every page (header or footer).
///
/// Text in these blocks is a template evaluated per page against `data`
/// extended with `currentPage` and `pageCount`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PageRegion {
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PageBreak {
    Before,
    After,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "TextStyle::is_empty")]
    pub style: TextStyle,
    #[serde(default)]
    pub margin: Margins,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_break: Option<PageBreak>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            style: TextStyle::default(),
            margin: Margins::default(),
            page_break: None,
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph(vec![TextRun::plain(text)]))
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_margin(mut self, margin: Margins) -> Self {
        self.margin = margin;
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum BlockKind {
    Paragraph(Vec<TextRun>),
    Stack(Vec<Block>),
    Columns(Columns),
    Table(Table),
    Image(Image),
    List(List),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "TextStyle::is_empty")]
    pub style: TextStyle,
    /// Template data for a run inside a [`PageRegion`]. Replaces the
    /// region's `data` when set, e.g. for text a component produced under a
    /// context of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Columns {
    pub columns: Vec<Column>,
    pub gap: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Column {
    pub width: SizeSpec,
    pub block: Block,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TableLayout {
    /// Lines around and between every cell.
    #[default]
    Grid,
    NoBorders,
    /// Thin grey lines between rows and a heavier line under the header.
    LightHorizontalLines,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub widths: Vec<SizeSpec>,
    pub header_rows: usize,
    pub layout: TableLayout,
    pub rows: Vec<Vec<Block>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(self.widths.len())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Image {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<Block>,
}
