//! The intermediate document model.
//!
//! A [`DocumentModel`] is what the component renderer produces and what the
//! PDF serializer consumes. It carries no layout positions, only structure and
//! style, and can be dumped to JSON for inspection.

pub mod color;
pub mod document;
pub mod geometry;
pub mod style;

pub use color::Color;
pub use document::{
    Block, BlockKind, Column, Columns, DocumentInfo, DocumentModel, FontRequest, Image, List,
    PageBreak, PageRegion, Table, TableLayout, TextRun,
};
pub use geometry::{Margins, Orientation, PageSize, SizeSpec};
pub use style::{Alignment, ResolvedStyle, TextStyle};
