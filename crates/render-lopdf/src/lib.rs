//! Streaming PDF serializer using lopdf.
//!
//! [`PdfSerializer`] lays out a [`folio_model::DocumentModel`] and writes it
//! as PDF 1.7 to any [`std::io::Write`], one page content stream at a time.

mod content;
mod error;
mod resources;
mod serializer;
mod writer;

pub use content::{ResourceNames, render_page};
pub use error::PdfError;
pub use serializer::{PdfSerializer, SerializeSummary};
pub use writer::StreamingPdfWriter;
