//! Declarative PDF generation.
//!
//! A document is described as a [`ComponentTree`], rendered by a
//! [`JsxRenderer`] into a [`folio_model::DocumentModel`], and serialized to
//! PDF with the fonts of a [`FontRegistry`]. [`GenerationScript`] runs that
//! flow once against an output file and reports progress through an
//! [`EventSink`].

pub mod component;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod sample;

pub use component::{Component, ComponentRegistry, ComponentTree, Context, Node, Props, Tag};
pub use config::Config;
pub use error::GenerationError;
pub use pipeline::{
    DocumentRenderer, DocumentSerializer, EventSink, FileSink, GenerationScript, LogEventSink,
    RecordingSink, RunEvent, RunReport, ScriptBuilder,
};
pub use renderer::{JsxRenderer, MAX_COMPONENT_DEPTH, RenderError};

pub use folio_layout::{FontDescriptor, FontRegistry};
pub use folio_model as model;
pub use folio_render_lopdf::{PdfSerializer, SerializeSummary};
pub use folio_traits::{InMemoryResourceProvider, ResourceProvider};
