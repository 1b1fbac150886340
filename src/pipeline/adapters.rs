//! The renderer and serializer seams, and their default implementations.

use crate::component::ComponentTree;
use crate::config::Config;
use crate::error::GenerationError;
use crate::renderer::{JsxRenderer, RenderError};
use folio_layout::FontRegistry;
use folio_model::DocumentModel;
use folio_render_lopdf::{PdfSerializer, SerializeSummary};
use std::io::Write;

/// Turns a component tree into a document model.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, tree: ComponentTree, config: &Config) -> Result<DocumentModel, RenderError>;
}

/// Writes a document model as bytes.
pub trait DocumentSerializer: Send + Sync {
    fn serialize(
        &self,
        model: &DocumentModel,
        fonts: &FontRegistry,
        out: &mut dyn Write,
    ) -> Result<SerializeSummary, GenerationError>;
}

impl DocumentRenderer for JsxRenderer {
    fn render(&self, tree: ComponentTree, config: &Config) -> Result<DocumentModel, RenderError> {
        JsxRenderer::render(self, tree, config)
    }
}

impl DocumentSerializer for PdfSerializer {
    fn serialize(
        &self,
        model: &DocumentModel,
        fonts: &FontRegistry,
        out: &mut dyn Write,
    ) -> Result<SerializeSummary, GenerationError> {
        Ok(PdfSerializer::serialize(self, model, fonts, out)?)
    }
}
