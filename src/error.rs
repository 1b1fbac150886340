use crate::renderer::RenderError;
use folio_layout::FontError;
use folio_render_lopdf::PdfError;
use thiserror::Error;

/// Everything that can stop a generation run.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Font loading failed: {0}")]
    Font(#[from] FontError),

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Script is invalid or missing required parts: {0}")]
    Config(String),
}

impl GenerationError {
    /// True when a font or image the document needs could not be found.
    pub fn is_resource_missing(&self) -> bool {
        match self {
            GenerationError::Font(e) => e.is_missing(),
            GenerationError::Pdf(e) => e.is_resource_missing(),
            _ => false,
        }
    }
}
