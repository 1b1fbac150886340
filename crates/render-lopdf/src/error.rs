use folio_layout::LayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("I/O error while writing PDF: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfError {
    pub fn is_resource_missing(&self) -> bool {
        matches!(self, PdfError::Layout(e) if e.is_resource_missing())
    }
}
