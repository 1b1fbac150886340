//! Font registry, text measurement and pagination.
//!
//! [`LayoutEngine`] turns a [`folio_model::DocumentModel`] into absolutely
//! positioned elements, one list per page, using the metrics of the fonts in
//! a [`FontRegistry`].

use folio_traits::ResourceError;
use thiserror::Error;

pub mod elements;
pub mod encoding;
pub mod engine;
pub mod fonts;
pub mod image;
pub mod text;

pub use elements::{ElementKind, LaidOutDocument, LaidOutPage, PositionedElement, TextFragment};
pub use engine::LayoutEngine;
pub use fonts::{
    FontDescriptor, FontError, FontKey, FontMetrics, FontProgram, FontRegistry,
    FontRegistryBuilder, FontVariant, LoadedFont, StandardFont,
};
pub use image::{ColorSpace, ImageData};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    Font(#[from] FontError),
    #[error("Failed to load image '{src}': {source}")]
    ImageResource {
        src: String,
        #[source]
        source: ResourceError,
    },
    #[error("Unsupported image '{src}': {reason}")]
    UnsupportedImage { src: String, reason: String },
    #[error("Page template error: {0}")]
    Template(String),
}

impl LayoutError {
    /// True when a font family or an image the document references does not exist.
    pub fn is_resource_missing(&self) -> bool {
        match self {
            LayoutError::Font(e) => e.is_missing(),
            LayoutError::ImageResource { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}
