//! Resource providers for the folio pipeline.
//!
//! - [`FilesystemResourceProvider`]: font and image files under an asset directory
//! - [`InMemoryResourceProvider`]: re-exported from `folio-traits`

mod filesystem;

pub use filesystem::FilesystemResourceProvider;

pub use folio_traits::InMemoryResourceProvider;
