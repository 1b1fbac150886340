//! Resource loading seam.
//!
//! Fonts and images referenced by a document are loaded through a
//! [`ResourceProvider`], so the pipeline never touches the filesystem
//! directly and tests can run entirely from memory.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },
}

impl ResourceError {
    /// True when the resource does not exist, as opposed to existing but
    /// being unreadable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound(_))
    }
}

/// Reference-counted resource bytes.
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads named resources (font programs, images) for a document run.
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its path or key.
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    /// Check if a resource exists without loading it.
    fn exists(&self, path: &str) -> bool;

    /// Human-readable provider name, used in log lines.
    fn name(&self) -> &'static str;
}

/// A provider backed by a fixed map of byte buffers.
///
/// It is populated once with [`InMemoryResourceProvider::with`] and is
/// read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResourceProvider {
    resources: BTreeMap<String, SharedResourceData>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource under `path`, replacing any previous entry.
    pub fn with(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.resources.insert(path.into(), Arc::new(data.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources.contains_key(path)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_provider_loads_added_font() {
        let provider = InMemoryResourceProvider::new().with("fonts/Regular.ttf", b"glyphs".to_vec());

        let data = provider.load("fonts/Regular.ttf").unwrap();
        assert_eq!(&*data, b"glyphs");
        assert!(provider.exists("fonts/Regular.ttf"));
    }

    #[test]
    fn test_in_memory_provider_missing_resource() {
        let provider = InMemoryResourceProvider::new();
        let err = provider.load("logo.jpg").unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("logo.jpg"));
        assert!(provider.is_empty());
    }

    #[test]
    fn test_in_memory_provider_replaces_entry() {
        let provider = InMemoryResourceProvider::new()
            .with("a.jpg", vec![1u8])
            .with("a.jpg", vec![2u8]);

        assert_eq!(provider.len(), 1);
        assert_eq!(&*provider.load("a.jpg").unwrap(), &[2u8]);
    }

    #[test]
    fn test_load_failed_is_not_a_missing_resource() {
        let err = ResourceError::LoadFailed {
            path: "x.ttf".into(),
            message: "permission denied".into(),
        };
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("permission denied"));
    }
}
