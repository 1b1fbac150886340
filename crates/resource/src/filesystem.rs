//! Filesystem-backed resource provider.
//!
//! Paths are resolved relative to an asset directory and may not escape it.

use folio_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Loads resources from files below a base directory.
#[derive(Debug, Clone)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// Canonical form of `base_path`, when the directory exists.
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Resolves `path` below the base directory, or `None` if it would escape it.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() {
            return None;
        }
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }

        let full_path = self.base_path.join(relative);
        match (full_path.canonicalize(), &self.canonical_base) {
            // Symlinks may still point outside the asset directory.
            (Ok(canonical), Some(base)) if !canonical.starts_with(base) => None,
            (Ok(canonical), _) => Some(canonical),
            (Err(_), _) => Some(full_path),
        }
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self.resolve(path).ok_or_else(|| {
            log::warn!("Rejected resource path outside asset directory: {}", path);
            ResourceError::NotFound(format!("{} (outside asset directory)", path))
        })?;

        log::debug!("Loading resource '{}' from {}", path, full_path.display());
        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(full_path.display().to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_loads_font_file_from_asset_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("fonts")).unwrap();
        fs::write(dir.path().join("fonts/OpenSans-Regular.ttf"), b"ttf").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert!(provider.exists("fonts/OpenSans-Regular.ttf"));
        assert_eq!(&*provider.load("fonts/OpenSans-Regular.ttf").unwrap(), b"ttf");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        let err = provider.load("fonts/Missing.ttf").unwrap_err();
        assert!(err.is_not_found());
        assert!(!provider.exists("fonts/Missing.ttf"));
    }

    #[test]
    fn test_rejects_paths_outside_asset_dir() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        assert!(provider.load("../../../etc/passwd").is_err());
        assert!(provider.load("/etc/passwd").is_err());
        assert!(!provider.exists("fonts/../../secret"));
    }

    #[test]
    fn test_directories_do_not_exist_as_resources() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert!(!provider.exists("images"));
    }
}
