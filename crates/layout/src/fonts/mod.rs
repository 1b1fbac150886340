//! Font registry.
//!
//! A [`FontRegistry`] maps family names to up to four loaded variants
//! (normal, bold, italics, bold-italics). It is built once from
//! [`FontDescriptor`]s through a [`ResourceProvider`] and is read-only after
//! that. Families can also be backed by the PDF standard fonts, which need no
//! font file.

mod standard;
mod truetype;

pub use standard::StandardFont;

use crate::encoding;
use folio_model::FontRequest;
use folio_traits::{ResourceError, ResourceProvider, SharedResourceData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Font family '{0}' is not registered")]
    UnknownFamily(String),
    #[error("Failed to load font '{family}' ({variant}): {source}")]
    Resource {
        family: String,
        variant: FontVariant,
        #[source]
        source: ResourceError,
    },
    #[error("Invalid font file '{path}': {reason}")]
    InvalidFont { path: String, reason: String },
}

impl FontError {
    /// True for fonts that are referenced but cannot be found.
    pub fn is_missing(&self) -> bool {
        match self {
            FontError::UnknownFamily(_) => true,
            FontError::Resource { source, .. } => source.is_not_found(),
            FontError::InvalidFont { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontVariant {
    Normal,
    Bold,
    Italics,
    BoldItalics,
}

impl FontVariant {
    pub const ALL: [FontVariant; 4] = [
        FontVariant::Normal,
        FontVariant::Bold,
        FontVariant::Italics,
        FontVariant::BoldItalics,
    ];

    pub fn from_flags(bold: bool, italics: bool) -> Self {
        match (bold, italics) {
            (false, false) => FontVariant::Normal,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Italics,
            (true, true) => FontVariant::BoldItalics,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FontVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontVariant::Normal => "normal",
            FontVariant::Bold => "bold",
            FontVariant::Italics => "italics",
            FontVariant::BoldItalics => "bolditalics",
        })
    }
}

/// Identifies one loaded face: a family and the variant actually used.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontKey {
    pub family: String,
    pub variant: FontVariant,
}

/// Font files for one family, as resource paths.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    pub normal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bolditalics: Option<String>,
}

impl FontDescriptor {
    pub fn new(normal: impl Into<String>) -> Self {
        Self {
            normal: normal.into(),
            bold: None,
            italics: None,
            bolditalics: None,
        }
    }

    pub fn with_bold(mut self, path: impl Into<String>) -> Self {
        self.bold = Some(path.into());
        self
    }

    pub fn with_italics(mut self, path: impl Into<String>) -> Self {
        self.italics = Some(path.into());
        self
    }

    pub fn with_bolditalics(mut self, path: impl Into<String>) -> Self {
        self.bolditalics = Some(path.into());
        self
    }

    pub fn path(&self, variant: FontVariant) -> Option<&str> {
        match variant {
            FontVariant::Normal => Some(&self.normal),
            FontVariant::Bold => self.bold.as_deref(),
            FontVariant::Italics => self.italics.as_deref(),
            FontVariant::BoldItalics => self.bolditalics.as_deref(),
        }
    }
}

/// Horizontal and vertical metrics in 1/1000 em.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Advance width of every WinAnsi code.
    pub widths: [u16; 256],
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    pub italic_angle: f32,
    pub bbox: [f32; 4],
    pub fixed_pitch: bool,
}

impl FontMetrics {
    pub fn char_width(&self, c: char) -> f32 {
        let code = encoding::encode_char(c).unwrap_or(encoding::REPLACEMENT);
        self.widths[code as usize] as f32
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.char_width(c)).sum::<f32>() * size / 1000.0
    }

    /// Height of the font's ascent-to-descent box in points at `size`.
    pub fn box_height(&self, size: f32) -> f32 {
        (self.ascent - self.descent) * size / 1000.0
    }

    pub fn ascent_at(&self, size: f32) -> f32 {
        self.ascent * size / 1000.0
    }
}

#[derive(Debug, Clone)]
pub enum FontProgram {
    /// One of the PDF base-14 fonts, referenced by name.
    Standard(StandardFont),
    /// A TrueType/OpenType program embedded in the output.
    TrueType(SharedResourceData),
}

#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub postscript_name: String,
    pub program: FontProgram,
    pub metrics: FontMetrics,
}

type FamilyFaces = [Option<Arc<LoadedFont>>; 4];

/// Family name to loaded faces. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    families: BTreeMap<String, FamilyFaces>,
}

impl FontRegistry {
    pub fn builder() -> FontRegistryBuilder {
        FontRegistryBuilder::default()
    }

    /// A registry holding only the standard families (Helvetica and Courier).
    pub fn standard() -> Self {
        let mut registry = FontRegistry::default();
        for font in StandardFont::FAMILIES {
            registry.families.insert(font.family_name().to_string(), font.faces());
        }
        registry
    }

    pub fn contains_family(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    /// Finds the face for a family and style, falling back to the family's
    /// normal face when the requested variant was not provided.
    pub fn resolve(
        &self,
        family: &str,
        bold: bool,
        italics: bool,
    ) -> Result<(FontKey, Arc<LoadedFont>), FontError> {
        let faces = self
            .families
            .get(family)
            .ok_or_else(|| FontError::UnknownFamily(family.to_string()))?;
        let requested = FontVariant::from_flags(bold, italics);
        let variant = if faces[requested.index()].is_some() {
            requested
        } else {
            log::debug!(
                "Font '{}' has no {} variant, using normal",
                family,
                requested
            );
            FontVariant::Normal
        };
        let font = faces[variant.index()]
            .clone()
            .ok_or_else(|| FontError::UnknownFamily(family.to_string()))?;
        Ok((
            FontKey {
                family: family.to_string(),
                variant,
            },
            font,
        ))
    }

    pub fn get(&self, key: &FontKey) -> Option<&Arc<LoadedFont>> {
        self.families.get(&key.family)?[key.variant.index()].as_ref()
    }

    /// Fails on the first requested family the registry does not know.
    pub fn check<'a>(
        &self,
        requests: impl IntoIterator<Item = &'a FontRequest>,
    ) -> Result<(), FontError> {
        for request in requests {
            if !self.contains_family(&request.family) {
                return Err(FontError::UnknownFamily(request.family.clone()));
            }
        }
        Ok(())
    }
}

/// Collects font sources and loads them into a [`FontRegistry`].
#[derive(Debug, Clone, Default)]
pub struct FontRegistryBuilder {
    include_standard: bool,
    descriptors: BTreeMap<String, FontDescriptor>,
}

impl FontRegistryBuilder {
    /// Registers the standard Helvetica and Courier families.
    pub fn standard_fonts(mut self) -> Self {
        self.include_standard = true;
        self
    }

    /// Registers a family backed by font files. A later call with the same
    /// name replaces the earlier descriptor.
    pub fn family(mut self, name: impl Into<String>, descriptor: FontDescriptor) -> Self {
        self.descriptors.insert(name.into(), descriptor);
        self
    }

    pub fn descriptors(&self) -> &BTreeMap<String, FontDescriptor> {
        &self.descriptors
    }

    pub fn load(&self, provider: &dyn ResourceProvider) -> Result<FontRegistry, FontError> {
        let mut registry = if self.include_standard {
            FontRegistry::standard()
        } else {
            FontRegistry::default()
        };

        for (family, descriptor) in &self.descriptors {
            let mut faces: FamilyFaces = Default::default();
            for variant in FontVariant::ALL {
                let Some(path) = descriptor.path(variant) else {
                    continue;
                };
                let data = provider.load(path).map_err(|source| FontError::Resource {
                    family: family.clone(),
                    variant,
                    source,
                })?;
                let font = truetype::load(path, data)?;
                log::debug!(
                    "Loaded font '{}' ({}) as {} via {}",
                    family,
                    variant,
                    font.postscript_name,
                    provider.name()
                );
                faces[variant.index()] = Some(Arc::new(font));
            }
            registry.families.insert(family.clone(), faces);
        }

        log::debug!(
            "Font registry ready with {} families",
            registry.families.len()
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_traits::InMemoryResourceProvider;

    #[test]
    fn test_standard_registry_resolves_variants() {
        let registry = FontRegistry::standard();
        let (key, font) = registry.resolve("Helvetica", true, false).unwrap();
        assert_eq!(key.variant, FontVariant::Bold);
        assert_eq!(font.postscript_name, "Helvetica-Bold");

        let (_, oblique) = registry.resolve("Courier", true, true).unwrap();
        assert_eq!(oblique.postscript_name, "Courier-BoldOblique");
    }

    #[test]
    fn test_unknown_family_is_missing() {
        let registry = FontRegistry::standard();
        let err = registry.resolve("OpenSans", false, false).unwrap_err();
        assert!(err.is_missing());
        assert!(err.to_string().contains("OpenSans"));
    }

    #[test]
    fn test_missing_font_file_is_missing() {
        let builder = FontRegistry::builder()
            .family("OpenSans", FontDescriptor::new("fonts/OpenSans-Regular.ttf"));
        let err = builder.load(&InMemoryResourceProvider::new()).unwrap_err();

        assert!(err.is_missing());
        assert!(matches!(err, FontError::Resource { variant: FontVariant::Normal, .. }));
    }

    #[test]
    fn test_garbage_font_file_is_invalid() {
        let provider = InMemoryResourceProvider::new().with("bad.ttf", b"not a font".to_vec());
        let err = FontRegistry::builder()
            .family("Bad", FontDescriptor::new("bad.ttf"))
            .load(&provider)
            .unwrap_err();

        assert!(!err.is_missing());
        assert!(matches!(err, FontError::InvalidFont { .. }));
    }

    #[test]
    fn test_check_reports_first_unknown_family() {
        let registry = FontRegistry::standard();
        let requests = [
            FontRequest { family: "Helvetica".into(), bold: false, italics: false },
            FontRequest { family: "Roboto".into(), bold: true, italics: false },
        ];
        let err = registry.check(requests.iter()).unwrap_err();
        assert!(matches!(err, FontError::UnknownFamily(ref f) if f == "Roboto"));
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let registry = FontRegistry::standard();
        let (_, courier) = registry.resolve("Courier", false, false).unwrap();
        assert_eq!(courier.metrics.text_width("abcd", 10.0), 24.0);
        assert_eq!(courier.metrics.text_width("abcd", 20.0), 48.0);
    }

    #[test]
    fn test_descriptor_paths() {
        let descriptor = FontDescriptor::new("r.ttf").with_bold("b.ttf");
        assert_eq!(descriptor.path(FontVariant::Bold), Some("b.ttf"));
        assert_eq!(descriptor.path(FontVariant::Italics), None);
    }
}
