use super::adapters::{DocumentRenderer, DocumentSerializer};
use super::{GenerationScript, TemplateFn};
use crate::component::{ComponentRegistry, ComponentTree};
use crate::config::Config;
use crate::error::GenerationError;
use crate::renderer::{JsxRenderer, RenderError};
use folio_layout::{FontDescriptor, FontRegistry, FontRegistryBuilder};
use folio_render_lopdf::PdfSerializer;
use folio_resource::FilesystemResourceProvider;
use folio_traits::ResourceProvider;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_OUTPUT: &str = "example.pdf";

/// A builder for creating a [`GenerationScript`].
pub struct ScriptBuilder {
    config: Config,
    fonts: FontRegistryBuilder,
    resources: Option<Arc<dyn ResourceProvider>>,
    template: Option<TemplateFn>,
    renderer: Option<Box<dyn DocumentRenderer>>,
    serializer: Option<Box<dyn DocumentSerializer>>,
    output: PathBuf,
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            fonts: FontRegistry::builder().standard_fonts(),
            resources: None,
            template: None,
            renderer: None,
            serializer: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ScriptBuilder {
    /// Creates a builder with the standard fonts registered and `example.pdf`
    /// as the output path.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_config_value(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.config.set(key, value);
        self
    }

    /// Registers a font family. Paths are resolved through the resource provider.
    pub fn with_font(mut self, family: &str, descriptor: FontDescriptor) -> Self {
        self.fonts = self.fonts.family(family, descriptor);
        self
    }

    /// Registers font families from a JSON map of family name to
    /// `{"normal": .., "bold": .., "italics": .., "bolditalics": ..}`.
    pub fn with_fonts_json(mut self, json: &str) -> Result<Self, GenerationError> {
        let families: BTreeMap<String, FontDescriptor> = serde_json::from_str(json)
            .map_err(|e| GenerationError::Config(format!("Invalid font descriptors: {}", e)))?;
        for (family, descriptor) in families {
            self.fonts = self.fonts.family(family, descriptor);
        }
        Ok(self)
    }

    /// Loads fonts and images from files under `dir`.
    pub fn with_resource_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.resources = Some(Arc::new(FilesystemResourceProvider::new(dir)));
        self
    }

    pub fn with_resources(mut self, resources: Arc<dyn ResourceProvider>) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Uses a function of the config as the document template.
    pub fn with_template<F>(mut self, template: F) -> Self
    where
        F: Fn(&Config) -> ComponentTree + Send + Sync + 'static,
    {
        self.template = Some(Arc::new(
            move |config: &Config| -> Result<ComponentTree, RenderError> { Ok(template(config)) },
        ));
        self
    }

    /// Like [`with_template`](Self::with_template) for templates that can fail.
    pub fn with_fallible_template<F>(mut self, template: F) -> Self
    where
        F: Fn(&Config) -> Result<ComponentTree, RenderError> + Send + Sync + 'static,
    {
        self.template = Some(Arc::new(template));
        self
    }

    /// Uses a component tree in its JSON form. The JSON is parsed on each
    /// run, so malformed input is reported as a failed run.
    pub fn with_json_template(self, json: impl Into<String>) -> Self {
        let json = json.into();
        self.with_fallible_template(move |_: &Config| ComponentTree::from_json_str(&json))
    }

    /// Reads a JSON component tree from a file.
    pub fn with_template_file<P: AsRef<Path>>(self, path: P) -> Result<Self, GenerationError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            GenerationError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read template from '{}': {}", path.display(), e),
            ))
        })?;
        Ok(self.with_json_template(json))
    }

    /// Makes named components available to the default renderer.
    pub fn with_components(mut self, registry: ComponentRegistry) -> Self {
        self.renderer = Some(Box::new(JsxRenderer::with_registry(registry)));
        self
    }

    pub fn with_renderer(mut self, renderer: impl DocumentRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_serializer(mut self, serializer: impl DocumentSerializer + 'static) -> Self {
        self.serializer = Some(Box::new(serializer));
        self
    }

    pub fn with_output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output = path.as_ref().to_path_buf();
        self
    }

    /// Consumes the builder and creates the script. Fails only when no
    /// template was configured; everything else is checked when the script runs.
    pub fn build(self) -> Result<GenerationScript, GenerationError> {
        let template = self.template.ok_or_else(|| {
            GenerationError::Config(
                "No template has been configured. Use `with_template` or `with_json_template`."
                    .to_string(),
            )
        })?;
        let resources = self
            .resources
            .unwrap_or_else(|| Arc::new(FilesystemResourceProvider::new(".")));
        let serializer = self
            .serializer
            .unwrap_or_else(|| Box::new(PdfSerializer::new(resources.clone())));

        Ok(GenerationScript {
            config: self.config,
            fonts: self.fonts,
            resources,
            template,
            renderer: self.renderer.unwrap_or_else(|| Box::new(JsxRenderer::new())),
            serializer,
            output: self.output,
        })
    }
}
