//! One-shot document generation.
//!
//! A [`GenerationScript`] wires a template, fonts, a renderer and a
//! serializer to an output path, and [`GenerationScript::run`] executes the
//! whole flow once:
//!
//! ```ignore
//! use folio::{Config, GenerationScript, LogEventSink};
//!
//! let script = GenerationScript::builder()
//!     .with_config(Config::new().with("copyrightYear", 2018))
//!     .with_template(folio::sample::sample_document)
//!     .with_output("example.pdf")
//!     .build()?;
//!
//! script.run(&mut LogEventSink)?;
//! ```

pub mod adapters;
mod builder;
pub mod events;
pub mod sink;

pub use adapters::{DocumentRenderer, DocumentSerializer};
pub use builder::ScriptBuilder;
pub use events::{EventSink, LogEventSink, RecordingSink, RunEvent, TimingScope};
pub use sink::FileSink;

use crate::component::ComponentTree;
use crate::config::Config;
use crate::error::GenerationError;
use crate::renderer::RenderError;
use folio_layout::FontRegistryBuilder;
use folio_traits::ResourceProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Produces the component tree for a run from the run's config.
pub type TemplateFn = Arc<dyn Fn(&Config) -> Result<ComponentTree, RenderError> + Send + Sync>;

/// What a successful run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output: PathBuf,
    pub pages: usize,
    pub bytes: u64,
}

/// A configured generation run. Build one with [`GenerationScript::builder`].
pub struct GenerationScript {
    config: Config,
    fonts: FontRegistryBuilder,
    resources: Arc<dyn ResourceProvider>,
    template: TemplateFn,
    renderer: Box<dyn DocumentRenderer>,
    serializer: Box<dyn DocumentSerializer>,
    output: PathBuf,
}

impl GenerationScript {
    pub fn builder() -> ScriptBuilder {
        ScriptBuilder::new()
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the script once.
    ///
    /// `events` receives `Started`, then `Completed` or `Failed`, then exactly
    /// one `Timing`. The output file only exists afterwards if the run
    /// succeeded.
    pub fn run(&self, events: &mut dyn EventSink) -> Result<RunReport, GenerationError> {
        let mut scope = TimingScope::start(events);
        match self.generate() {
            Ok(report) => {
                scope.emit(RunEvent::Completed {
                    path: report.output.clone(),
                    pages: report.pages,
                    bytes: report.bytes,
                });
                Ok(report)
            }
            Err(e) => {
                scope.emit(RunEvent::Failed {
                    message: e.to_string(),
                    resource_missing: e.is_resource_missing(),
                });
                Err(e)
            }
        }
    }

    fn generate(&self) -> Result<RunReport, GenerationError> {
        let config = self.config.clone();
        let fonts = self.fonts.load(self.resources.as_ref())?;
        let tree = (self.template)(&config)?;
        let model = self.renderer.render(tree, &config)?;

        let mut sink = FileSink::create(&self.output)?;
        let summary = self.serializer.serialize(&model, &fonts, &mut sink)?;
        let bytes = sink.commit()?;

        Ok(RunReport {
            output: self.output.clone(),
            pages: summary.pages,
            bytes,
        })
    }
}
