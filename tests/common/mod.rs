pub mod fixtures;
pub mod pdf_assertions;

use folio::{
    ComponentTree, Config, FontRegistry, GenerationScript, InMemoryResourceProvider, JsxRenderer,
    PdfSerializer, RecordingSink, ResourceProvider, RunReport, ScriptBuilder, GenerationError,
};
use lopdf::Document as LopdfDocument;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    /// Create a GeneratedPdf from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text of one page, 1-based.
    pub fn page_text(&self, page: u32) -> String {
        self.doc.extract_text(&[page]).unwrap_or_default()
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// Render and serialize a tree in memory with the standard fonts.
pub fn generate_pdf(
    tree: ComponentTree,
    config: &Config,
) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    generate_pdf_with_resources(tree, config, Arc::new(InMemoryResourceProvider::new()))
}

pub fn generate_pdf_with_resources(
    tree: ComponentTree,
    config: &Config,
    resources: Arc<dyn ResourceProvider>,
) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let model = JsxRenderer::new().render(tree, config)?;
    let mut bytes = Vec::new();
    PdfSerializer::new(resources).serialize(&model, &FontRegistry::standard(), &mut bytes)?;
    GeneratedPdf::from_bytes(bytes)
}

/// A scratch directory plus the output path inside it.
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub output: PathBuf,
}

impl Workspace {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("example.pdf");
        Ok(Self { dir, output })
    }

    /// A builder writing into this workspace with in-memory resources.
    pub fn script(&self) -> ScriptBuilder {
        GenerationScript::builder()
            .with_resources(Arc::new(InMemoryResourceProvider::new()))
            .with_output(&self.output)
    }

    /// Files currently in the workspace directory.
    pub fn entries(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.dir.path())
            .map(|dir| dir.filter_map(|e| e.ok().map(|e| e.path())).collect())
            .unwrap_or_default()
    }
}

/// Run a script and capture its events.
pub fn run_recorded(
    script: &GenerationScript,
) -> (Result<RunReport, GenerationError>, RecordingSink) {
    let mut events = RecordingSink::new();
    let result = script.run(&mut events);
    (result, events)
}
