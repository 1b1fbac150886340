use crate::content::{ResourceNames, render_page};
use crate::error::PdfError;
use crate::resources::{font_dictionary, write_image};
use crate::writer::StreamingPdfWriter;
use chrono::{DateTime, Utc};
use folio_layout::{FontRegistry, LaidOutDocument, LayoutEngine, encoding};
use folio_model::{DocumentInfo, DocumentModel};
use folio_traits::ResourceProvider;
use lopdf::{Dictionary, Object, dictionary};
use std::io::Write;
use std::sync::Arc;

const PDF_VERSION: &str = "1.7";
const PRODUCER: &str = "folio";

/// What a successful serialization produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeSummary {
    pub pages: usize,
    pub bytes: u64,
}

/// Lays out documents and writes them as PDF.
///
/// Output depends only on the model and the fonts: no timestamps or random
/// identifiers are added unless the model's info carries a creation date.
#[derive(Debug, Clone)]
pub struct PdfSerializer {
    resources: Arc<dyn ResourceProvider>,
}

impl PdfSerializer {
    pub fn new(resources: Arc<dyn ResourceProvider>) -> Self {
        Self { resources }
    }

    /// Writes the whole document to `out` and flushes it. Nothing is written
    /// when layout fails, including when a referenced font is missing.
    pub fn serialize(
        &self,
        model: &DocumentModel,
        fonts: &FontRegistry,
        out: &mut dyn Write,
    ) -> Result<SerializeSummary, PdfError> {
        let laid_out = LayoutEngine::new(fonts, self.resources.as_ref()).layout(model)?;
        let pages = laid_out.page_count();
        let (_, bytes) = write_document(&laid_out, &model.info, out)?;
        log::debug!("Serialized {} pages into {} bytes", pages, bytes);
        Ok(SerializeSummary { pages, bytes })
    }
}

fn write_document<W: Write>(
    doc: &LaidOutDocument,
    info: &DocumentInfo,
    out: W,
) -> Result<(W, u64), PdfError> {
    let mut writer = StreamingPdfWriter::new(out, PDF_VERSION)?;
    let mut names = ResourceNames::default();

    let mut font_dict = Dictionary::new();
    for (i, (key, font)) in doc.fonts.iter().enumerate() {
        let name = format!("F{}", i + 1);
        font_dict.set(name.as_bytes(), Object::Dictionary(font_dictionary(&mut writer, font)?));
        names.fonts.insert(key.clone(), name);
    }

    let mut xobject_dict = Dictionary::new();
    for (i, (src, image)) in doc.images.iter().enumerate() {
        let name = format!("Im{}", i + 1);
        let image_id = write_image(&mut writer, image)?;
        xobject_dict.set(name.as_bytes(), image_id);
        names.images.insert(src.clone(), name);
    }

    let mut resources = dictionary! {
        "Font" => font_dict,
        "ProcSet" => vec!["PDF".into(), "Text".into(), "ImageC".into()],
    };
    if !xobject_dict.is_empty() {
        resources.set("XObject", xobject_dict);
    }
    writer.set_resources(resources);

    let (width, height) = (doc.page_size.width, doc.page_size.height);
    for page in &doc.pages {
        let content_id = writer.write_content_stream(render_page(page, height, &names))?;
        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => writer.pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => writer.resources_id,
        };
        let page_id = writer.buffer_object(page_dict.into());
        writer.add_page_id(page_id);
    }

    writer.set_info(info_dictionary(info));
    Ok(writer.finish()?)
}

fn text_string(value: &str) -> Object {
    Object::string_literal(encoding::encode(value))
}

fn pdf_date(date: &DateTime<Utc>) -> Object {
    Object::string_literal(date.format("D:%Y%m%d%H%M%SZ").to_string())
}

fn info_dictionary(info: &DocumentInfo) -> Dictionary {
    let mut dict = Dictionary::new();
    let fields = [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Keywords", &info.keywords),
        ("Creator", &info.creator),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            dict.set(key, text_string(value));
        }
    }
    dict.set("Producer", text_string(info.producer.as_deref().unwrap_or(PRODUCER)));
    if let Some(date) = &info.creation_date {
        dict.set("CreationDate", pdf_date(date));
        dict.set("ModDate", pdf_date(date));
    }
    dict
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use folio_model::Block;
    use folio_traits::InMemoryResourceProvider;

    fn serializer() -> PdfSerializer {
        PdfSerializer::new(Arc::new(InMemoryResourceProvider::new()))
    }

    fn hello_model() -> DocumentModel {
        DocumentModel {
            content: vec![Block::paragraph("Hello PDF")],
            ..Default::default()
        }
    }

    #[test]
    fn test_serialize_produces_parseable_pdf() {
        let mut out = Vec::new();
        let summary = serializer()
            .serialize(&hello_model(), &FontRegistry::standard(), &mut out)
            .unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.bytes, out.len() as u64);
        let doc = lopdf::Document::load_mem(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("Hello PDF"), "extracted: {text:?}");
    }

    #[test]
    fn test_output_is_deterministic() {
        let fonts = FontRegistry::standard();
        let mut first = Vec::new();
        let mut second = Vec::new();
        serializer().serialize(&hello_model(), &fonts, &mut first).unwrap();
        serializer().serialize(&hello_model(), &fonts, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_font_writes_nothing() {
        let mut model = hello_model();
        model.default_style.font = Some("OpenSans".into());
        let mut out = Vec::new();

        let err = serializer()
            .serialize(&model, &FontRegistry::standard(), &mut out)
            .unwrap_err();
        assert!(err.is_resource_missing());
        assert!(out.is_empty());
    }

    #[test]
    fn test_info_dictionary() {
        let info = DocumentInfo {
            title: Some("Report".into()),
            creation_date: Some(Utc.with_ymd_and_hms(2018, 3, 4, 5, 6, 7).unwrap()),
            ..Default::default()
        };
        let dict = info_dictionary(&info);
        assert_eq!(dict.get(b"Title").unwrap().as_str().unwrap(), b"Report");
        assert_eq!(dict.get(b"Producer").unwrap().as_str().unwrap(), b"folio");
        assert_eq!(
            dict.get(b"CreationDate").unwrap().as_str().unwrap(),
            b"D:20180304050607Z"
        );
        assert!(dict.get(b"Author").is_err());
    }
}
