#![allow(dead_code)]

use lopdf::{Dictionary, Document as LopdfDocument, Object};
use std::collections::{BTreeMap, BTreeSet};

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

fn resolve<'a>(doc: &'a LopdfDocument, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        other => other.as_dict().ok(),
    }
}

/// BaseFont names of every font the pages reference
pub fn extract_font_names(doc: &LopdfDocument) -> BTreeSet<String> {
    let mut fonts = BTreeSet::new();
    for page_id in doc.get_pages().values() {
        let Some(fonts_dict) = doc
            .get_dictionary(*page_id)
            .ok()
            .and_then(|page| page.get(b"Resources").ok())
            .and_then(|resources| resolve(doc, resources))
            .and_then(|resources| resources.get(b"Font").ok())
            .and_then(|font| resolve(doc, font))
        else {
            continue;
        };
        for (_, font) in fonts_dict.iter() {
            if let Some(name) = resolve(doc, font)
                .and_then(|f| f.get(b"BaseFont").ok())
                .and_then(|n| n.as_name().ok())
            {
                fonts.insert(String::from_utf8_lossy(name).to_string());
            }
        }
    }
    fonts
}

/// BaseFont and embedded program size of every TrueType font in the file
pub fn embedded_truetype_fonts(doc: &LopdfDocument) -> BTreeMap<String, usize> {
    let mut fonts = BTreeMap::new();
    for object in doc.objects.values() {
        let Ok(font) = object.as_dict() else {
            continue;
        };
        let is_truetype = font
            .get(b"Subtype")
            .and_then(|v| v.as_name())
            .map(|n| n == b"TrueType")
            .unwrap_or(false);
        if !is_truetype {
            continue;
        }
        let Some(name) = font.get(b"BaseFont").and_then(|n| n.as_name()).ok() else {
            continue;
        };
        let program = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|d| resolve(doc, d))
            .and_then(|d| d.get(b"FontFile2").ok())
            .and_then(|f| f.as_reference().ok())
            .and_then(|id| doc.get_object(id).ok())
            .and_then(|f| f.as_stream().ok())
            .map(|s| s.content.len())
            .unwrap_or(0);
        fonts.insert(String::from_utf8_lossy(name).to_string(), program);
    }
    fonts
}

/// A string entry of the trailer's Info dictionary
pub fn info_entry(doc: &LopdfDocument, key: &str) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok().and_then(|i| resolve(doc, i))?;
    let value = info.get(key.as_bytes()).ok()?.as_str().ok()?;
    Some(String::from_utf8_lossy(value).to_string())
}

/// Number of image XObjects in the file
pub fn image_count(doc: &LopdfDocument) -> usize {
    doc.objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|v| v.as_name())
                .map(|n| n == b"Image")
                .unwrap_or(false)
        })
        .count()
}

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert that PDF does NOT contain specific text
#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert minimum number of pages
#[macro_export]
macro_rules! assert_pdf_min_pages {
    ($pdf:expr, $min:expr) => {
        assert!(
            $pdf.page_count() >= $min,
            "Expected at least {} pages, got {}",
            $min,
            $pdf.page_count()
        );
    };
}

/// Assert that PDF contains a font matching a pattern
#[macro_export]
macro_rules! assert_pdf_has_font {
    ($pdf:expr, $pattern:expr) => {
        let fonts = $crate::common::pdf_assertions::extract_font_names(&$pdf.doc);
        assert!(
            fonts.iter().any(|f| f.contains($pattern)),
            "PDF should contain font matching '{}', fonts found: {:?}",
            $pattern,
            fonts
        );
    };
}
