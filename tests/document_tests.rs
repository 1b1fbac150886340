mod common;

use common::fixtures::*;
use common::pdf_assertions::{image_count, info_entry};
use common::{TestResult, generate_pdf, generate_pdf_with_resources};
use folio::component::builders::*;
use folio::{
    Config, FontRegistry, GenerationError, InMemoryResourceProvider, JsxRenderer, PdfSerializer,
};
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_long_content_paginates() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let pdf = generate_pdf(doc_with(long_paragraphs(60)), &Config::new())?;

    assert_pdf_min_pages!(pdf, 2);
    assert!(pdf.page_text(1).contains("Paragraph 1 "));
    assert!(!pdf.page_text(1).contains("Paragraph 60"));
    assert_pdf_contains_text!(pdf, "Paragraph 60");
    Ok(())
}

#[test]
fn test_page_break_before_starts_new_page() -> TestResult {
    let tree = doc_with(vec![
        text("First page").into(),
        text("Second page").page_break("before").into(),
    ]);
    let pdf = generate_pdf(tree, &Config::new())?;

    assert_pdf_page_count!(pdf, 2);
    assert!(pdf.page_text(1).contains("First page"));
    assert!(!pdf.page_text(1).contains("Second page"));
    assert!(pdf.page_text(2).contains("Second page"));
    Ok(())
}

#[test]
fn test_footer_numbers_every_page() -> TestResult {
    let tree = document()
        .prop("defaultStyle", json!({"font": "Helvetica"}))
        .child(header().child(text("Report {{copyrightYear}}")))
        .child(content().children(long_paragraphs(60)))
        .child(footer().child(text("Page {{currentPage}} of {{pageCount}}")))
        .into_tree();
    let pdf = generate_pdf(tree, &Config::new().with("copyrightYear", 2018))?;

    let pages = pdf.page_count();
    assert!(pages >= 2);
    for page in 1..=pages {
        let text = pdf.page_text(page as u32);
        assert!(text.contains("Report 2018"), "page {page}:\n{text}");
        assert!(
            text.contains(&format!("Page {page} of {pages}")),
            "page {page}:\n{text}"
        );
    }
    Ok(())
}

#[test]
fn test_table_header_repeats_across_pages() -> TestResult {
    let pdf = generate_pdf(doc_with(vec![two_column_table(120)]), &Config::new())?;

    assert_pdf_min_pages!(pdf, 2);
    for page in 1..=pdf.page_count() as u32 {
        let text = pdf.page_text(page);
        assert!(text.contains("Name"), "page {page} lacks the header row");
    }
    assert_pdf_contains_text!(pdf, "Item 120");
    assert_pdf_contains_text!(pdf, "1200");
    Ok(())
}

#[test]
fn test_columns_place_text_side_by_side() -> TestResult {
    let tree = doc_with(vec![
        columns()
            .child(text("Left column").width(120))
            .child(text("Right column"))
            .into(),
    ]);
    let pdf = generate_pdf(tree, &Config::new())?;

    assert_pdf_page_count!(pdf, 1);
    assert_pdf_contains_text!(pdf, "Left column");
    assert_pdf_contains_text!(pdf, "Right column");
    Ok(())
}

#[test]
fn test_ordered_list_numbers_items() -> TestResult {
    let tree = doc_with(vec![
        ol().child("Alpha").child("Beta").child("Gamma").into(),
        ul().child("Unordered").into(),
    ]);
    let pdf = generate_pdf(tree, &Config::new())?;

    assert_pdf_contains_text!(pdf, "1.");
    assert_pdf_contains_text!(pdf, "3.");
    assert_pdf_contains_text!(pdf, "Gamma");
    assert_pdf_contains_text!(pdf, "Unordered");
    assert_pdf_not_contains_text!(pdf, "4.");
    Ok(())
}

#[test]
fn test_text_styles_select_font_variants() -> TestResult {
    let tree = doc_with(vec![
        rich_text()
            .child("Plain, ")
            .child(text("bold").bold())
            .child(" and ")
            .child(text("oblique").italics())
            .into(),
        text("Fixed width").font("Courier").into(),
    ]);
    let pdf = generate_pdf(tree, &Config::new())?;

    assert_pdf_has_font!(pdf, "Helvetica");
    assert_pdf_has_font!(pdf, "Helvetica-Bold");
    assert_pdf_has_font!(pdf, "Helvetica-Oblique");
    assert_pdf_has_font!(pdf, "Courier");
    Ok(())
}

#[test]
fn test_images_are_embedded_once() -> TestResult {
    let resources = InMemoryResourceProvider::new().with("logo.jpg", jpeg(8, 4));
    let tree = doc_with(vec![
        image("logo.jpg").width(80).into(),
        text("between").into(),
        image("logo.jpg").width(40).into(),
    ]);
    let pdf = generate_pdf_with_resources(tree, &Config::new(), Arc::new(resources))?;

    assert_eq!(image_count(&pdf.doc), 1);
    assert_pdf_contains_text!(pdf, "between");
    Ok(())
}

#[test]
fn test_missing_image_is_a_missing_resource() -> TestResult {
    let model = JsxRenderer::new().render(
        doc_with(vec![image("absent.jpg").into()]),
        &Config::new(),
    )?;
    let mut out = Vec::new();
    let err = PdfSerializer::new(Arc::new(InMemoryResourceProvider::new()))
        .serialize(&model, &FontRegistry::standard(), &mut out)
        .err()
        .ok_or("serialization should fail")?;

    assert!(GenerationError::from(err).is_resource_missing());
    Ok(())
}

#[test]
fn test_document_info_is_written() -> TestResult {
    let tree = document()
        .prop(
            "info",
            json!({"title": "Quarterly report", "author": "Accounts", "creationDate": "2018-01-01T00:00:00Z"}),
        )
        .child(content().child("Body"))
        .into_tree();
    let pdf = generate_pdf(tree, &Config::new())?;

    assert_eq!(info_entry(&pdf.doc, "Title").as_deref(), Some("Quarterly report"));
    assert_eq!(info_entry(&pdf.doc, "Author").as_deref(), Some("Accounts"));
    assert_eq!(
        info_entry(&pdf.doc, "CreationDate").as_deref(),
        Some("D:20180101000000Z")
    );
    Ok(())
}

#[test]
fn test_landscape_page_is_wider_than_tall() -> TestResult {
    let tree = document()
        .prop("pageSize", "A4")
        .prop("pageOrientation", "landscape")
        .child(content().child("Wide"))
        .into_tree();
    let pdf = generate_pdf(tree, &Config::new())?;

    let (_, page_id) = pdf.doc.get_pages().into_iter().next().ok_or("no pages")?;
    let media_box = pdf.doc.get_dictionary(page_id)?.get(b"MediaBox")?.as_array()?;
    let dims: Vec<f32> = media_box
        .iter()
        .map(|v| v.as_float().or_else(|_| v.as_i64().map(|i| i as f32)))
        .collect::<Result<_, _>>()?;
    assert!(dims[2] > dims[3], "MediaBox {dims:?}");
    Ok(())
}
