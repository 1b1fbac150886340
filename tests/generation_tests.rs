mod common;

use common::fixtures::*;
use common::{GeneratedPdf, TestResult, Workspace, run_recorded};
use folio::component::builders::*;
use folio::model::DocumentModel;
use folio::{
    Config, DocumentSerializer, FontDescriptor, FontRegistry, GenerationError, RenderError,
    RunEvent, SerializeSummary,
};
use std::io::Write;

fn copyright_document(_: &Config) -> folio::ComponentTree {
    document()
        .prop("defaultStyle", serde_json::json!({"font": "Helvetica"}))
        .child(content().child(text("Generated for {{copyrightYear}}")))
        .child(footer().child(text("Copyright {{copyrightYear}} - page {{currentPage}}")))
        .into_tree()
}

fn assert_event_shape(events: &[RunEvent], succeeded: bool) {
    assert_eq!(events.first(), Some(&RunEvent::Started));
    assert!(matches!(events.last(), Some(RunEvent::Timing { .. })));
    let timings = events
        .iter()
        .filter(|e| matches!(e, RunEvent::Timing { .. }))
        .count();
    assert_eq!(timings, 1, "exactly one timing event: {events:?}");
    let completed = events
        .iter()
        .filter(|e| matches!(e, RunEvent::Completed { .. }))
        .count();
    let failed = events
        .iter()
        .filter(|e| matches!(e, RunEvent::Failed { .. }))
        .count();
    if succeeded {
        assert_eq!((completed, failed), (1, 0), "{events:?}");
    } else {
        assert_eq!((completed, failed), (0, 1), "{events:?}");
    }
}

#[test]
fn test_successful_run_writes_document() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let ws = Workspace::new()?;
    let script = ws
        .script()
        .with_config(Config::new().with("copyrightYear", 2018))
        .with_template(copyright_document)
        .build()?;

    let (result, events) = run_recorded(&script);
    let report = result?;

    assert_event_shape(&events.events, true);
    assert_eq!(report.output, ws.output);
    assert_eq!(report.pages, 1);
    assert_eq!(report.bytes, std::fs::metadata(&ws.output)?.len());

    let pdf = GeneratedPdf::from_file(&ws.output)?;
    assert_pdf_page_count!(pdf, 1);
    assert_pdf_contains_text!(pdf, "Generated for 2018");
    assert_pdf_contains_text!(pdf, "Copyright 2018 - page 1");
    assert_pdf_has_font!(pdf, "Helvetica");
    Ok(())
}

#[test]
fn test_malformed_tree_fails_without_output() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let ws = Workspace::new()?;
    let script = ws
        .script()
        .with_json_template(r#"{"type": "document", "children": [{"type": "marquee"}]}"#)
        .build()?;

    let (result, events) = run_recorded(&script);

    assert!(matches!(result, Err(GenerationError::Render(_))));
    assert_event_shape(&events.events, false);
    assert!(events.failure().unwrap_or_default().contains("marquee"));
    assert!(!ws.output.exists());
    assert!(ws.entries().is_empty(), "no temporary files left behind");
    Ok(())
}

#[test]
fn test_mismatched_table_is_a_render_failure() -> TestResult {
    let ws = Workspace::new()?;
    let script = ws
        .script()
        .with_template(|_: &Config| {
            doc_with(vec![
                table()
                    .child(row().child(cell().child("a")).child(cell().child("b")))
                    .child(row().child(cell().child("c")))
                    .into(),
            ])
        })
        .build()?;

    let (result, events) = run_recorded(&script);
    assert!(matches!(result, Err(GenerationError::Render(_))));
    assert_event_shape(&events.events, false);
    assert!(!ws.output.exists());
    Ok(())
}

#[test]
fn test_out_of_range_number_is_a_render_failure() -> TestResult {
    let ws = Workspace::new()?;
    let script = ws
        .script()
        .with_template(|_: &Config| doc_with(vec![text("big").prop("fontSize", 1e39).into()]))
        .build()?;

    let (result, events) = run_recorded(&script);
    assert!(matches!(
        result,
        Err(GenerationError::Render(RenderError::InvalidProp { ref prop, .. })) if prop == "fontSize"
    ));
    assert_event_shape(&events.events, false);
    assert!(!ws.output.exists());
    Ok(())
}

#[test]
fn test_unregistered_font_is_a_missing_resource() -> TestResult {
    let ws = Workspace::new()?;
    let script = ws
        .script()
        .with_template(|_: &Config| {
            document()
                .child(content().child(text("Hello").font("OpenSans")))
                .into_tree()
        })
        .build()?;

    let (result, events) = run_recorded(&script);

    let err = result.err().ok_or("run should fail")?;
    assert!(err.is_resource_missing(), "{err}");
    assert!(matches!(
        events.events[1],
        RunEvent::Failed { resource_missing: true, .. }
    ));
    assert_event_shape(&events.events, false);
    assert!(ws.entries().is_empty());
    Ok(())
}

#[test]
fn test_missing_font_file_is_a_missing_resource() -> TestResult {
    let ws = Workspace::new()?;
    let script = ws
        .script()
        .with_font("OpenSans", FontDescriptor::new("OpenSans-Regular.ttf"))
        .with_template(|_: &Config| hello_document("Hello"))
        .build()?;

    let (result, events) = run_recorded(&script);
    assert!(matches!(result, Err(GenerationError::Font(ref e)) if e.is_missing()));
    assert_event_shape(&events.events, false);
    assert!(!ws.output.exists());
    Ok(())
}

#[test]
fn test_repeated_runs_are_byte_identical() -> TestResult {
    let ws = Workspace::new()?;
    let script = ws
        .script()
        .with_config(Config::new().with("copyrightYear", 2018))
        .with_template(copyright_document)
        .build()?;

    script.run(&mut folio::RecordingSink::new())?;
    let first = std::fs::read(&ws.output)?;
    script.run(&mut folio::RecordingSink::new())?;
    let second = std::fs::read(&ws.output)?;

    assert_eq!(first, second);
    assert_eq!(ws.entries().len(), 1);
    Ok(())
}

#[test]
fn test_failed_run_keeps_previous_file() -> TestResult {
    let ws = Workspace::new()?;
    std::fs::write(&ws.output, b"previous")?;
    let script = ws
        .script()
        .with_json_template("{not json")
        .build()?;

    let (result, _) = run_recorded(&script);
    assert!(result.is_err());
    assert_eq!(std::fs::read(&ws.output)?, b"previous");
    Ok(())
}

/// Writes half a document, then fails.
struct BrokenSerializer;

impl DocumentSerializer for BrokenSerializer {
    fn serialize(
        &self,
        _: &DocumentModel,
        _: &FontRegistry,
        out: &mut dyn Write,
    ) -> Result<SerializeSummary, GenerationError> {
        out.write_all(b"%PDF-1.7\n")?;
        Err(GenerationError::Io(std::io::Error::other("disk on fire")))
    }
}

#[test]
fn test_serializer_failure_discards_partial_output() -> TestResult {
    let ws = Workspace::new()?;
    let script = ws
        .script()
        .with_template(|_: &Config| hello_document("Hello"))
        .with_serializer(BrokenSerializer)
        .build()?;

    let (result, events) = run_recorded(&script);
    assert!(matches!(result, Err(GenerationError::Io(_))));
    assert_eq!(events.failure(), Some("I/O error: disk on fire"));
    assert_event_shape(&events.events, false);
    assert!(ws.entries().is_empty(), "partial output must not survive");
    Ok(())
}
