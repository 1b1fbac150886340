use folio::sample::{FALLBACK_FONT, SAMPLE_FONT, installed_fonts, sample_document};
use folio::{Config, GenerationScript, LogEventSink};
use std::env;
use std::path::Path;

const DEFAULT_FONT_DIR: &str = "assets/fonts";

/// Writes the sample document to `example.pdf` in the working directory.
///
/// OpenSans is embedded from `FOLIO_FONT_DIR` (default `assets/fonts`).
/// When its regular face is not there, the sample is set in the built-in
/// Helvetica instead.
///
/// Failures are logged and the process still exits normally; the log shows
/// whether the run succeeded and how long it took.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("folio=info"))
        .init();

    let font_dir = env::var("FOLIO_FONT_DIR").unwrap_or_else(|_| DEFAULT_FONT_DIR.to_string());
    let mut config = Config::new().with("copyrightYear", 2018);
    let mut builder = GenerationScript::builder().with_resource_dir(&font_dir);
    match installed_fonts(Path::new(&font_dir)) {
        Some(fonts) => {
            log::debug!("Loading {} from {}", SAMPLE_FONT, font_dir);
            builder = builder.with_font(SAMPLE_FONT, fonts);
        }
        None => {
            log::warn!(
                "{} not found in {}, using {}",
                SAMPLE_FONT,
                font_dir,
                FALLBACK_FONT
            );
            config.set("font", FALLBACK_FONT);
        }
    }

    let script = builder
        .with_config(config)
        .with_template(sample_document)
        .with_output("example.pdf")
        .build();

    match script {
        Ok(script) => {
            // Outcome and timing are already reported through the log.
            let _ = script.run(&mut LogEventSink);
        }
        Err(e) => log::error!("Failed to set up PDF generation: {}", e),
    }
}
