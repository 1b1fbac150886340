use std::path::PathBuf;
use std::time::Instant;

/// Progress reported by [`super::GenerationScript::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Started,
    Completed {
        path: PathBuf,
        pages: usize,
        bytes: u64,
    },
    Failed {
        message: String,
        resource_missing: bool,
    },
    /// Always the last event of a run, success or not.
    Timing { elapsed_ms: u64 },
}

/// Receives run events.
pub trait EventSink {
    fn emit(&mut self, event: RunEvent);
}

impl<F: FnMut(RunEvent)> EventSink for F {
    fn emit(&mut self, event: RunEvent) {
        self(event)
    }
}

/// Reports events through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&mut self, event: RunEvent) {
        match event {
            RunEvent::Started => log::info!("Generating PDF..."),
            RunEvent::Completed { path, pages, bytes } => {
                log::info!("PDF generated");
                log::debug!("Wrote {} pages ({} bytes) to {}", pages, bytes, path.display());
            }
            RunEvent::Failed {
                message,
                resource_missing,
            } => {
                log::error!("PDF generation failed");
                if resource_missing {
                    log::error!("Missing resource: {}", message);
                } else {
                    log::error!("{}", message);
                }
            }
            RunEvent::Timing { elapsed_ms } => log::info!("Took {}ms", elapsed_ms),
        }
    }
}

/// Keeps every event, for tests and callers that report on their own.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<RunEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeeded(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, RunEvent::Completed { .. }))
    }

    pub fn failure(&self) -> Option<&str> {
        self.events.iter().find_map(|e| match e {
            RunEvent::Failed { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn timings(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RunEvent::Timing { elapsed_ms } => Some(*elapsed_ms),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: RunEvent) {
        self.events.push(event);
    }
}

/// Emits `Started` on creation and exactly one `Timing` when dropped, also
/// while unwinding.
pub struct TimingScope<'a> {
    start: Instant,
    sink: &'a mut dyn EventSink,
}

impl<'a> TimingScope<'a> {
    pub fn start(sink: &'a mut dyn EventSink) -> Self {
        let start = Instant::now();
        sink.emit(RunEvent::Started);
        Self { start, sink }
    }

    pub fn emit(&mut self, event: RunEvent) {
        self.sink.emit(event);
    }

    /// Elapsed wall time in milliseconds, rounded to the nearest integer.
    pub fn elapsed_ms(&self) -> u64 {
        (self.start.elapsed().as_secs_f64() * 1000.0).round() as u64
    }
}

impl Drop for TimingScope<'_> {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        self.sink.emit(RunEvent::Timing { elapsed_ms });
    }
}
