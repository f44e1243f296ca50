//! Trace logging and benchmarking for the runtime.
//!
//! The channel is for operators, not for program correctness: every line is
//! timestamped, tagged with the emitting operation, and written to a sink
//! that defaults to stderr.  Tracing is compiled down to nothing in release
//! builds; error reports go through [`alert`], which is never gated.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use parking_lot::RwLock;

/// Destination for diagnostic lines.  Swappable so tests can observe the
/// channel without scraping stderr.
pub trait TraceSink: Send + Sync {
    fn write_line(&self, line: &str);
}

struct StderrSink;

impl TraceSink for StderrSink {
    fn write_line(&self, line: &str) {
        eprintln!("{line}");
    }
}

static SINK: RwLock<Option<Arc<dyn TraceSink>>> = RwLock::new(None);

/// Replaces the diagnostic sink for the whole process.
pub fn set_sink(sink: Arc<dyn TraceSink>) {
    *SINK.write() = Some(sink);
}

/// Restores the default stderr sink.
pub fn reset_sink() {
    *SINK.write() = None;
}

/// Whether trace output is compiled in.
pub const fn enabled() -> bool {
    cfg!(debug_assertions)
}

/// Emits a trace line when tracing is enabled.  Prefer the [`trace!`] macro.
///
/// [`trace!`]: crate::trace
pub fn emit(op: &str, args: fmt::Arguments<'_>) {
    if !enabled() {
        return;
    }
    forward(op, args);
}

/// Emits unconditionally.  Reserved for error reports, which must never be
/// swallowed by the debug gate.
pub fn alert(op: &str, args: fmt::Arguments<'_>) {
    forward(op, args);
}

fn forward(op: &str, args: fmt::Arguments<'_>) {
    let line = format!("[{}] {op}(): {args}", Local::now().format("%d/%m %H:%M:%S"));
    match &*SINK.read() {
        Some(sink) => sink.write_line(&line),
        None => StderrSink.write_line(&line),
    }
}

/// Formats a timestamped, operation-tagged line through the diagnostic sink.
///
/// The first argument names the emitting operation; the rest are `format!`
/// arguments.  Compiles to a no-op in release builds.
#[macro_export]
macro_rules! trace {
    ($op:expr, $($arg:tt)+) => {
        $crate::diag::emit($op, format_args!($($arg)+))
    };
}

/// Elapsed-time probe around an identifier.
///
/// `mark` captures a high-resolution counter; `report` emits the elapsed
/// microseconds through the trace sink and returns them.  Pair them
/// lexically within one scope, one label per measurement.
#[derive(Debug)]
pub struct Stopwatch {
    label: &'static str,
    started: Instant,
}

impl Stopwatch {
    pub fn mark(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
        }
    }

    pub fn report(self) -> u64 {
        let micros = self.started.elapsed().as_micros() as u64;
        emit(self.label, format_args!("took {micros} us"));
        micros
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn trace_lines_carry_timestamp_and_operation_tag() {
        let capture = capture::install();
        trace!("load_texture", "loaded {} texels", 64);
        alert("load_texture", format_args!("probe failed"));

        let lines = capture.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("load_texture(): loaded 64 texels"));
        assert!(lines[1].contains("load_texture(): probe failed"));
        // "[dd/mm hh:mm:ss] " prefix
        assert!(lines[0].starts_with('['));
        assert_eq!(&lines[0][3..4], "/");
        assert_eq!(&lines[0][9..10], ":");
    }

    #[test]
    fn stopwatch_reports_nonnegative_elapsed_micros() {
        let capture = capture::install();
        let watch = Stopwatch::mark("noop");
        let elapsed = watch.report();
        assert!(capture.lines()[0].contains("noop(): took"));
        assert!(elapsed < 1_000_000);
    }

    #[test]
    fn stopwatch_tracks_an_artificial_delay() {
        let _capture = capture::install();
        let watch = Stopwatch::mark("delay");
        thread::sleep(Duration::from_millis(50));
        let elapsed = watch.report();
        assert!(elapsed >= 50_000, "reported {elapsed} us for a 50 ms sleep");
        assert!(elapsed < 5_000_000);
    }
}
