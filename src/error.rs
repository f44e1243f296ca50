//! Structured errors and the propagation strategies used by every fallible
//! operation in the runtime.
//!
//! A failure is reported exactly once, at the call site that decides its
//! fate, and every report carries the platform error code and description
//! ahead of the caller's own context.  Three strategies exist:
//!
//! * [`ErrorPolicy::or_recover`]: log, then continue with a fallback value.
//! * [`ErrorPolicy::reported`]: log, then propagate with `?`; resources
//!   acquired earlier in the operation are released by `Drop` on the way
//!   out.  Callers that escalate to `process::exit` afterwards must drop
//!   live resources explicitly first, since `process::exit` skips
//!   destructors.
//! * [`ErrorPolicy::or_exit`]: log, then terminate the process with the
//!   error's own exit code.

use std::io;
use std::process;

use thiserror::Error;

use crate::diag;

/// Exit status when the interpreter instance could not be created.
pub const EXIT_INTERPRETER_INIT: i32 = 2;
/// Exit status when a script failed to load or raised a fault while running.
pub const EXIT_SCRIPT_FAILURE: i32 = 3;
/// Exit status when the graphics error probe found pending faults.
pub const EXIT_GRAPHICS_FAULT: i32 = 4;

/// Unified error type for the runtime core.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("could not initialize the script interpreter: {0}")]
    InterpreterInit(#[source] mlua::Error),
    #[error("could not load script {path}: {message}")]
    Script { path: String, message: String },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl RuntimeError {
    /// Wraps an interpreter fault raised while compiling or running `path`.
    /// Compile-time and run-time faults are deliberately not distinguished.
    pub fn script(path: &str, err: &mlua::Error) -> Self {
        Self::Script {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit status for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InterpreterInit(_) => EXIT_INTERPRETER_INIT,
            Self::Script { .. } | Self::Io { .. } => EXIT_SCRIPT_FAILURE,
        }
    }

    /// Raw OS error code, when the platform produced one.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Self::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    fn os_description(&self) -> String {
        match self {
            Self::Io { source, .. } => source.to_string(),
            _ => "None".to_string(),
        }
    }
}

/// Logs `err` through the diagnostics channel, tagged with the reporting
/// operation.  Shared by all three propagation strategies.
pub fn report(err: &RuntimeError, op: &str) {
    diag::alert(
        op,
        format_args!(
            "[ERROR] ({}: '{}') {err}",
            err.os_code().unwrap_or(0),
            err.os_description()
        ),
    );
}

/// The three propagation strategies, selected per call site.
pub trait ErrorPolicy<T> {
    /// Logs the failure and continues with `fallback`.
    fn or_recover(self, fallback: T, op: &str) -> T;
    /// Logs the failure and hands it back for `?` propagation.
    fn reported(self, op: &str) -> Result<T, RuntimeError>;
    /// Logs the failure and terminates the process with its exit code.
    fn or_exit(self, op: &str) -> T;
}

impl<T> ErrorPolicy<T> for Result<T, RuntimeError> {
    fn or_recover(self, fallback: T, op: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                report(&err, op);
                fallback
            }
        }
    }

    fn reported(self, op: &str) -> Result<T, RuntimeError> {
        self.map_err(|err| {
            report(&err, op);
            err
        })
    }

    fn or_exit(self, op: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                report(&err, op);
                process::exit(err.exit_code());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::capture;

    fn missing_file_error() -> RuntimeError {
        let source = std::fs::read_to_string("/nonexistent/entry.lua").unwrap_err();
        RuntimeError::io("could not read script /nonexistent/entry.lua", source)
    }

    #[test]
    fn exit_codes_distinguish_failure_classes() {
        let script = RuntimeError::Script {
            path: "game/hello.lua".into(),
            message: "syntax error near 'end'".into(),
        };
        assert_eq!(script.exit_code(), EXIT_SCRIPT_FAILURE);
        assert_eq!(missing_file_error().exit_code(), EXIT_SCRIPT_FAILURE);
        assert_ne!(EXIT_INTERPRETER_INIT, EXIT_SCRIPT_FAILURE);
    }

    #[test]
    fn io_errors_surface_the_platform_code() {
        let err = missing_file_error();
        assert!(err.os_code().is_some());
        let script = RuntimeError::Script {
            path: "x.lua".into(),
            message: "boom".into(),
        };
        assert_eq!(script.os_code(), None);
    }

    #[test]
    fn or_recover_logs_and_returns_the_fallback() {
        let capture = capture::install();
        let value: u32 = Err(missing_file_error()).or_recover(7, "load_config");
        assert_eq!(value, 7);
        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("load_config(): [ERROR]"));
        assert!(lines[0].contains("could not read script /nonexistent/entry.lua"));
    }

    #[test]
    fn reported_logs_once_and_propagates_the_error() {
        let capture = capture::install();
        let result: Result<(), _> = Err(missing_file_error()).reported("initialize");
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), EXIT_SCRIPT_FAILURE);
        assert_eq!(capture.lines().len(), 1);
    }

    #[test]
    fn ok_values_pass_through_untouched() {
        let capture = capture::install();
        assert_eq!(Ok::<_, RuntimeError>(3).or_recover(0, "noop"), 3);
        assert_eq!(Ok::<_, RuntimeError>(3).or_exit("noop"), 3);
        assert!(capture.lines().is_empty());
    }
}
