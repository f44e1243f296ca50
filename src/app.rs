//! Host-facing lifecycle entry points.
//!
//! The host calls [`initialize`] once at startup and [`destroy`] once at
//! shutdown.  Failures during initialization are unrecoverable: they are
//! logged through the diagnostics channel and escalate to process exit,
//! with a status that tells interpreter faults apart from script faults.

use std::path::Path;
use std::process;

use crate::error::ErrorPolicy;
use crate::scripting::ScriptRuntime;
use crate::trace;

/// Entry script the host runs when none is specified.
pub const DEFAULT_ENTRY_SCRIPT: &str = "game/hello.lua";

/// Builds the script runtime and runs the entry script, returning the live
/// handle for the rest of the host's lifetime.
///
/// Terminates the process with [`EXIT_INTERPRETER_INIT`] when the
/// interpreter cannot be created, and with [`EXIT_SCRIPT_FAILURE`] when the
/// entry script fails to compile or run; the handle is released before
/// either exit.
///
/// [`EXIT_INTERPRETER_INIT`]: crate::error::EXIT_INTERPRETER_INIT
/// [`EXIT_SCRIPT_FAILURE`]: crate::error::EXIT_SCRIPT_FAILURE
pub fn initialize(entry_script: &Path) -> ScriptRuntime {
    let runtime = ScriptRuntime::initialize().or_exit("initialize");
    match runtime.run_file(entry_script).reported("initialize") {
        Ok(()) => {
            trace!("initialize", "ran entry script {}", entry_script.display());
            runtime
        }
        Err(err) => {
            // process::exit skips destructors; release the interpreter first
            let code = err.exit_code();
            drop(runtime);
            process::exit(code);
        }
    }
}

/// Releases the interpreter during host shutdown.  A `None` handle (from an
/// initialization that never completed, or a repeated shutdown) is a no-op
/// rather than a fault.
pub fn destroy(runtime: Option<ScriptRuntime>) {
    match runtime {
        Some(runtime) => runtime.shutdown(),
        None => trace!("destroy", "no interpreter to release"),
    }
}
