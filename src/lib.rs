//! Scripting and diagnostics core of the prototype engine, rewritten in
//! Rust.
//!
//! The crate owns the embedded Lua interpreter's lifecycle and the
//! structured error propagation between it and the native host: behavior
//! (entity logic, configuration, live-editable rules) is authored in
//! scripts outside the compiled binary.  Rendering, windowing, and asset
//! handling are intentionally kept outside of the crate so that the code
//! remains testable and easy to embed in headless tools.

pub mod app;
pub mod diag;
pub mod error;
pub mod gl_debug;
pub mod scripting;

pub use app::{destroy, initialize, DEFAULT_ENTRY_SCRIPT};
pub use diag::{Stopwatch, TraceSink};
pub use error::{
    ErrorPolicy, RuntimeError, EXIT_GRAPHICS_FAULT, EXIT_INTERPRETER_INIT, EXIT_SCRIPT_FAILURE,
};
pub use scripting::ScriptRuntime;
