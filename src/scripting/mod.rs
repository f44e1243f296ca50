mod bindings;
mod runtime;

pub use runtime::ScriptRuntime;
