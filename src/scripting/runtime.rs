use std::fs;
use std::path::Path;

use mlua::{Lua, LuaOptions, StdLib};

use crate::error::RuntimeError;
use crate::trace;

use super::bindings::register_globals;

/// Owning handle to one embedded Lua interpreter.
///
/// The handle is single-owner by construction: it is not `Clone` and not
/// `Sync`, so every operation (library loading, script execution,
/// teardown) happens on the thread that owns it.  Dropping the handle
/// releases the interpreter and all memory it manages; any number of
/// scripts may run against it sequentially before that, and separate
/// handles are fully independent of each other.
pub struct ScriptRuntime {
    lua: Lua,
}

impl ScriptRuntime {
    /// Creates a fresh interpreter with the full safe standard-library
    /// surface opened, and installs the host bindings.
    ///
    /// Scripts are trusted: no filesystem or OS restriction is imposed
    /// beyond what a safe Lua state already withholds (`debug`, FFI).
    pub fn initialize() -> Result<Self, RuntimeError> {
        let lua = Lua::new_with(StdLib::ALL_SAFE, LuaOptions::default())
            .map_err(RuntimeError::InterpreterInit)?;
        register_globals(&lua).map_err(RuntimeError::InterpreterInit)?;
        trace!("initialize", "successfully loaded the script interpreter");
        Ok(Self { lua })
    }

    /// Reads `path` into memory, compiles it, and runs it to completion.
    ///
    /// The chunk is invoked with zero arguments and may return any number
    /// of values; all of them are discarded, since scripts act through side
    /// effects on globals and host bindings.  A compile fault and a fault
    /// raised mid-run surface identically, carrying the interpreter's own
    /// error text.  The handle stays usable after either.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<(), RuntimeError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| {
            RuntimeError::io(format!("could not read script {}", path.display()), source)
        })?;
        self.exec(&path.to_string_lossy(), &source)
    }

    /// Compiles and runs `source` under `name` (used in interpreter
    /// error messages and tracebacks).
    pub fn exec(&self, name: &str, source: &str) -> Result<(), RuntimeError> {
        self.lua
            .load(source)
            .set_name(name)
            .exec()
            .map_err(|err| RuntimeError::script(name, &err))?;
        trace!("exec", "finished running {name}");
        Ok(())
    }

    /// Evaluates an expression and converts the result, for host-side
    /// inspection of script side effects.
    pub fn eval<'lua, T: mlua::FromLuaMulti<'lua>>(
        &'lua self,
        source: &str,
    ) -> Result<T, RuntimeError> {
        self.lua
            .load(source)
            .eval()
            .map_err(|err| RuntimeError::script("<eval>", &err))
    }

    /// Bytes currently allocated by the interpreter.
    pub fn memory_used(&self) -> usize {
        self.lua.used_memory()
    }

    /// Runs a full garbage-collection cycle.
    pub fn collect_garbage(&self) -> Result<(), RuntimeError> {
        self.lua
            .gc_collect()
            .map_err(|err| RuntimeError::script("<gc>", &err))
    }

    /// Releases the interpreter.  Equivalent to dropping the handle; exists
    /// so shutdown sequences read explicitly.
    pub fn shutdown(self) {
        trace!("shutdown", "releasing the script interpreter");
    }
}
