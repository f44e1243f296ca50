use std::fs;
use std::time::Instant;

use mlua::{Lua, Result as LuaResult, Value, Variadic};

use crate::error::{ErrorPolicy, RuntimeError};
use crate::trace;

/// Installs the host-facing globals scripts act through.
pub(super) fn register_globals(lua: &Lua) -> LuaResult<()> {
    register_print(lua)?;
    register_host(lua)?;
    Ok(())
}

fn register_print(lua: &Lua) -> LuaResult<()> {
    let print = lua.create_function(|lua, values: Variadic<Value>| {
        let mut out = Vec::new();
        for value in values.iter() {
            let text = match value {
                Value::Nil => "nil".to_string(),
                Value::Boolean(b) => b.to_string(),
                Value::String(s) => s.to_str()?.to_string(),
                _ => match lua.coerce_string(value.clone())? {
                    Some(s) => s.to_str()?.to_string(),
                    None => format!("{:?}", value),
                },
            };
            out.push(text);
        }
        println!("[script] {}", out.join("\t"));
        Ok(())
    })?;
    lua.globals().set("print", print)?;
    Ok(())
}

fn register_host(lua: &Lua) -> LuaResult<()> {
    let host = lua.create_table()?;
    host.set("version", env!("CARGO_PKG_VERSION"))?;

    let trace_fn = lua.create_function(|_, message: String| {
        trace!("script", "{message}");
        Ok(())
    })?;
    host.set("trace", trace_fn)?;

    // the whole-file reader also backs alternate script load paths; scripts
    // get nil back instead of an error when the file is unreadable
    let read = lua.create_function(|_, path: String| {
        let contents = fs::read_to_string(&path)
            .map_err(|source| RuntimeError::io(format!("could not read {path}"), source))
            .map(Some)
            .or_recover(None, "host.read");
        Ok(contents)
    })?;
    host.set("read", read)?;

    let started = Instant::now();
    let clock = lua.create_function(move |_, ()| Ok(started.elapsed().as_micros() as u64))?;
    host.set("clock_us", clock)?;

    lua.globals().set("host", host)?;
    Ok(())
}
