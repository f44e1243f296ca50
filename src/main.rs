use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Result};
use log::info;

use prototype_runtime::diag::Stopwatch;
use prototype_runtime::{app, ErrorPolicy, RuntimeError, ScriptRuntime, DEFAULT_ENTRY_SCRIPT};

fn main() {
    env_logger::init();
    let options = match CliOptions::parse() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {err:?}");
            process::exit(1);
        }
    };

    let watch = Stopwatch::mark("boot");
    let runtime = app::initialize(&options.entry);
    if let Err(err) = run_remaining(&runtime, &options.scripts) {
        app::destroy(Some(runtime));
        process::exit(err.exit_code());
    }

    info!(
        "interpreter holds {} bytes after running all scripts",
        runtime.memory_used()
    );
    println!("Executed {} script(s)", 1 + options.scripts.len());
    watch.report();
    app::destroy(Some(runtime));
}

fn run_remaining(runtime: &ScriptRuntime, scripts: &[PathBuf]) -> Result<(), RuntimeError> {
    scripts
        .iter()
        .try_for_each(|script| runtime.run_file(script).reported("main"))
}

struct CliOptions {
    entry: PathBuf,
    scripts: Vec<PathBuf>,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut paths = Vec::new();
        for arg in env::args().skip(1) {
            if arg.starts_with('-') {
                return Err(anyhow!(
                    "Unknown argument: {arg}. Usage: prototype-runtime [script.lua [more.lua ...]]"
                ));
            }
            paths.push(PathBuf::from(arg));
        }
        let entry = if paths.is_empty() {
            PathBuf::from(DEFAULT_ENTRY_SCRIPT)
        } else {
            paths.remove(0)
        };
        Ok(Self {
            entry,
            scripts: paths,
        })
    }
}
