use std::ffi::OsString;
use std::sync::Once;

use clap::Parser;
use pik_api::{
    create_engine_from_definitions, execute_callback, load_script, CreateEngineOptions,
};
use pik_defs::load_definitions;
use tracing::{debug, info};

mod cli_args;
mod error_map;
mod models;
mod source_loader;

pub(crate) use cli_args::{CheckArgs, Cli, Mode, RunArgs};
pub(crate) use error_map::{
    emit_error, map_cli_output, map_cli_source_path, map_cli_source_read, map_cli_source_scan,
    CliError,
};
pub(crate) use models::{capture_state, CheckSummary};
pub(crate) use source_loader::{collect_definition_files, read_source, resolve_source_path};

/// Environment variable holding the log filter, e.g. `PIK_LOG=pik_runtime=debug`.
pub const LOG_ENV: &str = "PIK_LOG";

static TRACING_INIT: Once = Once::new();

/// Installs the stderr log subscriber. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();
    });
}

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_tracing();
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        Mode::Check(args) => run_check(args),
        Mode::Run(args) => run_scene(args),
    }
}

fn run_check(args: CheckArgs) -> Result<i32, CliError> {
    let root = resolve_source_path(&args.path)?;
    let files = collect_definition_files(&root)?;

    let mut objects = 0;
    for file in &files {
        let text = read_source(file)?;
        let loaded = load_definitions(&text)
            .map_err(|error| CliError::new(error.code(), error.to_string()).in_file(file))?;
        debug!(file = %file.display(), objects = loaded.len(), "definitions checked");
        objects += loaded.len();
    }

    let summary = CheckSummary {
        files: files.len(),
        objects,
    };
    println!(
        "SUMMARY:{}",
        serde_json::to_string(&summary).map_err(map_cli_output)?
    );
    println!("RESULT:OK");
    Ok(0)
}

fn run_scene(args: RunArgs) -> Result<i32, CliError> {
    let global_path = resolve_source_path(&args.global)?;
    let global_definitions = read_source(&global_path)?;
    let scene_definitions = match &args.scene {
        Some(scene) => Some(read_source(&resolve_source_path(scene)?)?),
        None => None,
    };

    let engine = create_engine_from_definitions(CreateEngineOptions {
        global_definitions,
        scene_definitions,
        max_call_depth: args.max_call_depth,
    })?;
    info!(calls = args.calls.len(), ticks = args.ticks, "engine ready");

    for call in &args.calls {
        let script = load_script(call)?;
        let value = execute_callback(&engine, None, &script, vec![])?;
        println!(
            "CALL_RESULT_JSON:{}",
            serde_json::to_string(&value).map_err(map_cli_output)?
        );
    }

    for _ in 0..args.ticks {
        engine.tick(args.tick_ms)?;
    }

    let state = capture_state(&engine);
    println!(
        "STATE:{}",
        serde_json::to_string(&state).map_err(map_cli_output)?
    );
    println!("RESULT:OK");
    Ok(0)
}

#[cfg(test)]
mod tests;
