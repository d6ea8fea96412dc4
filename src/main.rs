#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf
)]
#![warn(
    clippy::unwrap_used,
    clippy::clone_on_ref_ptr,
    clippy::empty_structs_with_brackets,
    clippy::dbg_macro
)]

mod app;
mod options;
mod render;
#[cfg(test)]
mod test_logger;

use std::process::ExitCode;

use anyhow::{Context, Result};
use app::App;
use log::{error, info, LevelFilter};
use options::AppOptions;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if log::log_enabled!(log::Level::Error) {
                error!("{e:#}");
            } else {
                eprintln!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    init_logger()?;
    let options = AppOptions::from_env();
    if !options.diagnostics_enabled {
        log::set_max_level(LevelFilter::Info);
    }
    info!(
        "Starting {} (diagnostics {})",
        options.application_name,
        if options.diagnostics_enabled { "on" } else { "off" }
    );

    let (mut app, mut event_loop) = App::new(&options)?;
    app.run(&mut event_loop);
    drop(app);

    info!("Shut down cleanly");
    Ok(())
}

fn init_logger() -> Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .build();
    TermLogger::init(LevelFilter::Trace, config, TerminalMode::Mixed, ColorChoice::Auto)
        .context("Failed to initialize logger")
}

#[cfg(test)]
#[ctor::ctor]
fn init_test_logger() {
    test_logger::init();
}
