//! pulse - terminal front-end for the pulse synth
//!
//! Run with: cargo run --bin pulse

mod app;
mod ui;

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use pulse_synth::ProcessorConfig;
use tracing::info;

use app::PulseApp;

const LOG_FILE: &str = "pulse.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let config = config_from_env()?;
    info!(?config, "starting");

    PulseApp::new(config)?.run()
}

/// Route tracing output to a file so it never draws over the TUI.
fn init_logging() -> EyreResult<()> {
    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn config_from_env() -> EyreResult<ProcessorConfig> {
    let mut config = ProcessorConfig::default();
    if let Some(voices) = env_usize("PULSE_POLYPHONY")? {
        config = config.polyphony(voices);
    }
    if let Some(frames) = env_usize("PULSE_BLOCK_SIZE")? {
        config = config.max_block_size(frames);
    }
    config.validate()?;
    Ok(config)
}

fn env_usize(name: &str) -> EyreResult<Option<usize>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .wrap_err_with(|| format!("{name} is not a number: {raw:?}")),
        Err(_) => Ok(None),
    }
}
