// ABOUTME: Tracing subscriber initialization and layer composition
// ABOUTME: Combines console, file, and JSON layers behind a single level filter

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::LoggingConfig;
use crate::layers::{
    BoxedLayer, create_console_layer, create_env_filter, create_file_layer, create_json_layer,
};

/// Keeps background log writers alive. Dropping it flushes pending file output.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

fn build_layers(config: &LoggingConfig) -> Result<(Vec<BoxedLayer>, Option<WorkerGuard>)> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.extend(create_console_layer(&config.output));
    layers.extend(create_json_layer(&config.output));

    let file_guard = if config.output.file {
        let (layer, guard) = create_file_layer(&config.file)?;
        layers.push(layer);
        Some(guard)
    } else {
        None
    };
    Ok((layers, file_guard))
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_subscriber(config: LoggingConfig) -> Result<LoggingGuard> {
    use tracing_subscriber::{prelude::*, util::SubscriberInitExt};

    let (layers, file_guard) = build_layers(&config)?;
    tracing_subscriber::registry()
        .with(layers)
        .with(create_env_filter(config.level))
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    tracing::debug!(
        level = %config.level,
        console = config.output.console,
        json = config.output.json,
        file = config.output.file,
        file_path = %config.file.path.display(),
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
