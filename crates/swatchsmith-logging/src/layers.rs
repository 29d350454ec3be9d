// ABOUTME: Layer constructors for the console, file, and JSON logging outputs
// ABOUTME: Each constructor returns None when its output is disabled in the configuration

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{FileConfig, LogLevel, OutputConfig};

pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Human readable output on stderr, leaving stdout to command results.
pub fn create_console_layer(config: &OutputConfig) -> Option<BoxedLayer> {
    if !config.console || config.json {
        return None;
    }

    let base = fmt::layer().with_writer(std::io::stderr).with_target(false);
    Some(if config.pretty_console {
        base.pretty().boxed()
    } else {
        base.compact().without_time().boxed()
    })
}

/// Daily-rotating file output. Keep the guard alive for as long as records
/// should reach the file; dropping it flushes the background writer.
pub fn create_file_layer(config: &FileConfig) -> Result<(BoxedLayer, WorkerGuard)> {
    let directory = match config.path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let prefix = config
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Log path {} has no file name", config.path.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(config.max_files.max(1))
        .build(directory)
        .context("Failed to open rolling log file")?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .boxed();
    Ok((layer, guard))
}

/// One JSON object per record on stderr.
pub fn create_json_layer(config: &OutputConfig) -> Option<BoxedLayer> {
    config.json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(false)
            .boxed()
    })
}

/// A filter passing records at `level` and above from every target.
pub fn create_env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(level.as_str())
}
