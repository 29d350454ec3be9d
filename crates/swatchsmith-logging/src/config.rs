// ABOUTME: The [logging] section of the swatch config and its environment overrides
// ABOUTME: Verbosity, which outputs are enabled, and where the rotating log file lives

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// Log verbosity, least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[serde(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// At least as verbose as `self`, raised by `-v` flags on the command line.
    pub fn raised_by(self, verbosity: u8) -> Self {
        let requested = match verbosity {
            0 => LogLevel::Error,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };
        self.max(requested)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    /// Case-insensitive; `warning` is accepted for `warn`.
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => bail!("Unknown log level '{s}'; expected error, warn, info, debug or trace"),
        })
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub output: OutputConfig,
    pub file: FileConfig,
}

/// Which sinks receive log records. Console and JSON both write to stderr,
/// so JSON replaces the console sink when enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub console: bool,
    pub file: bool,
    pub json: bool,
    pub pretty_console: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Base name of the daily log file; the date is appended on rotation.
    pub path: PathBuf,
    /// Rotated files kept on disk.
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            output: OutputConfig::default(),
            file: FileConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            console: true,
            file: false,
            json: false,
            pretty_console: false,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        let path = dirs::data_dir()
            .map(|dir| dir.join("swatchsmith").join("swatch.log"))
            .unwrap_or_else(|| PathBuf::from("swatch.log"));
        Self { path, max_files: 5 }
    }
}

impl LoggingConfig {
    /// Apply `SWATCHSMITH_LOG*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`:
    ///
    /// - `SWATCHSMITH_LOG`: level
    /// - `SWATCHSMITH_LOG_JSON`, `SWATCHSMITH_LOG_CONSOLE`: on/off switches
    /// - `SWATCHSMITH_LOG_FILE`: enables file output, optionally at a new path
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("SWATCHSMITH_LOG") {
            self.level = level.parse()?;
        }
        if let Some(value) = lookup("SWATCHSMITH_LOG_JSON") {
            self.output.json = switch("SWATCHSMITH_LOG_JSON", &value)?;
        }
        if let Some(value) = lookup("SWATCHSMITH_LOG_CONSOLE") {
            self.output.console = switch("SWATCHSMITH_LOG_CONSOLE", &value)?;
        }
        if let Some(path) = lookup("SWATCHSMITH_LOG_FILE") {
            self.output.file = true;
            if !path.trim().is_empty() {
                self.file.path = PathBuf::from(path);
            }
        }
        Ok(())
    }
}

fn switch(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => bail!("{name} must be on or off, got '{value}'"),
    }
}
