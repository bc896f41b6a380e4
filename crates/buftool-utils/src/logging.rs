//! # Logging Utilities
//!
//! Logging infrastructure for buftool using `tracing`.
//!
//! This module provides structured logging with support for:
//! - Two output formats (pretty for people, JSON for log processors)
//! - Environment variable configuration
//! - Log level filtering
//! - Optional file output next to the console
//!
//! Console output always goes to **stderr**. Stdout belongs to the shell, so
//! hex dumps and command output can be piped without log lines mixed in.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use buftool_utils::init_logging;
//!
//! // Reads RUST_LOG / BUFTOOL_LOG_FORMAT / BUFTOOL_LOG_FILE
//! let _guard = init_logging().expect("Failed to initialize logging");
//!
//! tracing::warn!("only warnings and errors are shown by default");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Log filter (e.g. `RUST_LOG=debug`, `RUST_LOG=buftool_core=trace`)
//! - `BUFTOOL_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
//! - `BUFTOOL_LOG_FILE`: Optional path of a log file, written in addition to the console
//!
//! ## Examples
//!
//! ```rust,no_run
//! use buftool_utils::{init_logging_with_level, LogFormat, LogLevel};
//!
//! // An explicit level wins over RUST_LOG
//! let _guard = init_logging_with_level(LogLevel::Debug, LogFormat::Json)
//!     .expect("Failed to initialize logging");
//! ```

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self as tracing_fmt};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format
pub const LOG_FORMAT_ENV: &str = "BUFTOOL_LOG_FORMAT";

/// Environment variable naming an optional log file
pub const LOG_FILE_ENV: &str = "BUFTOOL_LOG_FILE";

/// Level used when neither a flag nor `RUST_LOG` says otherwise
pub const DEFAULT_LEVEL: LogLevel = LogLevel::Warn;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Human-readable lines (default)
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat
{
    /// Format named by `BUFTOOL_LOG_FORMAT`, or the default
    ///
    /// Unrecognised values fall back to [`LogFormat::Pretty`].
    pub fn from_env() -> Self
    {
        env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level (default)
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let name = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Keeps the background log-file writer alive
///
/// Buffered file output is flushed when this is dropped, so hold it until
/// the program exits. Console-only logging still returns one; it just has
/// nothing to flush.
#[must_use = "dropping the guard stops file logging"]
#[derive(Debug)]
pub struct LoggingGuard
{
    _file: Option<WorkerGuard>,
}

/// Initialize logging from the environment
///
/// Reads configuration from environment variables:
/// - `RUST_LOG`: Log filter, defaulting to `warn`
/// - `BUFTOOL_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
/// - `BUFTOOL_LOG_FILE`: Optional path to a log file
///
/// ## Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - The log file path has no file name or its directory can't be created
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    init_logging_with(None, LogFormat::from_env())
}

/// Initialize logging with an explicit level and format
///
/// `level` replaces whatever `RUST_LOG` says. `BUFTOOL_LOG_FILE` is still
/// honoured.
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    init_logging_with(Some(level), format)
}

/// Initialize logging with an optional level override
///
/// With `None` the filter comes from `RUST_LOG`, as in [`init_logging`].
/// Command-line front ends use this to let each flag override only its own
/// environment variable.
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging_with(level: Option<LogLevel>, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    let mut layers = vec![console_layer(format, build_filter(level))];

    let guard = match env::var_os(LOG_FILE_ENV) {
        Some(path) if !path.is_empty() => {
            let (layer, guard) = file_layer(Path::new(&path), format, build_filter(level))?;
            layers.push(layer);
            Some(guard)
        }
        _ => None,
    };

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;

    tracing::debug!(?format, level = ?level, "logging initialized");
    Ok(LoggingGuard { _file: guard })
}

/// Build the event filter
///
/// Priority:
/// 1. An explicit level (from the `--log-level` flag)
/// 2. `RUST_LOG`, which may carry per-crate directives
/// 3. [`DEFAULT_LEVEL`]
fn build_filter(explicit: Option<LogLevel>) -> EnvFilter
{
    if let Some(level) = explicit {
        return EnvFilter::new(level.to_string());
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL.to_string()))
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer
{
    match format {
        LogFormat::Pretty => tracing_fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(path: &Path, format: LogFormat, filter: EnvFilter) -> Result<(BoxedLayer, WorkerGuard), LoggingError>
{
    let (dir, name) = split_log_path(path)?;
    std::fs::create_dir_all(&dir)?;

    // The file name is used as given, no date suffix
    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = match format {
        LogFormat::Pretty => tracing_fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    };

    Ok((layer, guard))
}

/// Split a log file path into its directory (`.` if none) and file name
fn split_log_path(path: &Path) -> Result<(PathBuf, OsString), LoggingError>
{
    let name = path
        .file_name()
        .ok_or_else(|| LoggingError::FileError(io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name")))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name.to_os_string()))
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}. Use 'pretty' or 'json'")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}. Use 'error', 'warn', 'info', 'debug', or 'trace'")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("text").unwrap(), LogFormat::Pretty);
        assert!(matches!(
            LogFormat::from_str("xml"),
            Err(LoggingError::InvalidFormat(s)) if s == "xml"
        ));
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("TRACE").unwrap(), LogLevel::Trace);
        assert!(matches!(LogLevel::from_str("loud"), Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_default_level_is_quiet()
    {
        assert_eq!(DEFAULT_LEVEL, LogLevel::Warn);
        assert!(DEFAULT_LEVEL < LogLevel::Info);
    }

    #[test]
    fn test_log_level_display_parses_back()
    {
        for level in [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug, LogLevel::Trace] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!(DEFAULT_LEVEL.to_string(), "warn");
    }

    #[test]
    fn test_split_log_path()
    {
        let (dir, name) = split_log_path(Path::new("/var/log/buftool.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/log"));
        assert_eq!(name, OsString::from("buftool.log"));

        let (dir, name) = split_log_path(Path::new("buftool.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, OsString::from("buftool.log"));

        assert!(split_log_path(Path::new("/")).is_err());
    }
}
