//! Tracing setup shared by the command line tools.
//!
//! Console output honours `RUST_LOG`. File output goes through a rolling
//! appender, which is the only option for the terminal preview since the
//! terminal itself is taken by the UI.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RotationPeriod {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl std::str::FromStr for RotationPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hourly" | "hour" => Ok(RotationPeriod::Hourly),
            "daily" | "day" => Ok(RotationPeriod::Daily),
            "never" | "none" => Ok(RotationPeriod::Never),
            _ => Err(format!(
                "Invalid rotation period '{s}'. Valid options: hourly, daily, never"
            )),
        }
    }
}

impl From<RotationPeriod> for Rotation {
    fn from(period: RotationPeriod) -> Self {
        match period {
            RotationPeriod::Hourly => Rotation::HOURLY,
            RotationPeriod::Daily => Rotation::DAILY,
            RotationPeriod::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_dir: String,
    pub log_prefix: String,
    pub rotation: RotationPeriod,
    /// Number of rotated files to keep, 0 keeps everything.
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: ".".to_string(),
            log_prefix: "climate-card".to_string(),
            rotation: RotationPeriod::Daily,
            max_log_files: 7,
        }
    }
}

/// Keeps the non-blocking writer alive; logs are flushed when dropped.
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

pub fn setup_console_logging() -> LogGuard {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    LogGuard { _guards: vec![] }
}

pub fn setup_file_logging(config: &LogConfig) -> std::io::Result<LogGuard> {
    let log_dir = Path::new(&config.log_dir);
    std::fs::create_dir_all(log_dir)?;

    if config.max_log_files > 0 {
        cleanup_old_logs(log_dir, &config.log_prefix, config.max_log_files)?;
    }

    let mut builder = RollingFileAppender::builder()
        .rotation(config.rotation.into())
        .filename_prefix(&config.log_prefix)
        .filename_suffix("log");
    if config.max_log_files > 0 {
        builder = builder.max_log_files(config.max_log_files);
    }
    let appender = builder.build(log_dir).map_err(std::io::Error::other)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = Layer::default()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(file_layer)
        .init();

    Ok(LogGuard {
        _guards: vec![guard],
    })
}

/// Removes all but the `max_files` most recently modified `{prefix}.*.log` files.
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_files: usize) -> std::io::Result<()> {
    let file_prefix = format!("{prefix}.");
    let mut log_files: Vec<_> = std::fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(&file_prefix) && name.ends_with(".log"))
        })
        .filter_map(|entry| {
            let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
            Some((entry.path(), modified))
        })
        .collect();

    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in log_files.into_iter().skip(max_files) {
        if let Err(e) = std::fs::remove_file(&path) {
            eprintln!("Warning: failed to remove old log file {:?}: {}", path, e);
        }
    }

    Ok(())
}
