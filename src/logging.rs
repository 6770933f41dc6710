//! Tracing setup
//!
//! Stdout always; a daily-rolling `quiz.log` under the configured directory when
//! file logging is on. Installing twice keeps the first subscriber.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "quiz.log";

/// Flushes the file writer when dropped; hold it for the life of the process
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directive, e.g. `info` or `quizmaxx_core=debug`
    pub level: String,
    /// Directory for rolling log files; `None` logs to stdout only
    pub file_dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn stdout(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            file_dir: None,
        }
    }
}

pub fn init_tracing(settings: &LogSettings) -> Option<FileLogGuard> {
    let (file_layer, guard) = match settings.file_dir.as_deref().map(file_writer) {
        Some(Ok((writer, guard))) => {
            let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);
            (Some(layer), Some(FileLogGuard { _guard: guard }))
        }
        Some(Err(err)) => {
            eprintln!("file logging disabled: {err}");
            (None, None)
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter(&settings.level))
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init();

    guard
}

fn file_writer(dir: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}
