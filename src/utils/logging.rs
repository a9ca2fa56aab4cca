use std::fmt;
use std::fmt::Write;
use std::path::PathBuf;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::Layer as FmtLayer;
use tracing_subscriber::{prelude::*, registry::Registry, EnvFilter};

use super::app_config::config;
use super::error::Result;

pub mod prelude {
    pub use tracing::{debug, error, info, trace, warn};
    pub use tracing::{debug_span, error_span, info_span, trace_span, warn_span};
    pub use tracing::{event, field::Empty, instrument, span};
}

/// Holds the non-blocking writer guards. Must be kept alive in `main` for
/// log lines to be flushed.
pub struct GlobalLoggingContext {
    _worker_guards: Vec<WorkerGuard>,
}

/// Installs the global subscriber from the `[logging]` config section.
pub fn setup() -> Result<GlobalLoggingContext> {
    let cfg: LoggingConfig = config().get("logging").unwrap_or_default();

    let mut guards = Vec::new();

    // RUST_LOG wins over the configured directives
    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(&cfg.filter)
    };

    let (term_writer, term_guard) = non_blocking(std::io::stderr());
    guards.push(term_guard);
    let term_layer = FmtLayer::default()
        .with_target(false)
        .with_timer(ISOTimeFormat)
        .with_writer(term_writer);

    let registry = Registry::default().with(filter).with(term_layer);

    match &cfg.file {
        Some(file) => {
            let appender =
                tracing_appender::rolling::RollingFileAppender::new(Rotation::NEVER, &file.directory, &file.name);
            let (writer, guard) = non_blocking(appender);
            guards.push(guard);
            let file_layer = FmtLayer::default()
                .with_ansi(false)
                .with_target(false)
                .with_timer(ISOTimeFormat)
                .with_writer(writer);
            registry.with(file_layer).try_init()?;
        }
        None => registry.try_init()?,
    }

    Ok(GlobalLoggingContext { _worker_guards: guards })
}

fn non_blocking(writer: impl std::io::Write + Send + Sync + 'static) -> (NonBlocking, WorkerGuard) {
    tracing_appender::non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(writer)
}

struct ISOTimeFormat;

impl FormatTime for ISOTimeFormat {
    fn format_time(&self, w: &mut dyn Write) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct LoggingConfig {
    /// `tracing` filter directives, e.g. `"info,fabsim=debug"`.
    filter: String,
    /// Optional additional log file.
    file: Option<FileOutput>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            file: None,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct FileOutput {
    directory: PathBuf,
    name: PathBuf,
}
