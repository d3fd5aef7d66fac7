//! Logging setup for the replyfetch binary and its integration tests.
//!
//! [`init_logging`] installs one global `tracing` subscriber with a daily
//! rolling file sink and an optional stderr mirror, both in the same
//! [`LogFormat`]. `RUST_LOG` overrides [`LogConfig::default_filter`].
//!
//! With the default `info` filter every reply fetch leaves this trail:
//!
//! - `info` "Starting to fetch replies" with `post_id` and `max_replies`
//! - `info` "Response status" with the HTTP status
//! - `info` "Response content" with the raw body
//! - `info` the reply count, or "No replies found" when the body has no
//!   `tweets` array
//! - `error` "API request failed" with the full transport error, in place of
//!   the three lines above, when the request never produced a response
//!
//! `save_to_file` adds an `info` line with the written path. The HTTP client
//! logs request/response details at `debug` and never logs the API key.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "REPLYFETCH_LOG_DIR";
const DEFAULT_LOG_DIR: &str = "logs";

type Sink = Box<dyn Layer<Registry> + Send + Sync>;

/// Encoding shared by every sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base name of the log file.
    pub app_name: &'static str,
    /// Log directory; `REPLYFETCH_LOG_DIR`, then `./logs`, when unset.
    pub log_dir: Option<PathBuf>,
    /// Mirror events to stderr so the smoke test shows them inline.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "replyfetch",
            log_dir: None,
            emit_stderr: true,
            format: LogFormat::Text,
            default_filter: "info",
        }
    }
}

/// Install the global subscriber and return today's log file path.
///
/// Only the first call does any work; later calls return the same path.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(config.log_dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let file_name = format!("{}.log", config.app_name);
    let full_path = daily_log_path(&dir, &file_name);

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name));
    let _ = LOG_GUARD.set(guard);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    tracing_subscriber::registry()
        .with(sinks(&config, writer, std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_PATH.set(full_path.clone());
    Ok(full_path)
}

fn sinks<F, E>(config: &LogConfig, file: F, stderr: E) -> Vec<Sink>
where
    F: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    E: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let mut sinks = vec![sink(config.format, file, false)];
    if config.emit_stderr {
        sinks.push(sink(config.format, stderr, true));
    }
    sinks
}

fn sink<W>(format: LogFormat, writer: W, ansi: bool) -> Sink
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(ansi).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    }
}

// `rolling::daily` suffixes the file name with the current date.
fn daily_log_path(dir: &Path, file_name: &str) -> PathBuf {
    let today = Local::now().format("%Y-%m-%d");
    dir.join(format!("{file_name}.{today}"))
}

fn resolve_log_dir(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(LOG_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
}
