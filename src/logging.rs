//! Tracing subscriber setup
//!
//! Everything at the `RUST_LOG` level (default `info`) goes to the log file in
//! the application directory. Stderr only shows warnings unless verbose, and
//! is the only output when the log file cannot be opened.

use std::path::Path;

use anyhow::Context;
use tracing::{Subscriber, warn};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered log lines are flushed.
///
/// Returns `None` when logging fell back to stderr only.
pub fn init_logging(log_path: &Path, json: bool, verbose: bool) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match open_log_file(log_path) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            build_subscriber(Some(writer), std::io::stderr, json, verbose, env_filter)
                .try_init()
                .ok();
            Some(guard)
        }
        Err(e) => {
            build_subscriber(None::<NonBlocking>, std::io::stderr, json, verbose, env_filter)
                .try_init()
                .ok();
            warn!("Log file disabled, logging to stderr only: {:#}", e);
            None
        }
    }
}

fn open_log_file(log_path: &Path) -> anyhow::Result<RollingFileAppender> {
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let log_file = log_path
        .file_name()
        .and_then(|name| name.to_str())
        .context("log path has no file name")?;

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {:?}", log_dir))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(log_file)
        .build(log_dir)
        .with_context(|| format!("failed to open log file {:?}", log_path))
}

fn stderr_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// `EnvFilter` only applies to the file layer, so `-v` shows debug output
/// on stderr without `RUST_LOG`.
fn build_subscriber<F, E>(
    file_writer: Option<F>,
    stderr_writer: E,
    json: bool,
    verbose: bool,
    env_filter: EnvFilter,
) -> impl Subscriber + Send + Sync + 'static
where
    F: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    E: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let file_layer = file_writer.map(|writer| {
        if json {
            fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(writer)
                .with_filter(env_filter)
                .boxed()
        } else {
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(env_filter)
                .boxed()
        }
    });

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(stderr_writer)
        .with_filter(stderr_level(verbose));

    tracing_subscriber::registry().with(file_layer).with(stderr_layer)
}
