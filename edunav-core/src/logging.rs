//! src/logging.rs
//! ============================================================================
//! # Logger: file-only tracing setup
//!
//! The terminal belongs to the TUI, so events go to a daily rolling file
//! (`<dir>/edunav.YYYY-MM-DD.log`) through a non-blocking writer. The format
//! is a compact `SEQ TIME LEVEL [file:line module] message` line.

use std::{
    path::Path,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::Metadata;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    prelude::*,
};

use crate::config::LogConfig;

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`; keep the guard alive until exit.
    pub fn init_tracing(config: &LogConfig, log_dir: &Path) -> Result<WorkerGuard> {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("cannot create log dir {}", log_dir.display()))?;

        SEQ.get_or_init(|| AtomicUsize::new(1));

        let file = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("edunav")
            .filename_suffix("log")
            .max_log_files(7)
            .build(log_dir)
            .context("Failed to create file appender")?;
        let (writer, guard) = tracing_appender::non_blocking(file);

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .context("tracing subscriber already installed")?;

        Ok(guard)
    }
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

/// Custom formatter: `[SEQ] TIME LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically-increasing sequence number
        let seq: usize = SEQ
            .get()
            .map_or(0, |seq| seq.fetch_add(1, Ordering::Relaxed));

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {} {:5} [{}:{} {}] ",
            Local::now().format("%H:%M:%S%.3f"),
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}
