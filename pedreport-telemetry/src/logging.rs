//! ## pedreport-telemetry::logging
//! **Structured logging with a redirectable sink**
//!
//! Output starts on stderr. Once the run configuration is known, the caller
//! redirects it to the error log file and applies the configured verbosity
//! through the handle returned by [`EventLogger::init`].

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Registry};

/// Maps a verbosity from 0 (errors only) to 4 (trace) onto a level filter.
pub fn level_for(verbosity: i32) -> LevelFilter {
    match verbosity {
        i32::MIN..=0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[derive(Debug)]
enum SinkTarget {
    Stderr,
    File(File),
}

/// Shared log destination, usable as a `tracing_subscriber` writer.
#[derive(Debug, Clone)]
pub struct LogSink {
    target: Arc<Mutex<SinkTarget>>,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl LogSink {
    pub fn stderr() -> Self {
        Self {
            target: Arc::new(Mutex::new(SinkTarget::Stderr)),
        }
    }

    /// Appends all further output to `path`, creating the file if needed.
    pub fn redirect_to_file(&self, path: &Path) -> io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        *self.target.lock() = SinkTarget::File(file);
        Ok(())
    }

    pub fn is_file(&self) -> bool {
        matches!(*self.target.lock(), SinkTarget::File(_))
    }
}

pub struct SinkWriter<'a> {
    guard: MutexGuard<'a, SinkTarget>,
}

impl Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.guard {
            SinkTarget::Stderr => io::stderr().write(buf),
            SinkTarget::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.guard {
            SinkTarget::Stderr => io::stderr().flush(),
            SinkTarget::File(file) => file.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = SinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter {
            guard: self.target.lock(),
        }
    }
}

/// Handle to the installed subscriber.
#[derive(Clone)]
pub struct EventLogger {
    sink: LogSink,
    level: reload::Handle<LevelFilter, Registry>,
}

impl EventLogger {
    /// Installs the global subscriber at INFO on stderr.
    ///
    /// Returns `None` when a global subscriber is already set.
    pub fn init() -> Option<Self> {
        let sink = LogSink::stderr();
        let (filter, level) = reload::Layer::new(LevelFilter::INFO);
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(sink.clone()),
            )
            .try_init()
            .ok()?;
        Some(Self { sink, level })
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }

    /// Applies the configured verbosity and, when given, the error log file.
    pub fn configure(&self, verbosity: i32, log_file: Option<&Path>) -> io::Result<()> {
        let filter = level_for(verbosity);
        if let Err(err) = self.level.reload(filter) {
            tracing::warn!(error = %err, "could not change log level");
        }
        if let Some(path) = log_file {
            tracing::info!(log_file = %path.display(), "redirecting log");
            self.sink.redirect_to_file(path)?;
        }
        Ok(())
    }
}
