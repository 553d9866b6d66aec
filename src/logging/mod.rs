// Logging - in-memory capture for the TUI, optional file output
//
// While the TUI owns the terminal, writing log lines to stdout would tear
// up the alternate screen. A custom tracing layer captures events into a
// bounded ring buffer instead; the status line shows the most recent entry.
// Headless mode logs to stdout normally. File logging (daily rotation,
// non-blocking writer) can be layered on in either mode.

use crate::config::Config;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{Level, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Ring buffer capacity; older entries fall off the front
const MAX_LOG_ENTRIES: usize = 500;

/// One captured log event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<&Level> for LogLevel {
    fn from(level: &Level) -> Self {
        match *level {
            Level::ERROR => LogLevel::Error,
            Level::WARN => LogLevel::Warn,
            Level::INFO => LogLevel::Info,
            Level::DEBUG => LogLevel::Debug,
            Level::TRACE => LogLevel::Trace,
        }
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// Shared bounded buffer of captured entries.
#[derive(Clone, Default)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, entry: LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Most recent entry, for the status line.
    pub fn latest(&self) -> Option<LogEntry> {
        self.entries.lock().unwrap().back().cloned()
    }
}

/// Tracing layer that feeds the ring buffer.
pub struct TuiLogLayer {
    buffer: LogBuffer,
}

impl TuiLogLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for TuiLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));

        self.buffer.add(LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::from(metadata.level()),
            message,
        });
    }

    fn enabled(&self, _metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        // Level filtering happens in the subscriber's EnvFilter
        true
    }
}

/// Pulls the `message` field out of a tracing event.
struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
            // Strip the quotes Debug wraps plain strings in
            if self.0.starts_with('"') && self.0.ends_with('"') {
                *self.0 = self.0[1..self.0.len() - 1].to_string();
            }
        }
    }
}

/// Initialize the global subscriber.
///
/// TUI mode captures to `buffer`; headless mode prints to stdout. When file
/// logging is enabled, a non-blocking daily-rotated file layer is added in
/// both modes. The returned guard must stay alive until exit so buffered
/// file writes flush.
///
/// Filter precedence: `RUST_LOG` env var, then the configured level.
pub fn init(config: &Config, buffer: &LogBuffer) -> Option<WorkerGuard> {
    let default_filter = format!("rpchat={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // Non-blocking writer for the optional file layer; the layer itself is
    // built per branch below so its subscriber type can differ
    let (writer, guard) = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let appender =
                    tracing_appender::rolling::daily(&config.logging.file_dir, "rpchat.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (Some(writer), Some(guard))
            }
            Err(e) => {
                eprintln!(
                    "warning: could not create log directory {}: {e}",
                    config.logging.file_dir.display()
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    if config.enable_tui {
        let file_layer = writer.map(|w| {
            tracing_subscriber::fmt::layer()
                .with_writer(w)
                .with_ansi(false)
        });
        tracing_subscriber::registry()
            .with(filter)
            .with(TuiLogLayer::new(buffer.clone()))
            .with(file_layer)
            .init();
    } else {
        let file_layer = writer.map(|w| {
            tracing_subscriber::fmt::layer()
                .with_writer(w)
                .with_ansi(false)
        });
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .with(file_layer)
            .init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_keeps_the_newest_entries() {
        let buffer = LogBuffer::new();
        for i in 0..MAX_LOG_ENTRIES + 10 {
            buffer.add(LogEntry {
                timestamp: Utc::now(),
                level: LogLevel::Info,
                message: format!("entry {i}"),
            });
        }

        let latest = buffer.latest().unwrap();
        assert_eq!(latest.message, format!("entry {}", MAX_LOG_ENTRIES + 9));
    }

    #[test]
    fn latest_on_empty_buffer_is_none() {
        assert!(LogBuffer::new().latest().is_none());
    }
}
