// Logging Backend
// Record sinks and the process-wide backend instance

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::config::{ElasticConfig, LoggerConfig};
use super::level::LogLevel;
use crate::error::Result;

/// Structured record handed to a sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub component: String,
    pub code: String,
    pub msg: String,
    pub detail: Vec<serde_json::Value>,
}

/// Destination for log records.
///
/// Implementations ship records somewhere (a collector, a file, memory);
/// the facade only decides level and shape.
pub trait LogSink: Send + Sync {
    fn write(&self, level: LogLevel, record: &LogRecord);
}

/// Emits every record as a `tracing` event at the matching level
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    index: Option<String>,
}

impl TracingSink {
    pub fn new(elastic: Option<&ElasticConfig>) -> Self {
        Self {
            index: elastic.and_then(|e| e.index.clone()),
        }
    }
}

impl LogSink for TracingSink {
    fn write(&self, level: LogLevel, record: &LogRecord) {
        let detail = serde_json::Value::from(record.detail.clone());
        let index = self.index.as_deref().unwrap_or_default();

        macro_rules! emit {
            ($lvl:expr) => {
                tracing::event!(
                    target: "utilkit",
                    $lvl,
                    component = %record.component,
                    code = %record.code,
                    index = index,
                    detail = %detail,
                    "{}",
                    record.msg
                )
            };
        }

        match level {
            LogLevel::Error => emit!(tracing::Level::ERROR),
            LogLevel::Warn => emit!(tracing::Level::WARN),
            LogLevel::Info => emit!(tracing::Level::INFO),
            LogLevel::Debug => emit!(tracing::Level::DEBUG),
            LogLevel::Trace => emit!(tracing::Level::TRACE),
        }
    }
}

/// Keeps records in memory, in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(LogLevel, LogRecord)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far
    pub fn records(&self) -> Vec<(LogLevel, LogRecord)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for MemorySink {
    fn write(&self, level: LogLevel, record: &LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, record.clone()));
    }
}

/// A configured sink plus the level filter in front of it
pub struct Backend {
    config: LoggerConfig,
    sink: Arc<dyn LogSink>,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").field("config", &self.config).finish()
    }
}

impl Backend {
    /// Backend writing to `tracing`
    pub fn new(config: LoggerConfig) -> Self {
        let sink = Arc::new(TracingSink::new(config.elastic.as_ref()));
        Self::with_sink(config, sink)
    }

    pub fn with_sink(config: LoggerConfig, sink: Arc<dyn LogSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    /// Whether records at `level` pass the configured threshold
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.config.level
    }

    /// Hand a record to the sink. Callers filter with [`Backend::enabled`] first.
    pub(crate) fn dispatch(&self, level: LogLevel, record: &LogRecord) {
        self.sink.write(level, record);
    }
}

static SHARED: Mutex<Option<Arc<Backend>>> = Mutex::new(None);

/// The process-wide backend, built by `init` on first use.
///
/// At most one backend is ever constructed: the first successful call stores
/// it and every later call returns the same instance without running `init`.
/// If `init` fails the slot stays empty and the error is returned.
pub fn shared_backend<F>(init: F) -> Result<Arc<Backend>>
where
    F: FnOnce() -> Result<Backend>,
{
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(backend) = slot.as_ref() {
        return Ok(Arc::clone(backend));
    }

    let backend = Arc::new(init()?);
    *slot = Some(Arc::clone(&backend));
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(code: &str) -> LogRecord {
        LogRecord {
            component: "test".to_string(),
            code: code.to_string(),
            msg: "message".to_string(),
            detail: vec![json!({"key0": "val0"})],
        }
    }

    #[test]
    fn test_level_filter() {
        let backend = Backend::with_sink(LoggerConfig::new(LogLevel::Warn), Arc::new(MemorySink::new()));

        assert!(backend.enabled(LogLevel::Error));
        assert!(backend.enabled(LogLevel::Warn));
        assert!(!backend.enabled(LogLevel::Info));
        assert!(!backend.enabled(LogLevel::Trace));
    }

    #[test]
    fn test_dispatch_writes_to_sink() {
        let sink = Arc::new(MemorySink::new());
        let backend = Backend::with_sink(LoggerConfig::new(LogLevel::Warn), sink.clone());

        backend.dispatch(LogLevel::Error, &record("e"));
        backend.dispatch(LogLevel::Warn, &record("w"));

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, LogLevel::Error);
        assert_eq!(records[1].1.code, "w");
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(record("code")).unwrap();
        assert_eq!(
            json,
            json!({
                "component": "test",
                "code": "code",
                "msg": "message",
                "detail": [{"key0": "val0"}],
            })
        );
    }

    #[test]
    fn test_shared_backend_is_built_once() {
        let first = shared_backend(|| Ok(Backend::new(LoggerConfig::default()))).unwrap();
        let second = shared_backend(|| panic!("backend must not be rebuilt")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        let sink = TracingSink::default();
        for level in LogLevel::ALL {
            sink.write(level, &record("noop"));
        }
    }
}
