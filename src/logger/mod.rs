//! Leveled, structured logging facade.
//!
//! A [`Logger`] is a cheap handle naming a component. Every handle shares one
//! process-wide [`Backend`] which is built on first use from the
//! configuration (see [`LoggerConfig::from_env`]). Records have the shape
//! `{component, code, msg, detail}`.
//!
//! ```rust,no_run
//! use utilkit::logger::{LogEvent, Logger};
//! use serde_json::json;
//!
//! let logger = Logger::new("billing").expect("valid LOG_LEVEL");
//! logger.info(&LogEvent::new("INVOICE_SENT", "invoice sent"), &[json!({"id": 42})]);
//! ```

pub mod backend;
pub mod config;
pub mod level;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use backend::{shared_backend, Backend, LogRecord, LogSink, MemorySink, TracingSink};
pub use config::{Auth, ConfigSource, ElasticConfig, EnvSource, LoggerConfig};
pub use level::{is_valid_log_level, LogLevel};

use crate::error::Result;

/// What happened: a stable code plus a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub code: String,
    pub msg: String,
}

impl LogEvent {
    pub fn new(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            msg: msg.into(),
        }
    }
}

/// Component-scoped handle on the shared backend
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    backend: Arc<Backend>,
}

impl Logger {
    /// Logger on the shared backend, configured from the environment on first use
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let backend = shared_backend(|| Ok(Backend::new(LoggerConfig::from_env()?)))?;
        Ok(Self::with_backend(name, backend))
    }

    /// Logger on the shared backend, built from `config` if nothing exists yet.
    ///
    /// When the backend was already built, `config` is ignored.
    pub fn with_config(name: impl Into<String>, config: LoggerConfig) -> Result<Self> {
        let backend = shared_backend(|| Ok(Backend::new(config)))?;
        Ok(Self::with_backend(name, backend))
    }

    /// Logger on an explicit backend, bypassing the shared one
    pub fn with_backend(name: impl Into<String>, backend: Arc<Backend>) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &Arc<Backend> {
        &self.backend
    }

    pub fn log(&self, level: LogLevel, event: &LogEvent, details: &[serde_json::Value]) {
        if !self.backend.enabled(level) {
            return;
        }
        let record = LogRecord {
            component: self.name.clone(),
            code: event.code.clone(),
            msg: event.msg.clone(),
            detail: details.to_vec(),
        };
        self.backend.dispatch(level, &record);
    }

    pub fn error(&self, event: &LogEvent, details: &[serde_json::Value]) {
        self.log(LogLevel::Error, event, details);
    }

    pub fn warn(&self, event: &LogEvent, details: &[serde_json::Value]) {
        self.log(LogLevel::Warn, event, details);
    }

    pub fn info(&self, event: &LogEvent, details: &[serde_json::Value]) {
        self.log(LogLevel::Info, event, details);
    }

    pub fn debug(&self, event: &LogEvent, details: &[serde_json::Value]) {
        self.log(LogLevel::Debug, event, details);
    }

    pub fn trace(&self, event: &LogEvent, details: &[serde_json::Value]) {
        self.log(LogLevel::Trace, event, details);
    }
}
