// Logger Configuration
// Level and log-destination settings, read from a named-value source

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::level::LogLevel;
use crate::error::{Error, Result};

pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const ELASTICSEARCH_NODE: &str = "ELASTICSEARCH_NODE";
pub const ELASTICSEARCH_USERNAME: &str = "ELASTICSEARCH_USERNAME";
pub const ELASTICSEARCH_PASSWORD: &str = "ELASTICSEARCH_PASSWORD";
pub const ELASTICSEARCH_FLUSH_INTERVAL: &str = "ELASTICSEARCH_FLUSH_INTERVAL";
pub const SERVER_NICKNAME: &str = "SERVER_NICKNAME";

/// Supplies named string values (environment, test maps, ...)
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Credentials for the log destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

/// Where and how records are shipped. Durations are milliseconds on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElasticConfig {
    /// Index the records are written to
    pub index: Option<String>,
    /// Destination node URL
    pub node: Option<String>,
    pub auth: Option<Auth>,
    #[serde(default, with = "millis")]
    pub flush_interval: Option<Duration>,
    /// Bytes buffered before a flush
    #[serde(rename = "flush-bytes")]
    pub flush_bytes: Option<u64>,
    pub max_retries: Option<u32>,
    #[serde(default, with = "millis")]
    pub request_timeout: Option<Duration>,
    /// Look for other nodes when the current one fails
    pub sniff_on_connection_fault: Option<bool>,
}

mod millis {
    use std::time::Duration;

    use serde::{ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => {
                let millis = u64::try_from(d.as_millis()).map_err(<S::Error as ser::Error>::custom)?;
                serializer.serialize_u64(millis)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

/// Everything the logging backend needs at construction time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub elastic: Option<ElasticConfig>,
}

impl LoggerConfig {
    pub fn new(level: LogLevel) -> Self {
        Self { level, elastic: None }
    }

    pub fn with_elastic(mut self, elastic: ElasticConfig) -> Self {
        self.elastic = Some(elastic);
        self
    }

    /// Read the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_source(&EnvSource)
    }

    /// Read configuration from `source`.
    ///
    /// `LOG_LEVEL` defaults to `info` when absent and must name a valid level
    /// when present. The destination section is only filled in when
    /// `ELASTICSEARCH_NODE` is set.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self> {
        let level = match source.get(LOG_LEVEL) {
            Some(name) => name.parse()?,
            None => LogLevel::default(),
        };

        let elastic = match source.get(ELASTICSEARCH_NODE) {
            Some(node) => Some(elastic_from_source(source, node)?),
            None => None,
        };

        Ok(Self { level, elastic })
    }
}

fn elastic_from_source(source: &dyn ConfigSource, node: String) -> Result<ElasticConfig> {
    let auth = match (source.get(ELASTICSEARCH_USERNAME), source.get(ELASTICSEARCH_PASSWORD)) {
        (Some(username), Some(password)) => Some(Auth { username, password }),
        _ => None,
    };

    let flush_interval = source
        .get(ELASTICSEARCH_FLUSH_INTERVAL)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| Error::InvalidConfig {
                    key: ELASTICSEARCH_FLUSH_INTERVAL.to_string(),
                    value: raw.clone(),
                })
        })
        .transpose()?;

    Ok(ElasticConfig {
        index: source.get(SERVER_NICKNAME),
        node: Some(node),
        auth,
        flush_interval,
        ..ElasticConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::from_source(&source(&[])).unwrap();
        assert_eq!(config, LoggerConfig::new(LogLevel::Info));
    }

    #[test]
    fn test_level_from_source() {
        let config = LoggerConfig::from_source(&source(&[(LOG_LEVEL, "debug")])).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert!(config.elastic.is_none());
    }

    #[test]
    fn test_invalid_level() {
        let result = LoggerConfig::from_source(&source(&[(LOG_LEVEL, "verbose")]));
        assert_eq!(result, Err(Error::InvalidLogLevel("verbose".to_string())));
    }

    #[test]
    fn test_elastic_section() {
        let config = LoggerConfig::from_source(&source(&[
            (ELASTICSEARCH_NODE, "https://logs.internal:9200"),
            (ELASTICSEARCH_USERNAME, "shipper"),
            (ELASTICSEARCH_PASSWORD, "hunter2"),
            (ELASTICSEARCH_FLUSH_INTERVAL, "2000"),
            (SERVER_NICKNAME, "api-eu"),
        ]))
        .unwrap();

        let elastic = config.elastic.unwrap();
        assert_eq!(elastic.node.as_deref(), Some("https://logs.internal:9200"));
        assert_eq!(elastic.index.as_deref(), Some("api-eu"));
        assert_eq!(elastic.auth.unwrap().username, "shipper");
        assert_eq!(elastic.flush_interval, Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_partial_credentials_are_ignored() {
        let config = LoggerConfig::from_source(&source(&[
            (ELASTICSEARCH_NODE, "http://localhost:9200"),
            (ELASTICSEARCH_USERNAME, "shipper"),
        ]))
        .unwrap();
        assert!(config.elastic.unwrap().auth.is_none());
    }

    #[test]
    fn test_invalid_flush_interval() {
        let result = LoggerConfig::from_source(&source(&[
            (ELASTICSEARCH_NODE, "http://localhost:9200"),
            (ELASTICSEARCH_FLUSH_INTERVAL, "soon"),
        ]));
        assert_eq!(
            result,
            Err(Error::InvalidConfig {
                key: ELASTICSEARCH_FLUSH_INTERVAL.to_string(),
                value: "soon".to_string(),
            })
        );
    }

    #[test]
    fn test_elastic_config_json() {
        let json = r#"{
            "node": "http://localhost:9200",
            "flushInterval": 500,
            "flush-bytes": 4096,
            "maxRetries": 3,
            "sniffOnConnectionFault": true
        }"#;
        let elastic: ElasticConfig = serde_json::from_str(json).unwrap();
        assert_eq!(elastic.flush_interval, Some(Duration::from_millis(500)));
        assert_eq!(elastic.flush_bytes, Some(4096));
        assert_eq!(elastic.max_retries, Some(3));
        assert_eq!(elastic.request_timeout, None);
        assert_eq!(elastic.sniff_on_connection_fault, Some(true));
    }

    #[test]
    fn test_durations_serialize_as_millis() {
        let elastic = ElasticConfig {
            flush_interval: Some(Duration::from_secs(2)),
            ..ElasticConfig::default()
        };
        let json = serde_json::to_value(&elastic).unwrap();
        assert_eq!(json["flushInterval"], 2000);
        assert!(json["requestTimeout"].is_null());
    }

    #[test]
    fn test_oversized_duration_fails_to_serialize() {
        let elastic = ElasticConfig {
            request_timeout: Some(Duration::MAX),
            ..ElasticConfig::default()
        };
        assert!(serde_json::to_string(&elastic).is_err());
    }
}
