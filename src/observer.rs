//! Logging and metrics hooks invoked by [`Client::send`](crate::Client::send).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;

/// Severity of a [`LogEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

/// One structured log record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl LogEvent {
    pub fn new<S: Into<String>>(level: LogLevel, message: S) -> Self {
        LogEvent {
            level,
            message: message.into(),
            meta: Map::new(),
        }
    }

    /// Attach a metadata field; `None` values are kept as JSON null
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

/// Receiver of the client's log events
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

impl<F> Logger for F
where
    F: Fn(&LogEvent) + Send + Sync,
{
    fn log(&self, event: &LogEvent) {
        self(event)
    }
}

/// Default logger: forwards events to the `log` facade.
///
/// Prints nothing unless the application installs a `log` backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

pub(crate) const LOG_TARGET: &str = "telegram_sender";

impl Logger for LogFacade {
    fn log(&self, event: &LogEvent) {
        let level = log::Level::from(event.level);
        if event.meta.is_empty() {
            log::log!(target: LOG_TARGET, level, "{}", event.message);
        } else {
            log::log!(
                target: LOG_TARGET,
                level,
                "{} {}",
                event.message,
                Value::Object(event.meta.clone())
            );
        }
    }
}

/// Names of the metrics the client emits, plus the allow-list wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetricName {
    #[serde(rename = "TelegramSuccess")]
    Success,
    #[serde(rename = "TelegramFailure")]
    Failure,
    #[serde(rename = "TelegramDuration")]
    Duration,
    /// Wildcard; enables every metric when present in an allow-list
    #[serde(rename = "*")]
    All,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::Success => "TelegramSuccess",
            MetricName::Failure => "TelegramFailure",
            MetricName::Duration => "TelegramDuration",
            MetricName::All => "*",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "TelegramSuccess" => Ok(MetricName::Success),
            "TelegramFailure" => Ok(MetricName::Failure),
            "TelegramDuration" => Ok(MetricName::Duration),
            "*" => Ok(MetricName::All),
            other => Err(Error::configuration(format!(
                "Unknown metric name: '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricUnit {
    Count,
    Seconds,
    Milliseconds,
}

/// A single named observation destined for a [`MetricsSink`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub name: MetricName,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<MetricUnit>,
}

impl MetricSample {
    pub fn count(name: MetricName) -> Self {
        MetricSample {
            name,
            value: 1.0,
            unit: None,
        }
    }

    pub fn milliseconds(name: MetricName, value: f64) -> Self {
        MetricSample {
            name,
            value,
            unit: Some(MetricUnit::Milliseconds),
        }
    }
}

/// Failure reported by a metrics sink
pub type MetricsError = Box<dyn std::error::Error + Send + Sync>;

/// Destination for metric samples (CloudWatch, StatsD, Prometheus push, ...)
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn put_metric(&self, sample: MetricSample) -> Result<(), MetricsError>;
}

/// Whether a sample named `name` passes the caller's allow-list.
///
/// No allow-list means everything is enabled.
pub fn is_metric_enabled(name: MetricName, allow_list: Option<&HashSet<MetricName>>) -> bool {
    match allow_list {
        None => true,
        Some(list) => list.contains(&MetricName::All) || list.contains(&name),
    }
}
