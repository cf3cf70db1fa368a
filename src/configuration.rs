use std::collections::HashSet;
use std::env;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::observer::{LogFacade, Logger, MetricName, MetricsSink};
use crate::redact::REDACTED;

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default Bot API host
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Environment variable holding the bot token
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
/// Environment variable overriding the request timeout in milliseconds
pub const ENV_TIMEOUT_MS: &str = "TELEGRAM_TIMEOUT_MS";
/// Environment variable overriding the API host
pub const ENV_API_BASE_URL: &str = "TELEGRAM_API_BASE_URL";
/// Environment variable with a comma separated metric allow-list
pub const ENV_ENABLED_METRICS: &str = "TELEGRAM_ENABLED_METRICS";

/// Configuration for a [`Client`](crate::Client)
#[derive(Clone)]
pub struct ClientConfig {
    /// Telegram Bot API token
    bot_token: String,
    /// Receiver of log events
    logger: Arc<dyn Logger>,
    /// Optional metrics sink
    metrics: Option<Arc<dyn MetricsSink>>,
    /// Metric names forwarded to the sink; `None` forwards all
    enabled_metrics: Option<HashSet<MetricName>>,
    /// Request timeout in milliseconds
    timeout_ms: u64,
    /// Scheme and host of the Bot API
    api_base_url: String,
}

impl ClientConfig {
    /// Create a configuration with default settings for the given bot token
    pub fn new<S: Into<String>>(bot_token: S) -> Self {
        ClientConfig {
            bot_token: bot_token.into(),
            logger: Arc::new(LogFacade),
            metrics: None,
            enabled_metrics: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Build a configuration from `TELEGRAM_*` environment variables
    pub fn from_env() -> Result<Self, Error> {
        let bot_token = env::var(ENV_BOT_TOKEN)
            .map_err(|_| Error::configuration(format!("{} is not set", ENV_BOT_TOKEN)))?;
        let mut config = ClientConfig::new(bot_token);

        if let Ok(timeout) = env::var(ENV_TIMEOUT_MS) {
            let timeout_ms = timeout.trim().parse::<u64>().map_err(|_| {
                Error::configuration(format!("Invalid {}: '{}'", ENV_TIMEOUT_MS, timeout))
            })?;
            config.set_timeout_ms(timeout_ms);
        }

        if let Ok(base_url) = env::var(ENV_API_BASE_URL) {
            config.set_api_base_url(base_url);
        }

        if let Ok(names) = env::var(ENV_ENABLED_METRICS) {
            config.set_enabled_metrics(parse_metric_names(&names)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the Telegram Bot API token
    pub fn set_bot_token<S: Into<String>>(&mut self, token: S) {
        self.bot_token = token.into();
    }

    /// Get the Telegram Bot API token
    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    /// Replace the logger
    pub fn set_logger<L: Logger + 'static>(&mut self, logger: L) {
        self.logger = Arc::new(logger);
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Set the metrics sink
    pub fn set_metrics<M: MetricsSink + 'static>(&mut self, metrics: M) {
        self.metrics = Some(Arc::new(metrics));
    }

    /// Set a metrics sink that is shared with other owners
    pub fn set_shared_metrics(&mut self, metrics: Arc<dyn MetricsSink>) {
        self.metrics = Some(metrics);
    }

    pub fn metrics(&self) -> Option<&Arc<dyn MetricsSink>> {
        self.metrics.as_ref()
    }

    /// Restrict which metrics reach the sink
    pub fn set_enabled_metrics<I: IntoIterator<Item = MetricName>>(&mut self, names: I) {
        self.enabled_metrics = Some(names.into_iter().collect());
    }

    pub fn enabled_metrics(&self) -> Option<&HashSet<MetricName>> {
        self.enabled_metrics.as_ref()
    }

    /// Set the request timeout in milliseconds
    pub fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Point the client at another Bot API server (self-hosted or test)
    pub fn set_api_base_url<S: AsRef<str>>(&mut self, base_url: S) {
        self.api_base_url = base_url.as_ref().trim_end_matches('/').to_string();
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Error> {
        if self.bot_token.trim().is_empty() {
            return Err(Error::configuration("Bot token not configured"));
        }

        if self.timeout_ms == 0 {
            return Err(Error::configuration("Timeout must be greater than zero"));
        }

        reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            Error::configuration(format!(
                "Invalid API base URL '{}': {}",
                self.api_base_url, e
            ))
        })?;

        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("bot_token", &REDACTED)
            .field("metrics", &self.metrics.is_some())
            .field("enabled_metrics", &self.enabled_metrics)
            .field("timeout_ms", &self.timeout_ms)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Parse a comma separated list such as `TelegramSuccess,TelegramFailure` or `*`
pub fn parse_metric_names(names: &str) -> Result<HashSet<MetricName>, Error> {
    names
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new("123:abc");

        assert_eq!(config.bot_token(), "123:abc");
        assert_eq!(config.timeout_ms(), DEFAULT_TIMEOUT_MS);
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert!(config.metrics().is_none());
        assert!(config.enabled_metrics().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_token_and_zero_timeout() {
        assert!(matches!(
            ClientConfig::new(" ").validate(),
            Err(Error::Configuration(_))
        ));

        let mut config = ClientConfig::new("123:abc");
        config.set_timeout_ms(0);
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn rejects_bad_base_url() {
        let mut config = ClientConfig::new("123:abc");
        config.set_api_base_url("not a url");
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let mut config = ClientConfig::new("123:abc");
        config.set_api_base_url("http://localhost:8081/");
        assert_eq!(config.api_base_url(), "http://localhost:8081");
    }

    #[test]
    fn debug_hides_token() {
        let config = ClientConfig::new("123456:SECRET");
        let printed = format!("{:?}", config);

        assert!(!printed.contains("SECRET"));
        assert!(printed.contains(REDACTED));
    }

    #[test]
    fn metric_list_parsing() {
        let names = parse_metric_names("TelegramSuccess, TelegramFailure,").unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&MetricName::Success));
        assert!(names.contains(&MetricName::Failure));

        assert!(parse_metric_names("TelegramSuccess,Bogus").is_err());
        assert!(parse_metric_names("").unwrap().is_empty());
    }
}
