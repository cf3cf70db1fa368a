use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client as ReqwestClient, StatusCode};

use crate::command::{ApiResponse, SendMessageCommand, SendMessageInput, SendMessageOutput};
use crate::configuration::ClientConfig;
use crate::error::{ApiError, Error};
use crate::observer::{
    is_metric_enabled, LogEvent, LogLevel, Logger, MetricName, MetricSample, MetricsSink,
};
use crate::redact::redact_credentials;

/// Async client for the Bot API `sendMessage` method.
///
/// Holds only read-only configuration, so one instance can be cloned and
/// shared between tasks freely. Every call performs exactly one HTTP request;
/// nothing is retried.
#[derive(Clone)]
pub struct Client {
    client: ReqwestClient,
    /// Full `sendMessage` URL; contains the bot token
    send_message_url: String,
    logger: Arc<dyn Logger>,
    metrics: Option<Arc<dyn MetricsSink>>,
    enabled_metrics: Option<HashSet<MetricName>>,
}

impl Client {
    /// Create a new Telegram client
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        config.validate()?;

        let client = ReqwestClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms()))
            .build()
            .map_err(|e| {
                Error::configuration(format!(
                    "Failed to build HTTP client: {}",
                    redact_credentials(&e.to_string())
                ))
            })?;

        let send_message_url = format!(
            "{}/bot{}/sendMessage",
            config.api_base_url(),
            config.bot_token()
        );

        Ok(Client {
            client,
            send_message_url,
            logger: Arc::clone(config.logger()),
            metrics: config.metrics().cloned(),
            enabled_metrics: config.enabled_metrics().cloned(),
        })
    }

    /// Create a client configured from `TELEGRAM_*` environment variables
    pub fn from_env() -> Result<Self, Error> {
        Client::new(ClientConfig::from_env()?)
    }

    /// Send a plain text message
    pub async fn send_message<C, T>(&self, chat_id: C, text: T) -> Result<SendMessageOutput, Error>
    where
        C: Into<String>,
        T: Into<String>,
    {
        let command = SendMessageCommand::new(SendMessageInput::new(chat_id, text));
        self.send(&command).await
    }

    /// Send a message described by `command`.
    ///
    /// Logs and records metrics before returning, whatever the outcome.
    pub async fn send(&self, command: &SendMessageCommand) -> Result<SendMessageOutput, Error> {
        let start = Instant::now();

        self.logger.log(&start_event(command.input()));

        let mut status = None;
        match self.execute(command, &mut status).await {
            Ok(output) => {
                let duration_ms = elapsed_ms(start);

                self.logger.log(
                    &LogEvent::new(LogLevel::Info, "Telegram message sent successfully")
                        .with("message_id", output.message_id)
                        .with("duration_ms", duration_ms),
                );

                self.put_metric(MetricSample::count(MetricName::Success)).await;
                self.put_metric(MetricSample::milliseconds(
                    MetricName::Duration,
                    duration_ms as f64,
                ))
                .await;

                Ok(output)
            }
            Err(error) => {
                let duration_ms = elapsed_ms(start);

                self.logger.log(&failure_event(&error, status, duration_ms));
                self.put_metric(MetricSample::count(MetricName::Failure)).await;

                Err(error)
            }
        }
    }

    /// Perform the request and classify the response
    async fn execute(
        &self,
        command: &SendMessageCommand,
        status: &mut Option<StatusCode>,
    ) -> Result<SendMessageOutput, Error> {
        let response = self
            .client
            .post(&self.send_message_url)
            .json(&command.payload())
            .send()
            .await?;

        // Failed calls come back as 4xx with a regular JSON envelope,
        // so the body is parsed regardless of the status code
        *status = Some(response.status());
        let body: ApiResponse<SendMessageOutput> = response.json().await?;

        if !body.ok {
            let description = body
                .description
                .unwrap_or_else(|| "Unknown Telegram API error".to_string());
            return Err(ApiError::new(description, body.error_code, body.parameters).into());
        }

        body.result
            .ok_or_else(|| Error::unexpected("Telegram API reported success without a result"))
    }

    /// Forward a sample to the sink if one is configured and the allow-list permits it.
    ///
    /// Sink failures are logged and swallowed; they never change the outcome of `send`.
    async fn put_metric(&self, sample: MetricSample) {
        let metrics = match &self.metrics {
            Some(metrics) => metrics,
            None => return,
        };

        if !is_metric_enabled(sample.name, self.enabled_metrics.as_ref()) {
            return;
        }

        let name = sample.name;
        if let Err(e) = metrics.put_metric(sample).await {
            self.logger.log(
                &LogEvent::new(LogLevel::Warn, "Failed to record Telegram metric")
                    .with("metric", name.as_str())
                    .with("error", redact_credentials(&e.to_string())),
            );
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("send_message_url", &redact_credentials(&self.send_message_url))
            .field("metrics", &self.metrics.is_some())
            .field("enabled_metrics", &self.enabled_metrics)
            .finish_non_exhaustive()
    }
}

/// Text length only; the body itself never reaches the logs.
///
/// Length is in UTF-16 code units, the unit of the Bot API's message limit.
fn start_event(input: &SendMessageInput) -> LogEvent {
    LogEvent::new(LogLevel::Info, "Sending Telegram message")
        .with("chat_id", input.chat_id.as_str())
        .with("text_length", input.text.encode_utf16().count())
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Error-level event describing a failed send
fn failure_event(error: &Error, status: Option<StatusCode>, duration_ms: u64) -> LogEvent {
    match error {
        Error::Api(api) => LogEvent::new(LogLevel::Error, "Telegram API error")
            .with("error_code", api.error_code)
            .with("retry_after", api.retry_after)
            .with("migrate_to_chat_id", api.migrate_to_chat_id)
            .with("duration_ms", duration_ms),
        Error::Http(e) => LogEvent::new(LogLevel::Error, "Network error sending Telegram message")
            .with("status", e.status().or(status).map(|s| s.as_u16()))
            .with("code", transport_error_kind(e.inner()))
            .with("error", e.to_string())
            .with("duration_ms", duration_ms),
        other => LogEvent::new(
            LogLevel::Error,
            "Unexpected error sending Telegram message",
        )
        .with("error", redact_credentials(&other.to_string()))
        .with("duration_ms", duration_ms),
    }
}

/// Short machine-readable label for a reqwest failure
fn transport_error_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_decode() {
        "decode"
    } else if e.is_body() {
        "body"
    } else if e.is_redirect() {
        "redirect"
    } else if e.is_status() {
        "status"
    } else if e.is_builder() {
        "builder"
    } else if e.is_request() {
        "request"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redact::REDACTED;

    #[test]
    fn debug_hides_token() {
        let client = Client::new(ClientConfig::new("123456:TOPSECRET")).unwrap();
        let printed = format!("{:?}", client);

        assert!(!printed.contains("TOPSECRET"));
        assert!(printed.contains(REDACTED));
        assert!(printed.contains("sendMessage"));
    }

    #[test]
    fn url_embeds_token() {
        let mut config = ClientConfig::new("123:abc");
        config.set_api_base_url("http://localhost:8081/");
        let client = Client::new(config).unwrap();

        assert_eq!(client.send_message_url, "http://localhost:8081/bot123:abc/sendMessage");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = Client::new(ClientConfig::new(""));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn start_event_counts_utf16_units() {
        let event = start_event(&SendMessageInput::new("1", "secret 👍"));

        assert_eq!(event.meta["chat_id"], "1");
        // The emoji is a surrogate pair
        assert_eq!(event.meta["text_length"], 9);
        assert!(!serde_json::to_string(&event).unwrap().contains("secret"));
    }

    #[test]
    fn api_failure_event_carries_parameters() {
        let error: Error = ApiError::new("Bad Request", Some(400), None).into();
        let event = failure_event(&error, Some(StatusCode::BAD_REQUEST), 7);

        assert_eq!(event.level, LogLevel::Error);
        assert_eq!(event.meta["error_code"], 400);
        assert!(event.meta["retry_after"].is_null());
        assert_eq!(event.meta["duration_ms"], 7);
    }

    #[test]
    fn unexpected_failure_event() {
        let error = Error::unexpected("no result");
        let event = failure_event(&error, None, 3);

        assert_eq!(event.message, "Unexpected error sending Telegram message");
        assert_eq!(event.meta["error"], "Unexpected error: no result");
    }
}
