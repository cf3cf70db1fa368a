use std::sync::Arc;

use async_trait::async_trait;
use telegram_sender::{
    ClientConfig, MetricName, MetricSample, MetricsError, MetricsSink, SendMessageCommand,
    SendMessageInput,
};

struct NullSink;

#[async_trait]
impl MetricsSink for NullSink {
    async fn put_metric(&self, _sample: MetricSample) -> Result<(), MetricsError> {
        Ok(())
    }
}

#[test]
fn test_configuration() {
    let mut config = ClientConfig::new("initial_token");
    config.set_bot_token("test_token");
    config.set_timeout_ms(1500);
    config.set_api_base_url("http://localhost:8081");
    config.set_enabled_metrics([MetricName::Success, MetricName::Failure]);
    config.set_logger(|_: &telegram_sender::LogEvent| {});

    assert_eq!(config.bot_token(), "test_token");
    assert_eq!(config.timeout_ms(), 1500);
    assert_eq!(config.api_base_url(), "http://localhost:8081");

    let enabled = config.enabled_metrics().unwrap();
    assert!(enabled.contains(&MetricName::Success));
    assert!(!enabled.contains(&MetricName::Duration));
    assert!(config.validate().is_ok());

    assert!(config.metrics().is_none());
    let shared: Arc<dyn MetricsSink> = Arc::new(NullSink);
    config.set_shared_metrics(Arc::clone(&shared));
    assert!(Arc::ptr_eq(config.metrics().unwrap(), &shared));

    config.set_bot_token("");
    assert!(config.validate().is_err());
}

#[test]
fn test_command_keeps_input_verbatim() {
    let input = SendMessageInput::new("12345", "Hello from telegram-sender!");
    let command = SendMessageCommand::from(input.clone());

    assert_eq!(command.input(), &input);
    assert!(command.parse_mode().is_none());

    let body = serde_json::to_value(command.payload()).unwrap();
    assert_eq!(body["chat_id"], "12345");
    assert_eq!(body["text"], "Hello from telegram-sender!");
    assert!(body.get("parse_mode").is_none());
}

#[test]
fn test_redaction_helper() {
    let err = telegram_sender::Error::unexpected(
        "failed at https://api.telegram.org/bot42:SECRET/sendMessage",
    );
    // Unexpected errors keep their text; redaction applies when logged
    assert!(err.to_string().contains("Unexpected error"));

    let redacted = telegram_sender::redact::redact_credentials(&err.to_string());
    assert!(!redacted.contains("SECRET"));
}
