/*!
 * telegram-sender - A thin async Rust client for sending Telegram messages via bots
 *
 * Build a [`SendMessageCommand`], hand it to [`Client::send`], get back the
 * sent message id or a classified [`Error`]. Every call is logged through a
 * pluggable [`Logger`] and reported to an optional [`MetricsSink`].
 *
 * ```no_run
 * use telegram_sender::{Client, ClientConfig, SendMessageCommand, SendMessageInput};
 *
 * # async fn run() -> Result<(), telegram_sender::Error> {
 * let client = Client::new(ClientConfig::new("123456:YOUR_BOT_TOKEN"))?;
 *
 * let command = SendMessageCommand::new(SendMessageInput::new("12345", "Deploy finished"));
 * match client.send(&command).await {
 *     Ok(sent) => println!("sent message {}", sent.message_id),
 *     Err(e) if e.retry_after().is_some() => println!("rate limited: {}", e),
 *     Err(e) => return Err(e),
 * }
 * # Ok(())
 * # }
 * ```
 */

pub mod client;
pub mod command;
pub mod configuration;
pub mod error;
pub mod observer;
pub mod redact;

// Re-export main components for easy access
pub use client::Client;
pub use command::{
    ApiResponse, ParseMode, SendMessageCommand, SendMessageInput, SendMessageOutput,
    SendMessagePayload,
};
pub use configuration::ClientConfig;
pub use error::{ApiError, Error, ResponseParameters, TransportError};
pub use observer::{
    is_metric_enabled, LogEvent, LogFacade, LogLevel, Logger, MetricName, MetricSample,
    MetricUnit, MetricsError, MetricsSink,
};
