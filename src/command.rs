use serde::{Deserialize, Serialize};

/// Input for a `sendMessage` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageInput {
    /// Target chat identifier (numeric id or `@channelusername`)
    pub chat_id: String,
    /// Message body
    pub text: String,
}

impl SendMessageInput {
    pub fn new<C: Into<String>, T: Into<String>>(chat_id: C, text: T) -> Self {
        SendMessageInput {
            chat_id: chat_id.into(),
            text: text.into(),
        }
    }
}

/// The part of a sent `Message` this client hands back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SendMessageOutput {
    /// Identifier of the sent message inside its chat
    pub message_id: i64,
    /// Unix time the message was sent
    pub date: i64,
}

/// Envelope shared by every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<crate::error::ResponseParameters>,
}

/// Formatting mode forwarded to the API as `parse_mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    MarkdownV2,
}

/// Wire body of a `sendMessage` request
#[derive(Debug, Serialize)]
pub struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

/// An immutable "send message" request, built once and handed to
/// [`Client::send`](crate::Client::send).
///
/// The input is stored verbatim. Empty chat ids or texts are not rejected
/// here; the API decides what it accepts.
///
/// # Examples
///
/// ```
/// use telegram_sender::{SendMessageCommand, SendMessageInput};
///
/// let command = SendMessageCommand::markdown(SendMessageInput::new("12345", "*hi*"));
/// let body = serde_json::to_value(command.payload()).unwrap();
/// assert_eq!(body["parse_mode"], "MarkdownV2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    input: SendMessageInput,
    parse_mode: Option<ParseMode>,
}

impl SendMessageCommand {
    /// Plain text message
    pub fn new(input: SendMessageInput) -> Self {
        SendMessageCommand {
            input,
            parse_mode: None,
        }
    }

    /// Message sent with `parse_mode: "MarkdownV2"`
    pub fn markdown(input: SendMessageInput) -> Self {
        SendMessageCommand {
            input,
            parse_mode: Some(ParseMode::MarkdownV2),
        }
    }

    pub fn input(&self) -> &SendMessageInput {
        &self.input
    }

    pub fn parse_mode(&self) -> Option<ParseMode> {
        self.parse_mode
    }

    /// Canonical JSON body for this command
    pub fn payload(&self) -> SendMessagePayload<'_> {
        SendMessagePayload {
            chat_id: &self.input.chat_id,
            text: &self.input.text,
            parse_mode: self.parse_mode,
        }
    }
}

impl From<SendMessageInput> for SendMessageCommand {
    fn from(input: SendMessageInput) -> Self {
        SendMessageCommand::new(input)
    }
}
