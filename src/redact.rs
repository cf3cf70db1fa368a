use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement used wherever a credential would appear
pub const REDACTED: &str = "<redacted>";

/// Matches the credential segment of a Bot API path, e.g. `/bot123:ABC/sendMessage`
static BOT_PATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/bot[^/\s?#)]+").expect("bot path regex is valid")
});

/// Strip bot credentials from text that may contain request URLs.
///
/// reqwest embeds the full request URL in its error messages, and the Bot API
/// carries the credential in the path, so anything derived from a transport
/// error goes through here before it is logged or displayed.
pub fn redact_credentials(text: &str) -> String {
    BOT_PATH_REGEX
        .replace_all(text, format!("/bot{}", REDACTED).as_str())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_credential_in_url() {
        let text = "error sending request for url (https://api.telegram.org/bot123456:AAE-x_y/sendMessage)";
        let redacted = redact_credentials(text);

        assert!(!redacted.contains("123456:AAE-x_y"));
        assert_eq!(
            redacted,
            "error sending request for url (https://api.telegram.org/bot<redacted>/sendMessage)"
        );
    }

    #[test]
    fn redacts_credential_at_end_of_text() {
        let redacted = redact_credentials("http://127.0.0.1:1234/botsecret");
        assert_eq!(redacted, "http://127.0.0.1:1234/bot<redacted>");
    }

    #[test]
    fn leaves_other_text_alone() {
        let text = "operation timed out";
        assert_eq!(redact_credentials(text), text);
    }
}
