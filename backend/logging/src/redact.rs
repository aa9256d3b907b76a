//! Log Redaction
//!
//! Scrubs bot tokens and authorization headers from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

/// Discord bot token: base64 user id, timestamp, HMAC.
static BOT_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[MNO][A-Za-z\d_-]{23,27}\.[A-Za-z\d_-]{6}\.[A-Za-z\d_-]{27,40}").unwrap()
});
static AUTH_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(Bot|Bearer)\s+[A-Za-z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = AUTH_HEADER_RE.replace_all(input, "$1 [REDACTED_TOKEN]");
    BOT_TOKEN_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "MTA5ODc2NTQzMjEwOTg3NjU0.GaBcDe.abcdefghijklmnopqrstuvwxyz0123456789";

    #[test]
    fn bare_token_is_scrubbed() {
        let raw = format!("login failed for {TOKEN}: 401");
        let clean = redact_sensitive_data(&raw);
        assert!(!clean.contains(TOKEN));
        assert!(clean.contains("[REDACTED_TOKEN]"));
        assert!(clean.ends_with(": 401"));
    }

    #[test]
    fn authorization_header_is_scrubbed() {
        let clean = redact_sensitive_data("Authorization: Bot abc.def.ghi");
        assert_eq!(clean, "Authorization: Bot [REDACTED_TOKEN]");
        let clean = redact_sensitive_data("Bearer eyJhbGciOiJIUzI1NiJ9");
        assert_eq!(clean, "Bearer [REDACTED_TOKEN]");
    }

    #[test]
    fn ordinary_text_is_untouched() {
        let raw = "registered 3 global commands";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
