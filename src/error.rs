use thiserror::Error;

/// Failure reported by the transport layer for a single request attempt.
///
/// The two variants are deliberately distinct: `Http` means the backend was
/// reachable and answered with a non-2xx status, while `Network` means no
/// response was obtained at all (connection refused, DNS failure, timeout).
/// Callers branch on the variant instead of catching exception types.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("backend unreachable: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<PredictError> for String {
    fn from(err: PredictError) -> Self {
        err.to_string()
    }
}

/// Truncate an error body for logs and messages, stepping back to the
/// nearest char boundary so multi-byte text cannot split mid-character.
pub(crate) fn truncate_body(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short_text_untouched() {
        assert_eq!(truncate_body("short", 1024), "short");
    }

    #[test]
    fn test_truncate_body_long_ascii() {
        let long = "x".repeat(2000);
        let out = truncate_body(&long, 1024);
        assert_eq!(out.len(), 1024 + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncate_body_multibyte_boundary() {
        // "€" is 3 bytes; a 300-byte cut would land inside a character.
        let body = format!("ab{}", "€".repeat(150));
        let out = truncate_body(&body, 300);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 300 + 3);
        // Must still be valid UTF-8 ending on a whole character.
        assert!(out.trim_end_matches("...").chars().last().is_some());
    }

    #[test]
    fn test_truncate_body_exact_length() {
        let body = "a".repeat(300);
        assert_eq!(truncate_body(&body, 300), body);
    }
}
