use std::fmt;

/// Page content returned by a scrape collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    pub html: String,
    pub title: Option<String>,
    pub url: String,
}

/// Failure reported by a scrape or parse collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CollaboratorError {
    pub kind: FailureKind,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Worth another attempt: timeouts, connection trouble, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self.kind {
            FailureKind::Timeout | FailureKind::Network => true,
            FailureKind::HttpStatus(code) => code == 429 || code >= 500,
            _ => false,
        }
    }

    /// The collaborator's own message, or `fallback` when it gave none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        let message = self.message.trim();
        if message.is_empty() {
            fallback
        } else {
            message
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    EmptyContent,
    Network,
    /// The collaborator answered, but not in the agreed shape.
    BadResponse,
    /// The collaborator reported an error of its own.
    Service,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::EmptyContent => write!(f, "empty content"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::BadResponse => write!(f, "bad response"),
            FailureKind::Service => write!(f, "service error"),
        }
    }
}
