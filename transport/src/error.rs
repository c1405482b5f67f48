//! Error types for the transport layer.
//!
//! # Design
//! Every failure a dispatch can produce is classified into one of five
//! variants so callers can choose a reaction (surface, retry at their own
//! layer, give up) without string matching. HTTP status codes are *not*
//! errors here — a 4xx/5xx arrives as a normal `Response`; only failures
//! that leave the caller without any response at all become a
//! `TransportError`.

/// Errors delivered through the completion path of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request was malformed (empty or unparseable target URL),
    /// detected before any network I/O began.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The exchange failed below HTTP: DNS, connect, or socket I/O.
    #[error("network failure: {0}")]
    Network(String),

    /// The configured deadline elapsed before the exchange finished.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The peer spoke unusable HTTP, or the URL used an unsupported scheme.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The dispatch was cancelled by its handle while still in flight.
    #[error("dispatch cancelled")]
    Cancelled,
}

impl TransportError {
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, TransportError::InvalidRequest(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, TransportError::Network(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, TransportError::Protocol(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }
}
