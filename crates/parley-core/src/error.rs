//! Error types for the parley listener

use thiserror::Error;

/// Core parley errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParleyError {
    // Message errors
    #[error("Invalid message: {reason}")]
    InvalidMessage { reason: String },

    #[error("Message is not text ({0} bytes)")]
    NotText(usize),

    // Connection errors
    #[error("Transient connection error: {0}")]
    TransientConnection(String),

    #[error("Fatal connection error: {0}")]
    FatalConnection(String),

    #[error("Max reconnection attempts reached ({attempts})")]
    ReconnectExhausted { attempts: u32 },

    // Runtime errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Listener closed")]
    ListenerClosed,
}

impl ParleyError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ParleyError::InvalidMessage {
            reason: reason.into(),
        }
    }

    /// Malformed inbound content. Never retried.
    pub fn is_invalid_message(&self) -> bool {
        matches!(
            self,
            ParleyError::InvalidMessage { .. } | ParleyError::NotText(_)
        )
    }

    /// Connection-layer failure that may succeed on a later attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, ParleyError::TransientConnection(_))
    }
}

/// Result type for parley operations
pub type ParleyResult<T> = Result<T, ParleyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ParleyError::invalid("empty").is_invalid_message());
        assert!(ParleyError::NotText(3).is_invalid_message());
        assert!(!ParleyError::ListenerClosed.is_invalid_message());

        assert!(ParleyError::TransientConnection("refused".into()).is_transient());
        assert!(!ParleyError::FatalConnection("bad frame".into()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = ParleyError::ReconnectExhausted { attempts: 5 };
        assert_eq!(err.to_string(), "Max reconnection attempts reached (5)");

        let err = ParleyError::invalid("unexpected character 'x'");
        assert_eq!(err.to_string(), "Invalid message: unexpected character 'x'");
    }
}
