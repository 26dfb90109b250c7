//! Connection events surfaced to the listener

use parley_core::{Acknowledger, ParleyError, RawMessage};

/// A message delivered by the connection, with its optional acknowledgement
#[derive(Debug)]
pub struct Inbound {
    pub message: RawMessage,
    pub ack: Option<Acknowledger>,
}

impl Inbound {
    pub fn new(message: impl Into<RawMessage>, ack: Option<Acknowledger>) -> Self {
        Inbound {
            message: message.into(),
            ack,
        }
    }
}

/// Connection lifecycle signal
#[derive(Debug)]
pub enum ConnectionEvent {
    Connected,
    ConnectError(String),
    Timeout,
    Error(String),
    Disconnected(String),
    Reconnected,
    Message(Inbound),
}

impl ConnectionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionEvent::Connected => "connect",
            ConnectionEvent::ConnectError(_) => "connect_error",
            ConnectionEvent::Timeout => "connect_timeout",
            ConnectionEvent::Error(_) => "error",
            ConnectionEvent::Disconnected(_) => "disconnect",
            ConnectionEvent::Reconnected => "reconnect",
            ConnectionEvent::Message(_) => "sentence",
        }
    }

    /// Classify failure events. Connect errors and timeouts are retryable;
    /// protocol-level errors are not.
    pub fn error(&self) -> Option<ParleyError> {
        match self {
            ConnectionEvent::ConnectError(reason) => {
                Some(ParleyError::TransientConnection(reason.clone()))
            }
            ConnectionEvent::Timeout => Some(ParleyError::TransientConnection(
                "connection timeout".to_string(),
            )),
            ConnectionEvent::Error(reason) => Some(ParleyError::FatalConnection(reason.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_error_classification() {
        assert!(ConnectionEvent::ConnectError("refused".into())
            .error()
            .is_some_and(|e| e.is_transient()));
        assert!(ConnectionEvent::Timeout
            .error()
            .is_some_and(|e| e.is_transient()));
        assert_eq!(
            ConnectionEvent::Error("bad handshake".into()).error(),
            Some(ParleyError::FatalConnection("bad handshake".into()))
        );
        assert!(ConnectionEvent::Connected.error().is_none());
        assert!(ConnectionEvent::Message(Inbound::new("B", None))
            .error()
            .is_none());
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ConnectionEvent::Connected.name(), "connect");
        assert_eq!(
            ConnectionEvent::Disconnected("io".into()).name(),
            "disconnect"
        );
    }
}
