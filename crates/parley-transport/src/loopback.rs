//! In-process connection
//!
//! Delivers [`ConnectionEvent`]s over a bounded channel. Messages emitted
//! with an acknowledgement hand back a receiver that resolves when the
//! listener acknowledges.

use tokio::sync::{mpsc, oneshot};

use parley_core::{Acknowledger, ParleyError, ParleyResult, RawMessage};

use crate::{ConnectionEvent, Inbound};

/// Event receiver channel
pub type EventReceiver = mpsc::Receiver<ConnectionEvent>;

/// Resolves with the acknowledgement value, or errors if the message was
/// dropped without one
pub type AckReceiver = oneshot::Receiver<&'static str>;

/// Sending half of a loopback connection
#[derive(Clone, Debug)]
pub struct LoopbackSender {
    tx: mpsc::Sender<ConnectionEvent>,
}

/// Create a loopback connection
pub fn loopback(buffer_size: usize) -> (LoopbackSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (LoopbackSender { tx }, rx)
}

impl LoopbackSender {
    /// Emit a message that expects an acknowledgement
    pub async fn emit(&self, message: impl Into<RawMessage>) -> ParleyResult<AckReceiver> {
        let (ack_tx, ack_rx) = oneshot::channel();
        let ack = Acknowledger::new(move |value| {
            if ack_tx.send(value).is_err() {
                tracing::debug!("Acknowledgement dropped: sender no longer waiting");
            }
        });
        self.signal(ConnectionEvent::Message(Inbound::new(message, Some(ack))))
            .await?;
        Ok(ack_rx)
    }

    /// Emit a message without an acknowledgement
    pub async fn emit_unacknowledged(&self, message: impl Into<RawMessage>) -> ParleyResult<()> {
        self.signal(ConnectionEvent::Message(Inbound::new(message, None)))
            .await
    }

    /// Surface a lifecycle event
    pub async fn signal(&self, event: ConnectionEvent) -> ParleyResult<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ParleyError::ListenerClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
