//! Session - binds a listener to a connection's event stream
//!
//! Lifecycle events are logged and drive reconnect accounting; message
//! events are queued on the listener, which drains them on its own worker.

use tracing::{debug, error, info, warn};

use parley_core::{ParleyError, ParleyResult};
use parley_transport::{
    ConnectionEvent, EventReceiver, ReconnectDecision, ReconnectPolicy, ReconnectState,
};

use crate::Listener;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub events: u64,
    pub messages: u64,
    pub connects: u64,
    pub connect_errors: u64,
    pub errors: u64,
    /// Errors classified as not retryable
    pub fatal_errors: u64,
    pub disconnects: u64,
}

pub struct Session {
    listener: Listener,
    reconnect: ReconnectState,
    summary: SessionSummary,
}

impl Session {
    pub fn new(listener: Listener, policy: ReconnectPolicy) -> Self {
        Session {
            listener,
            reconnect: ReconnectState::new(policy),
            summary: SessionSummary::default(),
        }
    }

    /// Handle one connection event.
    ///
    /// Fails with [`ParleyError::ReconnectExhausted`] once the connection
    /// has used up its attempts.
    pub fn handle(&mut self, event: ConnectionEvent) -> ParleyResult<()> {
        self.summary.events += 1;
        debug!(event = event.name(), "Connection event");
        let failure = event.error();

        match event {
            ConnectionEvent::Connected => {
                self.summary.connects += 1;
                self.reconnect.on_connected();
                info!("Connected to speaker");
            }
            ConnectionEvent::ConnectError(_) => {
                self.summary.connect_errors += 1;
                self.log_failure(failure);
                match self.reconnect.on_connect_error() {
                    ReconnectDecision::RetryAfter(backoff) => {
                        info!(
                            attempt = self.reconnect.attempts(),
                            retry_in_ms = backoff.as_millis() as u64,
                            "Retrying connection"
                        );
                    }
                    ReconnectDecision::GiveUp => {
                        error!("Max reconnection attempts reached. Please check the speaker.");
                        return Err(self.reconnect.exhausted_error());
                    }
                }
            }
            ConnectionEvent::Timeout | ConnectionEvent::Error(_) => {
                self.summary.errors += 1;
                self.log_failure(failure);
            }
            ConnectionEvent::Disconnected(reason) => {
                self.summary.disconnects += 1;
                info!(%reason, "Disconnected");
            }
            ConnectionEvent::Reconnected => {
                info!("Reconnected to speaker");
            }
            ConnectionEvent::Message(inbound) => {
                self.summary.messages += 1;
                self.listener.deliver(inbound.message, inbound.ack);
            }
        }
        Ok(())
    }

    fn log_failure(&mut self, failure: Option<ParleyError>) {
        match failure {
            Some(err) if err.is_transient() => {
                warn!(error = %err, "Connection problem. Please check the speaker.");
            }
            Some(err) => {
                self.summary.fatal_errors += 1;
                error!(error = %err, "Connection failed. Please check the speaker.");
            }
            None => {}
        }
    }

    /// Pump events until the connection closes, then wait until every queued
    /// message has been processed, including those a delivery worker holds.
    pub async fn run(mut self, mut events: EventReceiver) -> ParleyResult<SessionSummary> {
        while let Some(event) = events.recv().await {
            if let Err(err) = self.handle(event) {
                warn!(error = %err, "Session ended");
                return Err(err);
            }
        }

        match self.listener.drain_all().await {
            Ok(_) | Err(ParleyError::ListenerClosed) => Ok(self.summary),
            Err(err) => Err(err),
        }
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    pub fn reconnect(&self) -> &ReconnectState {
        &self.reconnect
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }
}
