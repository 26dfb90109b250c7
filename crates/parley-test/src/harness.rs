//! End-to-end harness
//!
//! Replays a [`DeliveryPlan`] over a loopback connection into a listener
//! session, then collects translations, statistics and acknowledgements.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use parley_core::{ParleyError, ParleyResult};
use parley_runtime::{Listener, ListenerConfig, ListenerStats, Session, SessionSummary};
use parley_transport::{loopback, AckReceiver, ConnectionEvent, LoopbackSender, ReconnectPolicy};

use crate::DeliveryPlan;

/// Outcome of a replayed plan
#[derive(Clone, Debug)]
pub struct HarnessReport {
    pub summary: SessionSummary,
    pub stats: ListenerStats,
    pub recent: Vec<String>,
    /// Messages whose acknowledgement arrived
    pub acknowledged: usize,
    /// Messages that expected an acknowledgement but never got one
    pub unacknowledged: usize,
    /// Virtual time from first send to the end of draining
    pub elapsed: Duration,
}

pub struct ListenerHarness {
    listener: Listener,
    sender: LoopbackSender,
    session: JoinHandle<ParleyResult<SessionSummary>>,
    pending_acks: Vec<AckReceiver>,
    started: Instant,
}

impl ListenerHarness {
    /// Start a session for a new listener. Must run inside a Tokio runtime.
    pub fn start(config: ListenerConfig) -> ParleyResult<Self> {
        Ok(Self::attach(Listener::new(config)?))
    }

    pub fn attach(listener: Listener) -> Self {
        let (sender, events) = loopback(1024);
        let session = Session::new(listener.clone(), ReconnectPolicy::default());
        ListenerHarness {
            listener,
            sender,
            session: tokio::spawn(session.run(events)),
            pending_acks: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    pub fn sender(&self) -> &LoopbackSender {
        &self.sender
    }

    /// Send every scheduled message at its offset
    pub async fn replay(&mut self, plan: &DeliveryPlan) -> ParleyResult<()> {
        self.sender.signal(ConnectionEvent::Connected).await?;
        let start = Instant::now();

        for scheduled in plan.messages() {
            tokio::time::sleep_until(start + scheduled.at).await;
            if scheduled.acknowledged {
                let ack = self.sender.emit(scheduled.message.as_str()).await?;
                self.pending_acks.push(ack);
            } else {
                self.sender
                    .emit_unacknowledged(scheduled.message.as_str())
                    .await?;
            }
        }
        Ok(())
    }

    /// Close the connection, wait for the listener to drain and gather results
    pub async fn finish(self) -> ParleyResult<HarnessReport> {
        let ListenerHarness {
            listener,
            sender,
            session,
            pending_acks,
            started,
        } = self;

        drop(sender);
        let summary = session
            .await
            .map_err(|e| ParleyError::FatalConnection(e.to_string()))??;

        let elapsed = started.elapsed();

        let mut acknowledged = 0;
        let mut unacknowledged = 0;
        for ack in pending_acks {
            match ack.await {
                Ok(_) => acknowledged += 1,
                Err(_) => unacknowledged += 1,
            }
        }

        Ok(HarnessReport {
            summary,
            stats: listener.stats(),
            recent: listener.recent_translations(),
            acknowledged,
            unacknowledged,
            elapsed,
        })
    }
}

/// Replay a plan against a fresh listener and report
pub async fn run_plan(config: ListenerConfig, plan: &DeliveryPlan) -> ParleyResult<HarnessReport> {
    let mut harness = ListenerHarness::start(config)?;
    harness.replay(plan).await?;
    harness.finish().await
}
