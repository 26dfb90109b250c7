//! Listener - queue-backed, paced, distraction-aware decoder
//!
//! One listener owns all per-connection state: the queue, the decoder cache,
//! the pacing timestamp and the recent translations. A single worker drains
//! the queue; arrivals only extend the tail.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn, Instrument, Span};

use parley_core::{
    inspect, tokens, Acknowledger, Decoder, EntryId, Inspection, ParleyError, ParleyResult,
    RawMessage, Vocabulary,
};
use parley_time::{Clock, PacingController};

use crate::{
    DistractionModel, DistractionSource, EntryState, ListenerConfig, MessageQueue,
    RecentTranslations, Settled,
};

/// Clock backed by the Tokio timer, so paused test time applies to pacing
#[derive(Clone, Copy, Debug, Default)]
pub struct RuntimeClock;

impl Clock for RuntimeClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub received: u64,
    pub dropped: u64,
    pub steps: u64,
    pub sentinels: u64,
    pub invalid: u64,
    pub decoded: u64,
    pub aborted: u64,
    pub distractions: u64,
    pub acknowledged: u64,
}

/// Result of processing the head entry once
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Keep-alive; nothing recorded, nothing acknowledged
    Sentinel,
    /// Malformed; dropped without retry
    Invalid(ParleyError),
    /// Fully decoded and recorded
    Decoded {
        translation: String,
        acknowledged: bool,
    },
    /// Abandoned mid-decode and moved to the tail
    Deferred,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub id: EntryId,
    /// Pacing delay applied before processing
    pub delay: Duration,
    pub outcome: StepOutcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Queue emptied after this many steps
    Drained { steps: usize },
    /// Another worker is already draining
    AlreadyDraining,
}

enum Processed {
    Sentinel,
    Invalid(ParleyError),
    Decoded(String),
    Deferred,
}

struct Shared {
    config: ListenerConfig,
    queue: Mutex<MessageQueue>,
    decoder: Decoder,
    pacing: PacingController,
    clock: Arc<dyn Clock>,
    distraction: Mutex<DistractionModel>,
    recent: RwLock<RecentTranslations>,
    stats: Mutex<ListenerStats>,
    worker: watch::Sender<bool>,
    shutdown: watch::Sender<bool>,
    span: Span,
}

/// Releases the worker slot on drop, waking [`Listener::wait_idle`]
struct WorkerGuard<'a> {
    slot: &'a watch::Sender<bool>,
}

impl Drop for WorkerGuard<'_> {
    fn drop(&mut self) {
        self.slot.send_replace(false);
    }
}

pub struct ListenerBuilder {
    config: ListenerConfig,
    clock: Option<Arc<dyn Clock>>,
    distraction: Option<Box<dyn DistractionSource>>,
    vocabulary: Option<Vocabulary>,
}

impl ListenerBuilder {
    pub fn new(config: ListenerConfig) -> Self {
        ListenerBuilder {
            config,
            clock: None,
            distraction: None,
            vocabulary: None,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replace the configured random distraction source
    pub fn distraction_source(mut self, source: impl DistractionSource + 'static) -> Self {
        self.distraction = Some(Box::new(source));
        self
    }

    pub fn vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    pub fn build(self) -> ParleyResult<Listener> {
        self.config.validate()?;

        let config = self.config;
        let clock = self.clock.unwrap_or_else(|| Arc::new(RuntimeClock));
        let distraction = match self.distraction {
            Some(source) => DistractionModel::new(
                source,
                config.distraction_pause,
                config.distraction_policy,
            ),
            None => DistractionModel::from_config(&config),
        };
        let (shutdown, _) = watch::channel(false);
        let (worker, _) = watch::channel(false);
        let span = tracing::info_span!("listener", name = %config.name);

        Ok(Listener {
            inner: Arc::new(Shared {
                queue: Mutex::new(MessageQueue::new(config.max_queue_len)),
                decoder: Decoder::new(self.vocabulary.unwrap_or_default()),
                pacing: PacingController::new(clock.now(), config.pacing_ceiling),
                clock,
                distraction: Mutex::new(distraction),
                recent: RwLock::new(RecentTranslations::new(config.recent_capacity)),
                stats: Mutex::new(ListenerStats::default()),
                worker,
                shutdown,
                span,
                config,
            }),
        })
    }
}

/// Handle to a listener; clones share the same state
#[derive(Clone)]
pub struct Listener {
    inner: Arc<Shared>,
}

impl Listener {
    pub fn new(config: ListenerConfig) -> ParleyResult<Self> {
        ListenerBuilder::new(config).build()
    }

    pub fn builder(config: ListenerConfig) -> ListenerBuilder {
        ListenerBuilder::new(config)
    }

    /// Queue a message at the tail. Returns `None` if the queue is full, in
    /// which case the message is dropped unacknowledged.
    pub fn enqueue(
        &self,
        message: impl Into<RawMessage>,
        ack: Option<Acknowledger>,
    ) -> Option<EntryId> {
        let (id, max_len) = {
            let mut queue = self.inner.queue.lock();
            (queue.push(message.into(), ack), queue.max_len())
        };

        let mut stats = self.inner.stats.lock();
        match id {
            Some(id) => {
                stats.received += 1;
                debug!(parent: &self.inner.span, entry = %id, "Sentence queued");
            }
            None => {
                stats.dropped += 1;
                warn!(
                    parent: &self.inner.span,
                    max_queue_len = max_len,
                    "Queue full, dropping sentence"
                );
            }
        }
        id
    }

    /// Queue a message and make sure a worker is draining.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn deliver(
        &self,
        message: impl Into<RawMessage>,
        ack: Option<Acknowledger>,
    ) -> Option<EntryId> {
        let id = self.enqueue(message, ack);
        if !self.is_draining() {
            let listener = self.clone();
            tokio::spawn(async move {
                if let Err(err) = listener.drain().await {
                    debug!(parent: &listener.inner.span, error = %err, "Drain stopped");
                }
            });
        }
        id
    }

    /// Process entries until the queue is empty.
    ///
    /// Only one drain runs at a time; a second call while one is active
    /// returns [`DrainOutcome::AlreadyDraining`] without touching the queue.
    /// Errors only with [`ParleyError::ListenerClosed`] after shutdown.
    pub async fn drain(&self) -> ParleyResult<DrainOutcome> {
        let mut steps = 0;
        loop {
            let Some(worker) = self.claim_worker() else {
                return Ok(if steps == 0 {
                    DrainOutcome::AlreadyDraining
                } else {
                    DrainOutcome::Drained { steps }
                });
            };

            while self.step_claimed().await?.is_some() {
                steps += 1;
            }
            drop(worker);

            // An arrival may have landed between the last empty check and the release
            if self.queue_len() == 0 {
                return Ok(DrainOutcome::Drained { steps });
            }
        }
    }

    /// Process the head entry once: pace, classify, decode, then remove it
    /// or move it to the tail. Returns `Ok(None)` if the queue is empty or
    /// another worker is draining.
    pub async fn step(&self) -> ParleyResult<Option<StepReport>> {
        let Some(_worker) = self.claim_worker() else {
            debug!(parent: &self.inner.span, "Step skipped, listener busy");
            return Ok(None);
        };
        self.step_claimed().await
    }

    async fn step_claimed(&self) -> ParleyResult<Option<StepReport>> {
        self.ensure_open()?;
        let head = self.inner.queue.lock().head();
        let Some(head) = head else {
            return Ok(None);
        };
        if head.state == EntryState::InProgressPartial {
            debug!(
                parent: &self.inner.span,
                entry = %head.id,
                attempts = head.attempts,
                "Retrying interrupted sentence"
            );
        }

        self.process_head(head.id, head.message)
            .instrument(self.inner.span.clone())
            .await
            .map(Some)
    }

    async fn process_head(
        &self,
        id: EntryId,
        message: Arc<RawMessage>,
    ) -> ParleyResult<StepReport> {
        let delay = self.inner.pacing.advance(self.inner.clock.now());
        debug!(entry = %id, delay_ms = delay.as_millis() as u64, "Pacing");
        self.pause(delay).await?;

        let processed = self.process(id, &message).await?;
        let outcome = match processed {
            Processed::Deferred => {
                self.inner
                    .queue
                    .lock()
                    .settle(id, EntryState::InProgressPartial);
                self.inner.stats.lock().aborted += 1;
                debug!(entry = %id, "Sentence re-queued at tail");
                StepOutcome::Deferred
            }
            Processed::Sentinel => {
                self.inner.queue.lock().settle(id, EntryState::Done);
                self.inner.stats.lock().sentinels += 1;
                StepOutcome::Sentinel
            }
            Processed::Invalid(err) => {
                self.inner.queue.lock().settle(id, EntryState::Done);
                self.inner.stats.lock().invalid += 1;
                StepOutcome::Invalid(err)
            }
            Processed::Decoded(translation) => {
                info!(entry = %id, translation = %translation, "Translation");
                self.inner.recent.write().push(translation.clone());

                let settled = self.inner.queue.lock().settle(id, EntryState::Done);
                let acknowledged = match settled {
                    Some(Settled {
                        attempts,
                        ack: Some(ack),
                        ..
                    }) => {
                        ack.acknowledge();
                        info!(entry = %id, attempts, "Message received. Acknowledgement sent.");
                        true
                    }
                    _ => false,
                };

                let mut stats = self.inner.stats.lock();
                stats.decoded += 1;
                if acknowledged {
                    stats.acknowledged += 1;
                }
                StepOutcome::Decoded {
                    translation,
                    acknowledged,
                }
            }
        };

        self.inner.stats.lock().steps += 1;
        Ok(StepReport { id, delay, outcome })
    }

    async fn process(&self, id: EntryId, message: &RawMessage) -> ParleyResult<Processed> {
        let sentence = match inspect(message) {
            Inspection::Sentinel => {
                debug!(entry = %id, "Sentinel received");
                return Ok(Processed::Sentinel);
            }
            Inspection::Rejected(err) => {
                warn!(entry = %id, sentence = %message, error = %err, "Invalid sentence");
                return Ok(Processed::Invalid(err));
            }
            Inspection::Sentence(sentence) => sentence,
        };

        info!(entry = %id, sentence, "Original sentence");

        let mut labels = Vec::new();
        for token in tokens(sentence) {
            let interruption = self.inner.distraction.lock().draw();
            if let Some(interruption) = interruption {
                self.inner.stats.lock().distractions += 1;
                info!(
                    entry = %id,
                    token,
                    pause_ms = interruption.pause.as_millis() as u64,
                    "Listener is distracted..."
                );
                self.pause(interruption.pause).await?;
                if interruption.aborts() {
                    debug!(entry = %id, discarded = labels.len(), "Partial translation discarded");
                    return Ok(Processed::Deferred);
                }
            }
            labels.push(self.inner.decoder.decode(token));
        }

        Ok(Processed::Decoded(labels.join(" ")))
    }

    /// Sleep, unless shutdown comes first
    async fn pause(&self, duration: Duration) -> ParleyResult<()> {
        let mut shutdown = self.inner.shutdown.subscribe();
        let closed = *shutdown.borrow();
        if closed {
            return Err(ParleyError::ListenerClosed);
        }
        if duration.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = shutdown.changed() => Err(ParleyError::ListenerClosed),
        }
    }

    fn claim_worker(&self) -> Option<WorkerGuard<'_>> {
        let claimed = self.inner.worker.send_if_modified(|busy| {
            if *busy {
                false
            } else {
                *busy = true;
                true
            }
        });
        claimed.then(|| WorkerGuard {
            slot: &self.inner.worker,
        })
    }

    fn ensure_open(&self) -> ParleyResult<()> {
        if self.is_shut_down() {
            Err(ParleyError::ListenerClosed)
        } else {
            Ok(())
        }
    }

    /// Stop the worker at its next suspension point. Queued entries keep
    /// their state.
    pub fn shutdown(&self) {
        self.inner.shutdown.send_replace(true);
        info!(parent: &self.inner.span, "Listener shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        *self.inner.shutdown.borrow()
    }

    pub fn is_draining(&self) -> bool {
        *self.inner.worker.borrow()
    }

    /// Wait until no worker holds the queue. Returns at once if idle.
    pub async fn wait_idle(&self) {
        let mut worker = self.inner.worker.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = worker.wait_for(|busy| !*busy).await;
    }

    /// Drain until the queue is empty, waiting out any worker already
    /// running instead of returning early.
    ///
    /// Errors only with [`ParleyError::ListenerClosed`] after shutdown.
    pub async fn drain_all(&self) -> ParleyResult<usize> {
        let mut steps = 0;
        loop {
            match self.drain().await? {
                DrainOutcome::Drained { steps: ran } => steps += ran,
                DrainOutcome::AlreadyDraining => {}
            }
            if !self.is_draining() && self.queue_len() == 0 {
                return Ok(steps);
            }
            self.wait_idle().await;
        }
    }

    /// Last translations, oldest first
    pub fn recent_translations(&self) -> Vec<String> {
        self.inner.recent.read().snapshot()
    }

    pub fn entry_state(&self, id: EntryId) -> Option<EntryState> {
        self.inner.queue.lock().state_of(id)
    }

    /// Queued entry ids, head first
    pub fn queued_ids(&self) -> Vec<EntryId> {
        self.inner.queue.lock().ids()
    }

    pub fn queue_len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    pub fn stats(&self) -> ListenerStats {
        self.inner.stats.lock().clone()
    }

    pub fn decoder(&self) -> &Decoder {
        &self.inner.decoder
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("name", &self.inner.config.name)
            .field("queue_len", &self.queue_len())
            .field("draining", &self.is_draining())
            .finish()
    }
}
