//! Message queue
//!
//! Entries are only ever removed from the front, and only once `Done`. An
//! entry that is not done after processing goes back to the tail, so arrival
//! order is not preserved once a message has been interrupted.

use std::collections::VecDeque;
use std::sync::Arc;

use parley_core::{Acknowledger, EntryId, RawMessage};

/// Processing state of a queue entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryState {
    Pending,
    InProgressPartial,
    Done,
}

/// Inbound message awaiting processing
#[derive(Debug)]
struct QueueEntry {
    id: EntryId,
    message: Arc<RawMessage>,
    ack: Option<Acknowledger>,
    state: EntryState,
    attempts: u32,
}

impl QueueEntry {
    fn new(id: EntryId, message: RawMessage, ack: Option<Acknowledger>) -> Self {
        QueueEntry {
            id,
            message: Arc::new(message),
            ack,
            state: EntryState::Pending,
            attempts: 0,
        }
    }
}

/// Head of the queue, as handed to the processing loop
#[derive(Clone, Debug)]
pub struct HeadEntry {
    pub id: EntryId,
    pub message: Arc<RawMessage>,
    pub state: EntryState,
    /// Processing attempts already made
    pub attempts: u32,
}

/// Entry that left the queue
#[derive(Debug)]
pub struct Settled {
    pub id: EntryId,
    pub attempts: u32,
    pub ack: Option<Acknowledger>,
}

#[derive(Debug)]
pub struct MessageQueue {
    entries: VecDeque<QueueEntry>,
    next_id: EntryId,
    max_len: usize,
}

impl MessageQueue {
    pub fn new(max_len: usize) -> Self {
        MessageQueue {
            entries: VecDeque::new(),
            next_id: EntryId::ZERO,
            max_len,
        }
    }

    /// Append a pending entry at the tail. Returns `None` when full.
    pub fn push(&mut self, message: RawMessage, ack: Option<Acknowledger>) -> Option<EntryId> {
        if self.entries.len() >= self.max_len {
            return None;
        }
        let id = self.next_id;
        self.next_id = id.next();
        self.entries.push_back(QueueEntry::new(id, message, ack));
        Some(id)
    }

    pub fn head(&self) -> Option<HeadEntry> {
        self.entries.front().map(|entry| HeadEntry {
            id: entry.id,
            message: Arc::clone(&entry.message),
            state: entry.state,
            attempts: entry.attempts,
        })
    }

    /// Record the result of one processing attempt on the head entry.
    ///
    /// A `Done` entry is removed and returned with its acknowledgement. Any
    /// other state moves the entry to the tail and returns `None`. Nothing
    /// happens if `id` is not at the head.
    pub fn settle(&mut self, id: EntryId, state: EntryState) -> Option<Settled> {
        if self.entries.front().map(|entry| entry.id) != Some(id) {
            return None;
        }
        let mut entry = self.entries.pop_front()?;
        entry.attempts = entry.attempts.saturating_add(1);
        entry.state = state;

        if state == EntryState::Done {
            return Some(Settled {
                id: entry.id,
                attempts: entry.attempts,
                ack: entry.ack.take(),
            });
        }

        self.entries.push_back(entry);
        None
    }

    /// State of an entry. Entries no longer queued are done, since only
    /// done entries are ever removed.
    pub fn state_of(&self, id: EntryId) -> Option<EntryState> {
        if id >= self.next_id {
            return None;
        }
        Some(
            self.entries
                .iter()
                .find(|entry| entry.id == id)
                .map_or(EntryState::Done, |entry| entry.state),
        )
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_ids_in_order() {
        let mut queue = MessageQueue::new(10);
        let a = queue.push("B".into(), None).unwrap();
        let b = queue.push("K".into(), None).unwrap();

        assert!(a < b);
        assert_eq!(queue.head().unwrap().id, a);
        assert_eq!(queue.state_of(a), Some(EntryState::Pending));
        assert_eq!(queue.state_of(EntryId::new(99)), None);
    }

    #[test]
    fn test_push_respects_max_len() {
        let mut queue = MessageQueue::new(1);
        assert!(queue.push("B".into(), None).is_some());
        assert!(queue.push("K".into(), None).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_settle_done_removes_head() {
        let mut queue = MessageQueue::new(10);
        let ack = Acknowledger::new(|_| {});
        let a = queue.push("B".into(), Some(ack)).unwrap();
        let b = queue.push("K".into(), None).unwrap();

        let settled = queue.settle(a, EntryState::Done).unwrap();
        assert_eq!(settled.id, a);
        assert_eq!(settled.attempts, 1);
        assert!(settled.ack.is_some());

        assert_eq!(queue.ids(), vec![b]);
        assert_eq!(queue.state_of(a), Some(EntryState::Done));
    }

    #[test]
    fn test_settle_partial_requeues_at_tail() {
        let mut queue = MessageQueue::new(10);
        let a = queue.push("B".into(), None).unwrap();
        let b = queue.push("K".into(), None).unwrap();

        assert!(queue.settle(a, EntryState::InProgressPartial).is_none());

        assert_eq!(queue.ids(), vec![b, a]);
        assert_eq!(queue.state_of(a), Some(EntryState::InProgressPartial));

        queue.settle(b, EntryState::Done).unwrap();
        let head = queue.head().unwrap();
        assert_eq!(head.id, a);
        assert_eq!(head.state, EntryState::InProgressPartial);
        assert_eq!(head.attempts, 1);
    }

    #[test]
    fn test_settle_ignores_non_head() {
        let mut queue = MessageQueue::new(10);
        let a = queue.push("B".into(), None).unwrap();
        let b = queue.push("K".into(), None).unwrap();

        assert!(queue.settle(b, EntryState::Done).is_none());
        assert_eq!(queue.ids(), vec![a, b]);
        assert_eq!(queue.state_of(b), Some(EntryState::Pending));
    }
}
