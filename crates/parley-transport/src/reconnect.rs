//! Reconnect accounting
//!
//! Each failed connect counts one attempt; a successful connect resets the
//! count. Once `max_attempts` is reached the connection gives up.

use std::time::Duration;

use parley_core::ParleyError;

/// Reconnect policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Attempts before giving up
    pub max_attempts: u32,
    /// Fixed wait between attempts
    pub backoff: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy {
            max_attempts: 5,
            backoff: Duration::from_millis(5000),
        }
    }
}

/// What to do after a failed connect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconnectDecision {
    RetryAfter(Duration),
    GiveUp,
}

#[derive(Clone, Debug)]
pub struct ReconnectState {
    policy: ReconnectPolicy,
    attempts: u32,
}

impl ReconnectState {
    pub fn new(policy: ReconnectPolicy) -> Self {
        ReconnectState {
            policy,
            attempts: 0,
        }
    }

    /// Whether another connect may be started
    pub fn can_attempt(&self) -> bool {
        self.attempts < self.policy.max_attempts
    }

    /// Record a failed connect
    pub fn on_connect_error(&mut self) -> ReconnectDecision {
        self.attempts = self.attempts.saturating_add(1);
        if self.can_attempt() {
            ReconnectDecision::RetryAfter(self.policy.backoff)
        } else {
            ReconnectDecision::GiveUp
        }
    }

    pub fn on_connected(&mut self) {
        self.attempts = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    pub fn exhausted_error(&self) -> ParleyError {
        ParleyError::ReconnectExhausted {
            attempts: self.attempts,
        }
    }
}

impl Default for ReconnectState {
    fn default() -> Self {
        Self::new(ReconnectPolicy::default())
    }
}
