//! Acknowledgement capability
//!
//! An [`Acknowledger`] travels with an inbound message. Invoking it consumes
//! it, so a message can be acknowledged at most once.

use std::fmt;

/// Value passed to the sender on a successful decode
pub const ACK_RECEIVED: &str = "received";

/// One-shot acknowledgement callback
pub struct Acknowledger {
    callback: Box<dyn FnOnce(&'static str) + Send>,
}

impl Acknowledger {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(&'static str) + Send + 'static,
    {
        Acknowledger {
            callback: Box::new(callback),
        }
    }

    /// Report successful receipt to the sender
    pub fn acknowledge(self) {
        (self.callback)(ACK_RECEIVED)
    }
}

impl fmt::Debug for Acknowledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Acknowledger")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_acknowledge_passes_received() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let ack = Acknowledger::new(move |value| sink.lock().unwrap().push(value));

        ack.acknowledge();

        assert_eq!(*seen.lock().unwrap(), vec![ACK_RECEIVED]);
    }
}
