//! Identity types for queued messages

use std::fmt;

/// Queue entry identity - assigned in arrival order, never reused
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntryId(pub u64);

impl EntryId {
    pub const ZERO: EntryId = EntryId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        EntryId(id)
    }

    /// The id assigned to the entry that arrives after this one
    #[inline]
    pub fn next(self) -> Self {
        EntryId(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry({})", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_ordering() {
        let first = EntryId::ZERO;
        let second = first.next();

        assert!(first < second);
        assert_eq!(second, EntryId::new(1));
        assert_eq!(format!("{:?}", second), "Entry(1)");
        assert_eq!(second.to_string(), "#1");
    }
}
