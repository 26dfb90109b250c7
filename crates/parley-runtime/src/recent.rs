//! Recent translations ring

use std::collections::VecDeque;

/// Fixed-capacity FIFO of the latest translations, oldest first
#[derive(Clone, Debug)]
pub struct RecentTranslations {
    entries: VecDeque<String>,
    capacity: usize,
}

impl RecentTranslations {
    pub fn new(capacity: usize) -> Self {
        RecentTranslations {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a translation, evicting the oldest when full
    pub fn push(&mut self, translation: String) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(translation);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_recent_evicts_oldest() {
        let mut recent = RecentTranslations::new(10);
        for i in 0..15 {
            recent.push(format!("t{}", i));
        }

        let expected: Vec<String> = (5..15).map(|i| format!("t{}", i)).collect();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent.snapshot(), expected);
    }

    #[test]
    fn test_recent_under_capacity() {
        let mut recent = RecentTranslations::new(10);
        recent.push("I love".to_string());

        assert_eq!(recent.snapshot(), vec!["I love".to_string()]);
        assert_eq!(recent.capacity(), 10);
    }

    proptest! {
        #[test]
        fn prop_recent_keeps_tail(count in 0usize..64, capacity in 1usize..16) {
            let mut recent = RecentTranslations::new(capacity);
            for i in 0..count {
                recent.push(i.to_string());
            }
            let expected: Vec<String> = (count.saturating_sub(capacity)..count)
                .map(|i| i.to_string())
                .collect();
            prop_assert_eq!(recent.snapshot(), expected);
        }
    }
}
