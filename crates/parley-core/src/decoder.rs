//! Token decoder
//!
//! Resolves tokens against a fixed vocabulary. Known tokens are memoized in
//! an append-only cache for the lifetime of the decoder; unknown tokens
//! decode to [`UNKNOWN`] and are never cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Label produced for tokens outside the vocabulary
pub const UNKNOWN: &str = "UNKNOWN";

/// Martian words and their English translations
pub const MARTIAN_WORDS: &[(&str, &str)] = &[
    ("B--B-K---Z", "food"),
    ("BBKZ", "vomit"),
    ("B-K-RKK---ZZZ", "sleep"),
    ("BKR-KK-ZZZ", "philosophy"),
    ("ZZ-KK", "need"),
    ("KK-ZZ", "hate"),
    ("L-R-Z", "I"),
    ("Z-R-L", "you"),
    ("ZZKK", "rejoice"),
    ("B-K", "book"),
    ("R--Z", "language"),
    ("K-L--B", "dance"),
    ("Z-B", "music"),
    ("LR-K", "death"),
    ("B-KR-R", "life"),
    ("ZZ-LL", "love"),
    ("K-R", "hungry"),
    ("L--B----Z", "thirsty"),
    ("R--Z--L", "happy"),
    ("Z-Z-Z-Z", "sad"),
];

/// Static token vocabulary
#[derive(Clone, Debug)]
pub struct Vocabulary {
    words: HashMap<&'static str, &'static str>,
}

impl Vocabulary {
    /// Build a vocabulary from (token, label) pairs
    pub fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Self {
        Vocabulary {
            words: pairs.iter().copied().collect(),
        }
    }

    /// The Martian vocabulary
    pub fn martian() -> Self {
        Self::from_pairs(MARTIAN_WORDS)
    }

    pub fn lookup(&self, token: &str) -> Option<&'static str> {
        self.words.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::martian()
    }
}

/// Decoder statistics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecoderStats {
    pub cache_hits: u64,
    pub vocabulary_hits: u64,
    pub unknown: u64,
}

/// Memoizing token decoder, safe to share between tasks
#[derive(Debug)]
pub struct Decoder {
    vocabulary: Vocabulary,
    cache: RwLock<HashMap<String, &'static str>>,
    cache_hits: AtomicU64,
    vocabulary_hits: AtomicU64,
    unknown: AtomicU64,
}

impl Decoder {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Decoder {
            vocabulary,
            cache: RwLock::new(HashMap::new()),
            cache_hits: AtomicU64::new(0),
            vocabulary_hits: AtomicU64::new(0),
            unknown: AtomicU64::new(0),
        }
    }

    /// Decode a token: cache, then vocabulary, then [`UNKNOWN`]
    pub fn decode(&self, token: &str) -> &'static str {
        if let Some(label) = self.cache.read().get(token).copied() {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return label;
        }

        match self.vocabulary.lookup(token) {
            Some(label) => {
                self.cache.write().entry(token.to_owned()).or_insert(label);
                self.vocabulary_hits.fetch_add(1, Ordering::Relaxed);
                label
            }
            None => {
                self.unknown.fetch_add(1, Ordering::Relaxed);
                UNKNOWN
            }
        }
    }

    /// Decode every token and join the labels with spaces
    pub fn translate<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> String {
        tokens
            .into_iter()
            .map(|token| self.decode(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_cached(&self, token: &str) -> bool {
        self.cache.read().contains_key(token)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn stats(&self) -> DecoderStats {
        DecoderStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            vocabulary_hits: self.vocabulary_hits.load(Ordering::Relaxed),
            unknown: self.unknown.load(Ordering::Relaxed),
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(Vocabulary::martian())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens;

    #[test]
    fn test_decode_known_token() {
        let decoder = Decoder::default();
        assert_eq!(decoder.decode("L-R-Z"), "I");
        assert_eq!(decoder.decode("ZZ-LL"), "love");
        assert_eq!(decoder.decode("L--B----Z"), "thirsty");
    }

    #[test]
    fn test_decode_is_idempotent() {
        let decoder = Decoder::default();

        let first = decoder.decode("Z-R-L");
        assert_eq!(decoder.cache_len(), 1);
        assert_eq!(
            decoder.stats(),
            DecoderStats {
                cache_hits: 0,
                vocabulary_hits: 1,
                unknown: 0
            }
        );

        let second = decoder.decode("Z-R-L");
        assert_eq!(first, second);
        assert_eq!(decoder.cache_len(), 1);
        assert_eq!(decoder.stats().cache_hits, 1);
        assert_eq!(decoder.stats().vocabulary_hits, 1);
    }

    #[test]
    fn test_unknown_token_fallback() {
        let decoder = Decoder::default();

        assert_eq!(decoder.decode("PQRS"), UNKNOWN);
        assert_eq!(decoder.decode("PQRS"), UNKNOWN);
        assert!(!decoder.is_cached("PQRS"));
        assert_eq!(decoder.cache_len(), 0);
        assert_eq!(decoder.stats().unknown, 2);
    }

    #[test]
    fn test_translate_sentence() {
        let decoder = Decoder::default();
        assert_eq!(decoder.translate(tokens("L-R-Z-----ZZ-LL")), "I love");
        assert_eq!(
            decoder.translate(tokens("L-R-Z-----B-K--Z-----Z-R-L")),
            "I UNKNOWN you"
        );
    }

    #[test]
    fn test_custom_vocabulary() {
        let decoder = Decoder::new(Vocabulary::from_pairs(&[("B", "bee")]));
        assert_eq!(decoder.vocabulary().len(), 1);
        assert_eq!(decoder.decode("B"), "bee");
        assert_eq!(decoder.decode("L-R-Z"), UNKNOWN);
    }

    #[test]
    fn test_martian_vocabulary_is_complete() {
        let vocabulary = Vocabulary::martian();
        assert_eq!(vocabulary.len(), MARTIAN_WORDS.len());
        for (token, _) in MARTIAN_WORDS {
            assert!(crate::is_valid(token), "{} should be grammatical", token);
        }
    }
}
