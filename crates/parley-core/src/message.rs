//! Message model
//!
//! A message is a sequence of tokens joined by [`WORD_SEPARATOR`]. Tokens are
//! built from the symbols in [`ALPHABET`], each optionally followed by runs of
//! the [`MODIFIER`] character. The all-modifier [`SENTINEL`] is a complete
//! message of its own meaning "no content".

use std::fmt;

/// Base symbols a token is built from
pub const ALPHABET: [char; 5] = ['B', 'K', 'R', 'Z', 'L'];

/// Repeat/length modifier that may follow any symbol
pub const MODIFIER: char = '-';

/// Inter-token separator (5 modifiers)
pub const WORD_SEPARATOR: &str = "-----";

/// Keep-alive message (10 modifiers)
pub const SENTINEL: &str = "----------";

#[inline]
pub fn is_symbol(c: char) -> bool {
    ALPHABET.contains(&c)
}

/// Split a message into its tokens, left to right
pub fn tokens(message: &str) -> impl Iterator<Item = &str> {
    message.split(WORD_SEPARATOR)
}

/// Join tokens into a message
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(WORD_SEPARATOR)
}

/// Inbound payload as surfaced by the connection
#[derive(Clone, PartialEq, Eq)]
pub enum RawMessage {
    /// UTF-8 text payload
    Text(String),
    /// Anything that is not text
    Binary(Vec<u8>),
}

impl RawMessage {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawMessage::Text(text) => Some(text),
            RawMessage::Binary(_) => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.as_text() == Some(SENTINEL)
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        match self {
            RawMessage::Text(text) => text.len(),
            RawMessage::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for RawMessage {
    fn from(text: String) -> Self {
        RawMessage::Text(text)
    }
}

impl From<&str> for RawMessage {
    fn from(text: &str) -> Self {
        RawMessage::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for RawMessage {
    fn from(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => RawMessage::Text(text),
            Err(err) => RawMessage::Binary(err.into_bytes()),
        }
    }
}

impl fmt::Debug for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawMessage::Text(text) => write!(f, "Text({:?})", text),
            RawMessage::Binary(bytes) => write!(f, "Binary({} bytes)", bytes.len()),
        }
    }
}

impl fmt::Display for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawMessage::Text(text) => f.write_str(text),
            RawMessage::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}
