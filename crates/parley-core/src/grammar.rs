//! Message grammar
//!
//! A message is valid iff it matches
//!
//! ```text
//! ([BKRZL]-*)*[BKRZL](-----([BKRZL]-*)*[BKRZL])*
//! ```
//!
//! which accepts exactly the non-empty strings over the alphabet and the
//! modifier that start and end with a symbol. The sentinel is not valid under
//! the grammar; callers must test for it first (see [`inspect`]).

use crate::{is_symbol, ParleyError, ParleyResult, RawMessage, MODIFIER};

/// Check a message against the grammar. Pure.
pub fn is_valid(message: &str) -> bool {
    check(message).is_ok()
}

/// Check a message against the grammar, reporting why it was rejected
pub fn check(message: &str) -> ParleyResult<()> {
    let (Some(first), Some(last)) = (message.chars().next(), message.chars().next_back()) else {
        return Err(ParleyError::invalid("empty message"));
    };

    if let Some((pos, c)) = message
        .char_indices()
        .find(|&(_, c)| !is_symbol(c) && c != MODIFIER)
    {
        return Err(ParleyError::invalid(format!(
            "unexpected character {:?} at {}",
            c, pos
        )));
    }

    if !is_symbol(first) {
        return Err(ParleyError::invalid("message must start with a symbol"));
    }
    if !is_symbol(last) {
        return Err(ParleyError::invalid("message must end with a symbol"));
    }

    Ok(())
}

/// Validate a raw payload, yielding its text on success
pub fn validate(raw: &RawMessage) -> ParleyResult<&str> {
    let text = raw.as_text().ok_or(ParleyError::NotText(raw.len()))?;
    check(text)?;
    Ok(text)
}

/// Classification of an inbound payload before decoding
#[derive(Debug, PartialEq, Eq)]
pub enum Inspection<'a> {
    /// Keep-alive; produces nothing
    Sentinel,
    /// Grammatically valid sentence, ready to decode
    Sentence(&'a str),
    /// Malformed; never retried
    Rejected(ParleyError),
}

/// Classify a payload. The sentinel short-circuits before the grammar runs.
pub fn inspect(raw: &RawMessage) -> Inspection<'_> {
    if raw.is_sentinel() {
        return Inspection::Sentinel;
    }
    match validate(raw) {
        Ok(text) => Inspection::Sentence(text),
        Err(err) => Inspection::Rejected(err),
    }
}
