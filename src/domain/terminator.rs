// ============================================================
// Layer 3 — Terminator Token
// ============================================================
// The end-of-sequence marker appended to every training text,
// e.g. "</s>", "<|endoftext|>" or "<|im_end|>".
//
// The only way to build one is TerminatorToken::new, which
// rejects the empty string. Code that holds a TerminatorToken
// therefore never has to re-check for emptiness.

use std::fmt;

use crate::domain::error::FormatError;

/// A validated, non-empty terminator string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TerminatorToken(String);

impl TerminatorToken {
    /// Validate and wrap a terminator string.
    ///
    /// Returns `FormatError::EmptyTerminator` for `""`.
    pub fn new(token: impl Into<String>) -> Result<Self, FormatError> {
        let token = token.into();
        if token.is_empty() {
            return Err(FormatError::EmptyTerminator);
        }
        Ok(Self(token))
    }

    /// The raw terminator string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TerminatorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for TerminatorToken {
    type Error = FormatError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
