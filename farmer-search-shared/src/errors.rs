//! Error types for the shared data model.

use thiserror::Error;

use crate::ids::RecordKind;

/// Errors produced when decoding an exposed identifier or a raw store key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The identifier does not carry the tag of the expected record kind.
    #[error("Invalid {kind} id '{id}': missing '{prefix}' prefix")]
    MissingPrefix {
        kind: RecordKind,
        prefix: &'static str,
        id: String,
    },

    /// The part after the tag is not a well-formed store key.
    #[error("Invalid store key '{0}': expected 32 hexadecimal digits")]
    MalformedKey(String),
}

/// A record failed a domain rule before reaching either store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
