//! Identifier codec.
//!
//! Store keys are UUIDs assigned by the record store. They never leave the
//! system as-is: every key crossing the boundary is rendered as a kind tag
//! followed by the key's 32 lowercase hex digits, e.g. `f0f1e2...` for a
//! farmer and `p-0f1e2...` for a product.
//!
//! The tags are prefix-free with respect to each other, so an identifier can
//! never decode as two different kinds.

use std::fmt;

use uuid::Uuid;

use crate::errors::IdError;

/// Length of a store key rendered as simple (unhyphenated) hex.
const KEY_HEX_LEN: usize = 32;

/// The kind of record an exposed identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Farmer,
    Product,
}

impl RecordKind {
    /// The tag placed in front of the key.
    pub const fn prefix(self) -> &'static str {
        match self {
            RecordKind::Farmer => "f",
            RecordKind::Product => "p-",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Farmer => f.write_str("farmer"),
            RecordKind::Product => f.write_str("product"),
        }
    }
}

/// Render a store key as the exposed identifier for `kind`.
///
/// # Example
///
/// ```
/// use farmer_search_shared::{encode_id, RecordKind};
/// use uuid::Uuid;
///
/// let key = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
/// assert_eq!(encode_id(RecordKind::Farmer, &key), "f550e8400e29b41d4a716446655440000");
/// ```
pub fn encode_id(kind: RecordKind, key: &Uuid) -> String {
    format!("{}{}", kind.prefix(), key.simple())
}

/// Recover the store key from an exposed identifier of the given kind.
///
/// Fails when the kind's tag is missing or the remainder is not a
/// well-formed store key.
pub fn decode_id(kind: RecordKind, id: &str) -> Result<Uuid, IdError> {
    let rest = id.strip_prefix(kind.prefix()).ok_or_else(|| IdError::MissingPrefix {
        kind,
        prefix: kind.prefix(),
        id: id.to_string(),
    })?;
    parse_store_key(rest)
}

/// Parse a bare store key in its 32-digit hex form.
///
/// This is the form mirrored into the geo index. Hex digits are matched
/// case-insensitively; hyphenated, braced and URN renderings are rejected.
/// `encode_id` and `store_key_string` always emit lowercase.
pub fn parse_store_key(raw: &str) -> Result<Uuid, IdError> {
    if raw.len() != KEY_HEX_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(IdError::MalformedKey(raw.to_string()));
    }
    Uuid::parse_str(raw).map_err(|_| IdError::MalformedKey(raw.to_string()))
}

/// Render a store key in the bare form used by the geo index.
pub fn store_key_string(key: &Uuid) -> String {
    key.simple().to_string()
}
