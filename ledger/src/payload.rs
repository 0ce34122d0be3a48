//! Block payloads and their canonical encoding.
//!
//! A payload is any JSON value. Object keys are kept in lexicographic order
//! (serde_json's `BTreeMap`-backed map), so the compact JSON rendering is
//! canonical: the same logical payload always produces the same bytes no
//! matter what order the caller inserted its fields in.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LedgerError, LedgerResult};

/// Arbitrary structured data carried by a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Value);

impl Payload {
    /// Build a payload from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidPayload`] when the value has no JSON
    /// representation, e.g. a map keyed by something other than strings.
    /// Non-finite floats (NaN, infinities) are not an error: they are stored
    /// as `null`, the same as their JSON rendering.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> LedgerResult<Self> {
        serde_json::to_value(value)
            .map(Payload)
            .map_err(|e| LedgerError::InvalidPayload(e.to_string()))
    }

    /// Compact JSON with sorted object keys. This is what gets digested.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        self.0.to_string().into_bytes()
    }

    /// Look up a top-level field of an object payload.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The payload as text, if it is a plain string (e.g. the genesis marker).
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Mutable access for in-crate tamper tests; stored blocks never expose it.
    #[cfg(test)]
    pub(crate) fn value_mut(&mut self) -> &mut Value {
        &mut self.0
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload(value)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload(Value::String(s.to_string()))
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload(Value::String(s))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
