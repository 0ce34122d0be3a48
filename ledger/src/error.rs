//! Error types for the ledger.
//!
//! [`LedgerError`] covers operations that can fail outright. A chain that
//! fails validation is not an error in that sense: `Chain::validate` returns
//! a [`ValidationError`] value describing the first offending block.

use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors raised while building, appending to, or loading a chain.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The payload has no canonical JSON representation.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// `latest()` was asked of a chain with no blocks.
    #[error("chain has no blocks")]
    EmptyChain,

    /// A draft's index did not follow the tip under the sequential policy.
    #[error("block index out of sequence: expected {expected}, got {actual}")]
    IndexOutOfSequence {
        /// Index the chain expected next.
        expected: u64,
        /// Index carried by the draft.
        actual: u64,
    },

    /// A chain dump could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What went wrong at the first invalid block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// The stored digest does not match the block's content.
    DigestMismatch {
        /// Digest stored in the block.
        stored: String,
        /// Digest recomputed from the block's fields.
        computed: String,
    },

    /// The block does not point at its predecessor's digest.
    LinkageMismatch {
        /// Digest of the preceding block.
        expected: String,
        /// `previous_digest` stored in the block.
        found: String,
    },
}

/// Result of a failed validation: the first offending index and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("block {index} is invalid: {}", describe(.failure))]
pub struct ValidationError {
    pub index: u64,
    pub failure: ValidationFailure,
}

impl ValidationError {
    pub fn digest_mismatch(index: u64, stored: &str, computed: &str) -> Self {
        Self {
            index,
            failure: ValidationFailure::DigestMismatch {
                stored: stored.to_string(),
                computed: computed.to_string(),
            },
        }
    }

    pub fn linkage_mismatch(index: u64, expected: &str, found: &str) -> Self {
        Self {
            index,
            failure: ValidationFailure::LinkageMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            },
        }
    }

    /// True when the block's content was altered without re-digesting.
    pub fn is_digest_mismatch(&self) -> bool {
        matches!(self.failure, ValidationFailure::DigestMismatch { .. })
    }

    /// True when the block was reordered, removed, inserted, or relinked.
    pub fn is_linkage_mismatch(&self) -> bool {
        matches!(self.failure, ValidationFailure::LinkageMismatch { .. })
    }
}

fn describe(failure: &ValidationFailure) -> String {
    match failure {
        ValidationFailure::DigestMismatch { stored, computed } => {
            format!("digest mismatch (stored={stored}, computed={computed})")
        }
        ValidationFailure::LinkageMismatch { expected, found } => {
            format!("linkage mismatch (expected previous={expected}, found={found})")
        }
    }
}
