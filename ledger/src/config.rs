//! # Ledger Configuration & Constants
//!
//! Every fixed value that influences a digest lives here. Changing any of
//! the digest or genesis constants changes every digest computed afterwards,
//! so they are versioned together under [`DIGEST_FORMAT_VERSION`].
//!
//! The only runtime knob is [`ChainConfig`], which controls how strictly
//! `Chain::append` treats block indices.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Digest Format
// ---------------------------------------------------------------------------

/// Version of the digest preimage layout. Bump only together with
/// [`DIGEST_DOMAIN_TAG`]; old digests will no longer verify.
pub const DIGEST_FORMAT_VERSION: u16 = 1;

/// Domain tag prepended to every digest preimage.
pub const DIGEST_DOMAIN_TAG: &[u8] = b"hashchain-digest-v1";

/// Name of the hash function behind block digests.
pub const DIGEST_ALGORITHM: &str = "SHA-256";

/// Length of a rendered digest: 32 bytes as lowercase hex.
pub const DIGEST_HEX_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// Well-known timestamp of the genesis block.
pub const GENESIS_TIMESTAMP: &str = "09/01/2021";

/// Marker payload carried by the genesis block.
pub const GENESIS_PAYLOAD: &str = "Initial block in the chain";

/// Previous-digest sentinel of the genesis block. It has no predecessor.
pub const GENESIS_PREVIOUS_DIGEST: &str = "0";

/// Placeholder previous digest of a block that has not been appended yet.
pub const UNLINKED_PREVIOUS_DIGEST: &str = " ";

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// `chrono` format used when a timestamp is generated rather than supplied.
/// Supplied timestamps are never parsed or checked against it.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y";

// ---------------------------------------------------------------------------
// Runtime Configuration
// ---------------------------------------------------------------------------

/// How `Chain::append` treats the index carried by a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPolicy {
    /// Accept whatever index the caller supplies.
    #[default]
    Permissive,
    /// Require `draft.index == latest().index + 1`.
    Sequential,
}

/// Per-chain settings. Not part of any digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Index policy applied on append.
    #[serde(default)]
    pub index_policy: IndexPolicy,
}

impl ChainConfig {
    /// Configuration that rejects out-of-sequence indices.
    pub fn strict() -> Self {
        Self {
            index_policy: IndexPolicy::Sequential,
        }
    }

    pub fn with_index_policy(mut self, index_policy: IndexPolicy) -> Self {
        self.index_policy = index_policy;
        self
    }

    /// Returns true when appends must carry sequential indices.
    pub fn enforces_sequential_index(&self) -> bool {
        self.index_policy == IndexPolicy::Sequential
    }
}
