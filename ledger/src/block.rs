//! # Block Structure
//!
//! A block is one record of the chain. It commits to its payload, its
//! timestamp, and its predecessor's digest through its own digest.
//!
//! ## Block Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Block                                      │
//! │  ├── index: u64                             │
//! │  ├── timestamp: String                      │
//! │  ├── payload: Payload      (JSON value)     │
//! │  ├── previous_digest: String                │
//! │  └── digest: String        (SHA-256, hex)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Hash Computation
//!
//! The digest covers `payload || previous_digest || timestamp` in that
//! order (see [`crate::crypto::hash`] for the framing). The index is NOT
//! part of the digest; its position is implied by the linkage.
//!
//! ## Drafts
//!
//! A [`BlockDraft`] is a block that has not been linked yet. It has no
//! previous digest and no digest of its own, so it cannot be mistaken for a
//! chain member. `Chain::append` consumes a draft and returns the finalized
//! [`Block`].

use serde::{Deserialize, Serialize};

use crate::config::{
    GENESIS_PAYLOAD, GENESIS_PREVIOUS_DIGEST, GENESIS_TIMESTAMP, UNLINKED_PREVIOUS_DIGEST,
};
use crate::crypto::hash::{digest_preimage, sha256_hex};
use crate::error::{LedgerResult, ValidationError};
use crate::payload::Payload;

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A digested record. Fields are read-only outside this crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: String,
    payload: Payload,
    previous_digest: String,
    digest: String,
}

impl Block {
    /// Construct a block and compute its digest immediately.
    ///
    /// Nothing is validated here: any index and any timestamp text are
    /// accepted. Integrity is the chain's business.
    pub fn new(
        index: u64,
        timestamp: impl Into<String>,
        payload: impl Into<Payload>,
        previous_digest: impl Into<String>,
    ) -> Self {
        let mut block = Block {
            index,
            timestamp: timestamp.into(),
            payload: payload.into(),
            previous_digest: previous_digest.into(),
            digest: String::new(),
        };
        block.digest = block.compute_digest();
        block
    }

    /// Construct a block that is not linked to anything yet.
    ///
    /// Its previous digest is the placeholder
    /// [`UNLINKED_PREVIOUS_DIGEST`]; appending it to a chain replaces both
    /// linkage fields.
    pub fn unlinked(index: u64, timestamp: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self::new(index, timestamp, payload, UNLINKED_PREVIOUS_DIGEST)
    }

    /// The fixed first block of every chain.
    pub fn genesis() -> Self {
        Self::new(0, GENESIS_TIMESTAMP, GENESIS_PAYLOAD, GENESIS_PREVIOUS_DIGEST)
    }

    /// Recompute the digest from the current field values.
    ///
    /// Pure: no clock reads, no randomness. Compare the result against
    /// [`Block::digest`] to detect tampering.
    pub fn compute_digest(&self) -> String {
        sha256_hex(&digest_preimage(
            &self.payload.canonical_bytes(),
            &self.previous_digest,
            &self.timestamp,
        ))
    }

    /// Check that the stored digest matches the content.
    pub fn verify_digest(&self) -> Result<(), ValidationError> {
        let computed = self.compute_digest();
        if computed != self.digest {
            return Err(ValidationError::digest_mismatch(
                self.index,
                &self.digest,
                &computed,
            ));
        }
        Ok(())
    }

    /// Link this block behind `previous_digest` and re-digest it.
    pub(crate) fn link(draft: BlockDraft, previous_digest: &str) -> Self {
        Self::new(draft.index, draft.timestamp, draft.payload, previous_digest)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn previous_digest(&self) -> &str {
        &self.previous_digest
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// True for a block shaped like genesis: index 0, sentinel predecessor.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_digest == GENESIS_PREVIOUS_DIGEST
    }

    #[cfg(test)]
    pub(crate) fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    #[cfg(test)]
    pub(crate) fn set_previous_digest(&mut self, previous_digest: impl Into<String>) {
        self.previous_digest = previous_digest.into();
    }
}

// ---------------------------------------------------------------------------
// BlockDraft
// ---------------------------------------------------------------------------

/// A block waiting to be appended. Carries content only, no linkage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockDraft {
    pub index: u64,
    pub timestamp: String,
    pub payload: Payload,
}

impl BlockDraft {
    pub fn new(index: u64, timestamp: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            index,
            timestamp: timestamp.into(),
            payload: payload.into(),
        }
    }

    /// Draft a block around any serializable payload.
    ///
    /// # Errors
    ///
    /// [`crate::LedgerError::InvalidPayload`] if the payload cannot be
    /// canonically encoded. Non-finite floats are stored as `null`.
    pub fn from_serializable<T: Serialize + ?Sized>(
        index: u64,
        timestamp: impl Into<String>,
        payload: &T,
    ) -> LedgerResult<Self> {
        Ok(Self::new(index, timestamp, Payload::from_serializable(payload)?))
    }
}

/// Any previously built block can be resubmitted; its linkage is discarded.
impl From<Block> for BlockDraft {
    fn from(block: Block) -> Self {
        Self {
            index: block.index,
            timestamp: block.timestamp,
            payload: block.payload,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::is_digest_hex;
    use serde_json::json;

    fn transfer(quantity: u64) -> Payload {
        Payload::from(json!({ "sender": "Dennis", "recipient": "Sanya", "quantity": quantity }))
    }

    #[test]
    fn genesis_block_properties() {
        let genesis = Block::genesis();
        assert_eq!(genesis.index(), 0);
        assert_eq!(genesis.timestamp(), GENESIS_TIMESTAMP);
        assert_eq!(genesis.payload().as_str(), Some(GENESIS_PAYLOAD));
        assert_eq!(genesis.previous_digest(), "0");
        assert!(genesis.is_genesis());
        assert!(is_digest_hex(genesis.digest()));
    }

    #[test]
    fn genesis_hash_is_deterministic() {
        assert_eq!(Block::genesis().digest(), Block::genesis().digest());
        assert_eq!(Block::genesis(), Block::genesis());
    }

    #[test]
    fn digest_is_computed_on_construction() {
        let block = Block::new(1, "01/09/2021", transfer(20), "abc");
        assert_eq!(block.digest(), block.compute_digest());
        assert!(block.verify_digest().is_ok());
    }

    #[test]
    fn compute_digest_is_repeatable() {
        let block = Block::unlinked(1, "01/09/2021", transfer(20));
        let first = block.compute_digest();
        for _ in 0..10 {
            assert_eq!(block.compute_digest(), first);
        }
    }

    #[test]
    fn index_is_not_digested() {
        let a = Block::new(1, "01/09/2021", transfer(20), "p");
        let b = Block::new(42, "01/09/2021", transfer(20), "p");
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a, b);
    }

    #[test]
    fn every_digested_field_matters() {
        let base = Block::new(1, "01/09/2021", transfer(20), "p");
        let other_payload = Block::new(1, "01/09/2021", transfer(21), "p");
        let other_previous = Block::new(1, "01/09/2021", transfer(20), "q");
        let other_time = Block::new(1, "02/09/2021", transfer(20), "p");

        assert_ne!(base.digest(), other_payload.digest());
        assert_ne!(base.digest(), other_previous.digest());
        assert_ne!(base.digest(), other_time.digest());
    }

    #[test]
    fn unlinked_block_uses_placeholder() {
        let block = Block::unlinked(1, "01/09/2021", transfer(20));
        assert_eq!(block.previous_digest(), UNLINKED_PREVIOUS_DIGEST);
        assert!(!block.is_genesis());
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let mut block = Block::new(1, "01/09/2021", transfer(20), "p");
        block.payload_mut().value_mut()["quantity"] = json!(9999);

        let err = block.verify_digest().unwrap_err();
        assert_eq!(err.index, 1);
        assert!(err.is_digest_mismatch());
    }

    #[test]
    fn draft_from_block_drops_linkage() {
        let block = Block::new(3, "03/09/2021", transfer(5), "whatever");
        let draft = BlockDraft::from(block.clone());
        assert_eq!(draft.index, 3);
        assert_eq!(draft.timestamp, "03/09/2021");
        assert_eq!(&draft.payload, block.payload());

        let relinked = Block::link(draft, "p");
        assert_eq!(relinked.previous_digest(), "p");
        assert!(relinked.verify_digest().is_ok());
    }

    #[test]
    fn block_serialization_roundtrip() {
        let block = Block::new(1, "01/09/2021", transfer(20), "p");
        let json = serde_json::to_string(&block).expect("serialize");
        let recovered: Block = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(block, recovered);
        assert!(recovered.verify_digest().is_ok());
    }
}
