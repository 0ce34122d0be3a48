//! # Hashing Utilities
//!
//! SHA-256 is the only hash function behind block digests. Digests travel
//! through the ledger as lowercase hex strings so they can be compared,
//! printed, and embedded in JSON dumps without a second encoding step.
//!
//! ## Preimage layout (digest format v1)
//!
//! ```text
//! DIGEST_DOMAIN_TAG
//! || u64le(len(payload))         || payload          (canonical JSON)
//! || u64le(len(previous_digest)) || previous_digest  (UTF-8)
//! || u64le(len(timestamp))       || timestamp        (UTF-8)
//! ```
//!
//! Each field is length-prefixed so that no two distinct field triples can
//! produce the same byte string. The order is part of the format: changing
//! it changes every digest ever computed.

use sha2::{Digest, Sha256};

use crate::config::{DIGEST_DOMAIN_TAG, DIGEST_HEX_LENGTH};

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use hashchain_ledger::crypto::sha256;
///
/// let hash = sha256(b"hashchain");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute SHA-256 and render it as 64 lowercase hex characters.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Assemble the digest preimage for a block's content.
pub fn digest_preimage(payload: &[u8], previous_digest: &str, timestamp: &str) -> Vec<u8> {
    let mut preimage = Vec::with_capacity(
        DIGEST_DOMAIN_TAG.len() + 24 + payload.len() + previous_digest.len() + timestamp.len(),
    );
    preimage.extend_from_slice(DIGEST_DOMAIN_TAG);
    push_field(&mut preimage, payload);
    push_field(&mut preimage, previous_digest.as_bytes());
    push_field(&mut preimage, timestamp.as_bytes());
    preimage
}

fn push_field(buf: &mut Vec<u8>, field: &[u8]) {
    buf.extend_from_slice(&(field.len() as u64).to_le_bytes());
    buf.extend_from_slice(field);
}

/// Returns true if `s` looks like a rendered digest (64 lowercase hex chars).
pub fn is_digest_hex(s: &str) -> bool {
    s.len() == DIGEST_HEX_LENGTH
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
