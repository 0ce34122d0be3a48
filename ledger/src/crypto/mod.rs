//! # Cryptographic Primitives
//!
//! Thin wrappers around audited hash implementations. Block digests are
//! SHA-256 over a length-prefixed, domain-tagged preimage; see
//! [`hash::digest_preimage`] for the exact layout.

pub mod hash;

pub use hash::{digest_preimage, is_digest_hex, sha256, sha256_hex};
