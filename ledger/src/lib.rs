// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Hashchain Ledger
//!
//! An append-only, hash-chained ledger held in memory. Each block commits to
//! its own content and to its predecessor's digest, so any edit, removal,
//! insertion, or reordering of stored blocks is caught by re-walking the
//! chain.
//!
//! ## Architecture
//!
//! - **payload**: Arbitrary JSON payloads and their canonical byte encoding.
//! - **crypto**: SHA-256 and the versioned digest preimage layout.
//! - **block**: `Block` (digested record) and `BlockDraft` (not yet linked).
//! - **chain**: Genesis seeding, append, and validation.
//! - **export**: JSON dumps for inspection and reloading.
//! - **config**: Format constants and per-chain settings.
//! - **error**: `LedgerError` and `ValidationError`.
//!
//! ## Example
//!
//! ```
//! use hashchain_ledger::{BlockDraft, Chain};
//! use serde_json::json;
//!
//! let mut chain = Chain::new();
//! chain
//!     .append(BlockDraft::new(
//!         1,
//!         "01/09/2021",
//!         json!({ "sender": "Dennis", "recipient": "Sanya", "quantity": 20 }),
//!     ))
//!     .unwrap();
//!
//! assert_eq!(chain.len(), 2);
//! assert!(chain.validate().is_ok());
//! ```
//!
//! ## Out of scope
//!
//! No networking, consensus, persistence, or proof-of-work. There is no
//! process-wide chain: callers own their `Chain` values.

pub mod block;
pub mod chain;
pub mod config;
pub mod crypto;
pub mod error;
pub mod export;
pub mod payload;

pub use block::{Block, BlockDraft};
pub use chain::Chain;
pub use config::{ChainConfig, IndexPolicy};
pub use error::{LedgerError, LedgerResult, ValidationError, ValidationFailure};
pub use payload::Payload;
