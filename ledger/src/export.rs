//! JSON dumps of a chain, for inspection and for moving chains between
//! processes.
//!
//! A dump looks like:
//!
//! ```text
//! {
//!     "blocks": [
//!         {
//!             "index": 0,
//!             "timestamp": "09/01/2021",
//!             "payload": "Initial block in the chain",
//!             "previous_digest": "0",
//!             "digest": "…"
//!         },
//!         …
//!     ]
//! }
//! ```
//!
//! Loading a dump never validates it. A dump is untrusted input; run
//! `Chain::validate` on the result.

use std::io::{Read, Write};

use serde::Serialize;

use crate::chain::{Chain, ChainDump};
use crate::config::ChainConfig;
use crate::error::{LedgerError, LedgerResult};

const INDENT: &[u8] = b"    ";

/// Pretty JSON with 4-space indentation.
pub fn to_json(chain: &Chain) -> LedgerResult<String> {
    let mut buf = Vec::new();
    write_to(chain, &mut buf)?;
    String::from_utf8(buf).map_err(|e| LedgerError::Serialization(e.to_string()))
}

/// Single-line JSON.
pub fn to_json_compact(chain: &Chain) -> LedgerResult<String> {
    serde_json::to_string(chain).map_err(|e| LedgerError::Serialization(e.to_string()))
}

/// Write the pretty dump, followed by a newline.
pub fn write_to<W: Write>(chain: &Chain, mut writer: W) -> LedgerResult<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    chain
        .serialize(&mut ser)
        .map_err(|e| LedgerError::Serialization(e.to_string()))?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Parse a dump produced by [`to_json`] or [`to_json_compact`].
///
/// # Errors
///
/// - [`LedgerError::Serialization`] for malformed JSON or a wrong shape.
/// - [`LedgerError::EmptyChain`] for a dump with no blocks.
pub fn from_json(json: &str, config: ChainConfig) -> LedgerResult<Chain> {
    let dump: ChainDump =
        serde_json::from_str(json).map_err(|e| LedgerError::Serialization(e.to_string()))?;
    Chain::from_blocks(dump.blocks, config)
}

/// Streaming counterpart of [`from_json`].
pub fn read_from<R: Read>(reader: R, config: ChainConfig) -> LedgerResult<Chain> {
    let dump: ChainDump =
        serde_json::from_reader(reader).map_err(|e| LedgerError::Serialization(e.to_string()))?;
    Chain::from_blocks(dump.blocks, config)
}
