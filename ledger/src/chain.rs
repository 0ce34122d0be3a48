//! In-memory, append-only chain with validation.
//!
//! A [`Chain`] always holds at least its genesis block. Blocks enter only
//! through [`Chain::append`], which links each draft to the current tip and
//! digests it. [`Chain::validate`] re-derives every digest and every link and
//! reports the first block that does not hold up.
//!
//! Chains loaded from a dump ([`Chain::from_blocks`], or serde) are adopted
//! as-is. Nothing is checked at load time; call `validate` on them.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::block::{Block, BlockDraft};
use crate::config::ChainConfig;
use crate::error::{LedgerError, LedgerResult, ValidationError};

/// Ordered chain of digested blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChainDump")]
pub struct Chain {
    blocks: Vec<Block>,
    #[serde(skip)]
    config: ChainConfig,
}

/// Wire shape of a chain, before the non-empty check. Shared by the serde
/// impl and `export`, so both loading paths agree.
#[derive(Deserialize)]
pub(crate) struct ChainDump {
    pub(crate) blocks: Vec<Block>,
}

impl TryFrom<ChainDump> for Chain {
    type Error = LedgerError;

    fn try_from(dump: ChainDump) -> Result<Self, Self::Error> {
        Chain::from_blocks(dump.blocks, ChainConfig::default())
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// Create a chain seeded with the genesis block, permissive indices.
    pub fn new() -> Self {
        Self::with_config(ChainConfig::default())
    }

    /// Create a chain seeded with the genesis block.
    pub fn with_config(config: ChainConfig) -> Self {
        let genesis = Block::genesis();
        debug!(digest = %genesis.digest(), "chain initialized with genesis");
        Self {
            blocks: vec![genesis],
            config,
        }
    }

    /// Adopt blocks from elsewhere without checking them.
    ///
    /// # Errors
    ///
    /// [`LedgerError::EmptyChain`] if `blocks` is empty.
    pub fn from_blocks(blocks: Vec<Block>, config: ChainConfig) -> LedgerResult<Self> {
        if blocks.is_empty() {
            return Err(LedgerError::EmptyChain);
        }
        Ok(Self { blocks, config })
    }

    /// Link `draft` behind the current tip, digest it, and store it.
    ///
    /// Accepts a [`BlockDraft`] or a previously built [`Block`], whose
    /// linkage fields are discarded.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::IndexOutOfSequence`] when the sequential index policy
    ///   is configured and the draft does not carry `latest().index + 1`.
    /// - [`LedgerError::EmptyChain`] if the chain has no tip.
    pub fn append(&mut self, draft: impl Into<BlockDraft>) -> LedgerResult<&Block> {
        let draft = draft.into();
        let tip = self.latest()?;

        if self.config.enforces_sequential_index() {
            let expected = tip.index().saturating_add(1);
            if draft.index != expected {
                warn!(expected, actual = draft.index, "rejected out-of-sequence block");
                return Err(LedgerError::IndexOutOfSequence {
                    expected,
                    actual: draft.index,
                });
            }
        }

        let block = Block::link(draft, tip.digest());
        debug!(index = block.index(), digest = %block.digest(), "block appended");
        self.blocks.push(block);
        self.latest()
    }

    /// The most recently appended block.
    pub fn latest(&self) -> LedgerResult<&Block> {
        self.blocks.last().ok_or(LedgerError::EmptyChain)
    }

    /// Walk the chain and report the first invalid block.
    ///
    /// Genesis is checked for digest self-consistency only; it has no
    /// predecessor. Every later block must match its recomputed digest and
    /// point at its predecessor's stored digest. Stops at the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let result = self.check();
        if let Err(err) = &result {
            warn!(index = err.index, error = %err, "chain validation failed");
        }
        result
    }

    /// An empty block list validates vacuously. Public constructors never
    /// produce one; `latest` is where that state surfaces as `EmptyChain`.
    fn check(&self) -> Result<(), ValidationError> {
        debug_assert!(!self.blocks.is_empty(), "chain holds no blocks");
        let Some(genesis) = self.blocks.first() else {
            return Ok(());
        };
        genesis.verify_digest()?;

        for (position, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let index = position as u64 + 1;
            trace!(index, digest = %current.digest(), "checking block");

            let computed = current.compute_digest();
            if computed != current.digest() {
                return Err(ValidationError::digest_mismatch(
                    index,
                    current.digest(),
                    &computed,
                ));
            }

            if current.previous_digest() != previous.digest() {
                return Err(ValidationError::linkage_mismatch(
                    index,
                    previous.digest(),
                    current.previous_digest(),
                ));
            }
        }
        Ok(())
    }

    /// `validate()` collapsed to a boolean.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for chains built through this API.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block at a position in the chain.
    pub fn get(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
