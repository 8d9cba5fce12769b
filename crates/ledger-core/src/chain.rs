use std::fmt;
use tracing::{debug, warn};

use crate::block::Block;
use crate::constants::{
    BALANCE_UNIT, DEFAULT_DIFFICULTY, GENESIS_PAYLOAD, GENESIS_PREVIOUS_DIGEST, MAX_DIFFICULTY,
};
use crate::error::{ChainError, Result, ValidationError};
use crate::pow::CancelToken;
use crate::transfer::{credit_payload, debit_payload};

/// In-memory, append-only sequence of mined blocks.
#[derive(Clone, Debug)]
pub struct Chain {
    blocks: Vec<Block>,
    difficulty: u32,
}

impl Chain {
    /// Build a chain and mine its genesis block at `difficulty`.
    pub fn new(difficulty: u32) -> Result<Self> {
        if difficulty > MAX_DIFFICULTY {
            return Err(ChainError::DifficultyOutOfRange {
                requested: difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        Ok(Self::with_genesis(difficulty))
    }

    pub fn with_default_difficulty() -> Self {
        Self::with_genesis(DEFAULT_DIFFICULTY)
    }

    fn with_genesis(difficulty: u32) -> Self {
        let mut genesis = genesis_block();
        genesis.mine(difficulty);
        Self {
            blocks: vec![genesis],
            difficulty,
        }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Always at least 1: genesis is present from construction.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn latest(&self) -> &Block {
        // genesis is pushed in every constructor
        &self.blocks[self.blocks.len() - 1]
    }

    /// Mine `payload` on top of the current tip and append it.
    pub fn append(&mut self, payload: impl Into<String>) -> &Block {
        let mut block = self.next_block(payload.into());
        block.mine(self.difficulty);
        self.push(block)
    }

    /// Like [`Chain::append`], but the search stops when `token` is cancelled.
    /// A cancelled append leaves the chain untouched.
    pub fn append_cancellable(
        &mut self,
        payload: impl Into<String>,
        token: &CancelToken,
    ) -> Result<&Block> {
        let mut block = self.next_block(payload.into());
        block.mine_cancellable(self.difficulty, token)?;
        Ok(self.push(block))
    }

    fn next_block(&self, payload: String) -> Block {
        let previous = self.latest();
        Block::new(previous.index + 1, payload, previous.digest.clone())
    }

    fn push(&mut self, block: Block) -> &Block {
        debug!(index = block.index, digest = %block.digest, "appending block");
        self.blocks.push(block);
        self.latest()
    }

    /// Walk blocks 1.. checking digest recomputation, then linkage.
    /// Stops at the first violation.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (i, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let index = i + 1;

            let recomputed = current.recompute_digest();
            if current.digest != recomputed {
                return Err(ValidationError::DigestMismatch {
                    index,
                    stored: current.digest.clone(),
                    recomputed,
                });
            }

            if current.previous_digest != previous.digest {
                return Err(ValidationError::LinkageMismatch {
                    index,
                    expected: previous.digest.clone(),
                    found: current.previous_digest.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(index = e.index(), "chain validation failed: {e}");
                false
            }
        }
    }

    /// Sum of the fixed credit/debit payloads for `address`. Any other payload,
    /// including [`crate::Transfer::payload`], is ignored. May go negative.
    pub fn balance_of(&self, address: &str) -> i64 {
        let credit = credit_payload(address);
        let debit = debit_payload(address);
        self.blocks
            .iter()
            .map(|b| {
                if b.payload == credit {
                    BALANCE_UNIT
                } else if b.payload == debit {
                    -BALANCE_UNIT
                } else {
                    0
                }
            })
            .sum()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            writeln!(f, "=== Block {i} ===")?;
            writeln!(f, "{block}")?;
        }
        Ok(())
    }
}

/// Unmined genesis block: index 0, sentinel previous digest.
pub fn genesis_block() -> Block {
    Block::new(0, GENESIS_PAYLOAD, GENESIS_PREVIOUS_DIGEST)
}
