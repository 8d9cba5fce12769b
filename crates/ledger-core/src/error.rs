use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("difficulty {requested} is out of range (max {max} leading hex zeros)")]
    DifficultyOutOfRange { requested: u32, max: u32 },

    #[error("mining of block {index} cancelled after {attempts} attempts")]
    MiningCancelled { index: u64, attempts: u64 },

    #[error("invalid transfer: {0}")]
    InvalidTransfer(String),
}

/// First violation found while walking the chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid hash at block {index}: stored {stored}, recomputed {recomputed}")]
    DigestMismatch {
        index: usize,
        stored: String,
        recomputed: String,
    },

    #[error("invalid previous hash at block {index}: expected {expected}, found {found}")]
    LinkageMismatch {
        index: usize,
        expected: String,
        found: String,
    },
}

impl ValidationError {
    pub fn index(&self) -> usize {
        match self {
            ValidationError::DigestMismatch { index, .. }
            | ValidationError::LinkageMismatch { index, .. } => *index,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChainError>;
