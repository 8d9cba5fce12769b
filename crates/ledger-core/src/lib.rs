pub mod block;
pub mod chain;
pub mod constants;
pub mod error;
pub mod hash;
pub mod pow;
pub mod transfer;

pub use block::Block;
pub use chain::Chain;
pub use error::{ChainError, Result, ValidationError};
pub use pow::{CancelOnDrop, CancelToken, MiningStats};
pub use transfer::Transfer;
