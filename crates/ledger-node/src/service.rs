use ledger_core::{Block, CancelToken, Chain, Transfer};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::ApiError;

/// Owns the node's chain. Cloning shares the same chain; every append holds
/// the lock from tip read to push, so writers are serialized.
#[derive(Clone)]
pub struct LedgerService {
    chain: Arc<Mutex<Chain>>,
    mining_timeout: Option<Duration>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
    pub is_valid: bool,
    pub difficulty: u32,
}

impl LedgerService {
    pub fn new(chain: Chain, mining_timeout: Option<Duration>) -> Self {
        Self {
            chain: Arc::new(Mutex::new(chain)),
            mining_timeout,
        }
    }

    /// Record `transfer` as a new block and return its index.
    pub async fn transfer(&self, transfer: &Transfer) -> Result<u64, ApiError> {
        transfer.validate()?;
        let payload = transfer.payload();
        let token = CancelToken::new();
        // An abandoned request (client gone) stops its search instead of committing.
        let _cancel_on_drop = token.clone().drop_guard();

        let mut chain = self.chain.clone().lock_owned().await;
        let mut mining = tokio::task::spawn_blocking({
            let token = token.clone();
            move || {
                chain
                    .append_cancellable(payload, &token)
                    .map(|block| block.index())
            }
        });

        let joined = match self.mining_timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut mining).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(?limit, "mining timed out, cancelling");
                    token.cancel();
                    mining.await
                }
            },
            None => mining.await,
        };

        let index = joined.map_err(|e| ApiError::Internal(e.to_string()))??;
        info!(
            index,
            from = %transfer.from,
            to = %transfer.to,
            amount = transfer.amount,
            "transfer recorded"
        );
        Ok(index)
    }

    pub async fn snapshot(&self) -> ChainSnapshot {
        let chain = self.chain.lock().await;
        ChainSnapshot {
            chain: chain.blocks().to_vec(),
            length: chain.len(),
            is_valid: chain.is_valid(),
            difficulty: chain.difficulty(),
        }
    }

    pub async fn balance(&self, address: &str) -> i64 {
        self.chain.lock().await.balance_of(address)
    }
}
