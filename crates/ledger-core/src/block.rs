use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use crate::constants::CANCEL_CHECK_INTERVAL;
use crate::error::{ChainError, Result};
use crate::hash::{digest, meets_difficulty};
use crate::pow::{CancelToken, MiningStats};

/// A single ledger entry. Fields can only be changed from inside the crate,
/// and the chain only does so through [`Block::mine`] before storing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub(crate) index: u64,
    pub(crate) timestamp: u64,
    pub(crate) payload: String,
    pub(crate) previous_digest: String,
    pub(crate) digest: String,
    pub(crate) nonce: u64,
}

impl Block {
    /// Unmined block stamped with the current wall-clock second.
    pub fn new(index: u64, payload: impl Into<String>, previous_digest: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self::with_timestamp(index, timestamp, payload, previous_digest)
    }

    pub fn with_timestamp(
        index: u64,
        timestamp: u64,
        payload: impl Into<String>,
        previous_digest: impl Into<String>,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            payload: payload.into(),
            previous_digest: previous_digest.into(),
            digest: String::new(),
            nonce: 0,
        };
        block.digest = block.recompute_digest();
        block
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn previous_digest(&self) -> &str {
        &self.previous_digest
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Digest of the current field values. Never touches `nonce` or `digest`.
    pub fn recompute_digest(&self) -> String {
        digest(
            self.index,
            self.timestamp,
            &self.payload,
            &self.previous_digest,
            self.nonce,
        )
    }

    /// True when the stored digest is genuine and satisfies `difficulty`.
    pub fn is_mined(&self, difficulty: u32) -> bool {
        self.digest == self.recompute_digest() && meets_difficulty(&self.digest, difficulty)
    }

    /// Brute-force the nonce until the digest has `difficulty` leading zero
    /// hex digits. Blocks until found; returns the number of attempts.
    pub fn mine(&mut self, difficulty: u32) -> u64 {
        match self.search(difficulty, None) {
            Ok(stats) => stats.attempts,
            Err(attempts) => attempts,
        }
    }

    /// Same search as [`Block::mine`], giving up once `token` is cancelled.
    /// The token is polled every `CANCEL_CHECK_INTERVAL` attempts.
    pub fn mine_cancellable(&mut self, difficulty: u32, token: &CancelToken) -> Result<MiningStats> {
        self.search(difficulty, Some(token))
            .map_err(|attempts| ChainError::MiningCancelled {
                index: self.index,
                attempts,
            })
    }

    fn search(
        &mut self,
        difficulty: u32,
        token: Option<&CancelToken>,
    ) -> std::result::Result<MiningStats, u64> {
        debug!(index = self.index, difficulty, "mining block");
        let start = Instant::now();
        let mut attempts = 0u64;

        while !meets_difficulty(&self.digest, difficulty) {
            if let Some(token) = token {
                if attempts % CANCEL_CHECK_INTERVAL == 0 && token.is_cancelled() {
                    debug!(index = self.index, attempts, "mining cancelled");
                    return Err(attempts);
                }
            }
            self.nonce = self.nonce.wrapping_add(1);
            self.digest = self.recompute_digest();
            attempts += 1;
        }

        let stats = MiningStats {
            nonce: self.nonce,
            attempts,
            elapsed: start.elapsed(),
        };
        info!(
            "Mined block {} in {:?} with nonce {} ({} attempts)",
            self.index, stats.elapsed, stats.nonce, stats.attempts
        );
        Ok(stats)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block #{}", self.index)?;
        writeln!(f, "Timestamp: {}", self.timestamp)?;
        writeln!(f, "Data: {}", self.payload)?;
        writeln!(f, "Previous Hash: {}", self.previous_digest)?;
        writeln!(f, "Hash: {}", self.digest)?;
        writeln!(f, "Nonce: {}", self.nonce)
    }
}
