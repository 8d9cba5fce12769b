use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared flag a host sets to stop an in-flight nonce search.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Guard that cancels this token when dropped, e.g. when the future
    /// awaiting a search is abandoned.
    pub fn drop_guard(self) -> CancelOnDrop {
        CancelOnDrop(self)
    }
}

#[derive(Debug)]
pub struct CancelOnDrop(CancelToken);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MiningStats {
    pub nonce: u64,
    /// Nonce increments performed. Zero when the starting digest already qualified.
    pub attempts: u64,
    pub elapsed: Duration,
}
