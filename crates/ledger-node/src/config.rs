use clap::Parser;
use ledger_core::constants::DEFAULT_DIFFICULTY;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "ledger-node", about = "In-memory proof-of-work ledger node")]
pub struct Args {
    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: String,

    /// Leading zero hex digits every block digest must have
    #[arg(long, default_value_t = DEFAULT_DIFFICULTY)]
    pub difficulty: u32,

    /// Abandon a transfer whose block is not mined within this many seconds
    #[arg(long)]
    pub mining_timeout_secs: Option<u64>,
}

impl Args {
    pub fn mining_timeout(&self) -> Option<Duration> {
        self.mining_timeout_secs.map(Duration::from_secs)
    }
}
