pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const MAX_DIFFICULTY: u32 = HASH_HEX_SIZE as u32;
pub const DEFAULT_DIFFICULTY: u32 = 2;
/// Mining polls its cancel token once per this many nonce attempts.
pub const CANCEL_CHECK_INTERVAL: u64 = 4096;
pub const GENESIS_PAYLOAD: &str = "Genesis Block";
pub const GENESIS_PREVIOUS_DIGEST: &str = "0";
pub const BALANCE_UNIT: i64 = 10;
