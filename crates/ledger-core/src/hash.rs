use sha2::{Digest, Sha256};

/// SHA-256 over the block fields concatenated in order, integers in base 10
/// with no separators. Returns lowercase hex.
pub fn digest(
    index: u64,
    timestamp: u64,
    payload: &str,
    previous_digest: &str,
    nonce: u64,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(payload.as_bytes());
    hasher.update(previous_digest.as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

pub fn leading_zero_digits(digest: &str) -> u32 {
    digest.bytes().take_while(|b| *b == b'0').count() as u32
}

pub fn meets_difficulty(digest: &str, difficulty: u32) -> bool {
    leading_zero_digits(digest) >= difficulty
}
