use serde::{Deserialize, Serialize};

use crate::constants::BALANCE_UNIT;
use crate::error::{ChainError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

impl Transfer {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: u64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.from.is_empty() || self.to.is_empty() || self.amount == 0 {
            return Err(ChainError::InvalidTransfer(
                "from, to, and amount (>0) are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Block payload recorded for this transfer.
    ///
    /// Note this is not one of the shapes [`credit_payload`] / [`debit_payload`]
    /// match, so transfers appended this way do not move balances.
    pub fn payload(&self) -> String {
        format!(
            "Transfer from {} to {}: {} coins",
            self.from, self.to, self.amount
        )
    }
}

/// Payload counted as `+BALANCE_UNIT` for `address`.
pub fn credit_payload(address: &str) -> String {
    format!("Transfer to {address}: {BALANCE_UNIT} coins")
}

/// Payload counted as `-BALANCE_UNIT` for `address`.
pub fn debit_payload(address: &str) -> String {
    format!("Transfer from {address}: {BALANCE_UNIT} coins")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_format() {
        let t = Transfer::new("alice", "bob", 25);
        assert_eq!(t.payload(), "Transfer from alice to bob: 25 coins");
    }

    #[test]
    fn validate_rejects_missing_fields() {
        assert!(Transfer::new("alice", "bob", 1).validate().is_ok());
        assert!(Transfer::new("", "bob", 1).validate().is_err());
        assert!(Transfer::new("alice", "", 1).validate().is_err());
        assert!(matches!(
            Transfer::new("alice", "bob", 0).validate(),
            Err(ChainError::InvalidTransfer(_))
        ));
    }

    #[test]
    fn balance_patterns() {
        assert_eq!(credit_payload("alice"), "Transfer to alice: 10 coins");
        assert_eq!(debit_payload("alice"), "Transfer from alice: 10 coins");
    }

    #[test]
    fn transfer_serialization_example() {
        let t = Transfer::new("alice", "bob", 10);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"from":"alice","to":"bob","amount":10}"#);
    }
}
