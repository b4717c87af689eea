use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// Status of the tracked transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    #[default]
    None,
    Pending,
    Confirmed,
    Failed,
}

impl TxStatus {
    const fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Pending => 1,
            Self::Confirmed | Self::Failed => 2,
        }
    }

    /// Confirmed and failed never change again for the same hash.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    /// Whether moving to `next` keeps the status sequence a subsequence of
    /// `none -> pending -> {confirmed | failed}`.
    pub const fn can_advance_to(self, next: Self) -> bool {
        next.rank() > self.rank()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single transaction record kept in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: TxHash,
    pub status: TxStatus,
}

impl TransactionRecord {
    pub const fn pending(hash: TxHash) -> Self {
        Self {
            hash,
            status: TxStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_forward_transitions() {
        assert!(TxStatus::None.can_advance_to(TxStatus::Pending));
        assert!(TxStatus::Pending.can_advance_to(TxStatus::Confirmed));
        assert!(TxStatus::Pending.can_advance_to(TxStatus::Failed));
        // skipping pending still yields a subsequence
        assert!(TxStatus::None.can_advance_to(TxStatus::Failed));
    }

    #[test]
    fn test_terminal_states_never_move() {
        for terminal in [TxStatus::Confirmed, TxStatus::Failed] {
            assert!(terminal.is_terminal());
            for next in [
                TxStatus::None,
                TxStatus::Pending,
                TxStatus::Confirmed,
                TxStatus::Failed,
            ] {
                assert!(!terminal.can_advance_to(next));
            }
        }
        assert!(!TxStatus::Pending.can_advance_to(TxStatus::None));
        assert!(!TxStatus::Pending.can_advance_to(TxStatus::Pending));
    }

    #[test]
    fn test_record_wire_format() {
        let record = TransactionRecord::pending(b256!(
            "00000000000000000000000000000000000000000000000000000000000000ab"
        ));
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "hash": "0x00000000000000000000000000000000000000000000000000000000000000ab",
                "status": "pending",
            })
        );

        let parsed: TransactionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }
}
