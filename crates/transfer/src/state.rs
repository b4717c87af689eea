//! Client state as immutable snapshots.
//!
//! Nothing mutates an [`AppState`] in place: every change is an [`Event`] and
//! [`AppState::apply`] returns the next snapshot. The reducer enforces the
//! invariants of the flow:
//!
//! - a token binding only exists while an account is connected
//! - one transaction is tracked at a time and a new submission replaces it
//! - status only moves forward, and updates for a hash that is no longer the
//!   tracked one are dropped (last submission wins)

use crate::amount::format_amount;
use alloy_primitives::{Address, TxHash, U256};
use store::{TransactionRecord, TxStatus};

/// Connected wallet account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub account: Address,
}

/// Token contract read for the connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBinding {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    /// Raw balance from the last successful read
    pub balance: U256,
}

impl TokenBinding {
    /// Balance as a human decimal string, e.g. `"2.5"`.
    pub fn display_balance(&self) -> String {
        format_amount(self.balance, self.decimals).unwrap_or_else(|_| self.balance.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub session: Option<Session>,
    pub token: Option<TokenBinding>,
    pub transaction: Option<TransactionRecord>,
    /// Rough minutes until confirmation of the tracked transaction
    pub estimated_minutes: Option<u64>,
    /// Last error shown to the user
    pub error: Option<String>,
}

/// Something that happened to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connected(Session),
    TokenLoaded(TokenBinding),
    BalanceRefreshed { token: Address, balance: U256 },
    /// A transfer was sent by this context
    Submitted(TransactionRecord),
    /// Record found in storage on load
    Restored(TransactionRecord),
    Estimated { hash: TxHash, minutes: Option<u64> },
    StatusChanged { hash: TxHash, status: TxStatus },
    /// Waiting for `hash` failed with `message`
    ConfirmationFailed { hash: TxHash, message: String },
    /// Record written by another context
    External(TransactionRecord),
    Error(String),
}

impl AppState {
    /// Status of the tracked transaction, `None` if there is none.
    pub fn status(&self) -> TxStatus {
        self.transaction
            .map_or(TxStatus::None, |record| record.status)
    }

    pub fn is_pending(&self) -> bool {
        self.status() == TxStatus::Pending
    }

    pub fn tracked_hash(&self) -> Option<TxHash> {
        self.transaction.map(|record| record.hash)
    }

    /// Compute the snapshot that follows `event`.
    #[must_use]
    pub fn apply(&self, event: Event) -> Self {
        let mut next = self.clone();
        match event {
            Event::Connected(session) => {
                if self.session.map(|s| s.account) != Some(session.account) {
                    next.token = None;
                }
                next.session = Some(session);
                next.error = None;
            }
            Event::TokenLoaded(binding) => {
                if self.session.is_some() {
                    next.token = Some(binding);
                }
            }
            Event::BalanceRefreshed { token, balance } => {
                if let Some(binding) = next.token.as_mut().filter(|b| b.address == token) {
                    binding.balance = balance;
                }
            }
            Event::Submitted(record) => {
                next.transaction = Some(record);
                next.estimated_minutes = None;
                next.error = None;
            }
            Event::Restored(record) => {
                next.transaction = Some(record);
                next.estimated_minutes = None;
            }
            Event::Estimated { hash, minutes } => {
                if self.tracked_hash() == Some(hash) {
                    next.estimated_minutes = minutes;
                }
            }
            Event::StatusChanged { hash, status } => {
                next.advance(hash, status);
            }
            Event::ConfirmationFailed { hash, message } => {
                if next.advance(hash, TxStatus::Failed) {
                    next.error = Some(message);
                }
            }
            Event::External(record) => match self.transaction {
                Some(current) if current.hash == record.hash => {
                    next.advance(record.hash, record.status);
                }
                _ => {
                    next.transaction = Some(record);
                    next.estimated_minutes = None;
                }
            },
            Event::Error(message) => {
                next.error = Some(message);
            }
        }
        next
    }

    fn advance(&mut self, hash: TxHash, status: TxStatus) -> bool {
        match self.transaction.as_mut() {
            Some(record) if record.hash == hash && record.status.can_advance_to(status) => {
                record.status = status;
                true
            }
            _ => false,
        }
    }
}
