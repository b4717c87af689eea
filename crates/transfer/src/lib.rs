//! ERC20 transfer client core.
//!
//! The flow is: [`connect`] a wallet, [`load_token`] for the connected
//! account, [`submit_transfer`], then [`monitor`] the transaction until it is
//! confirmed or fails. [`TransferApp`] runs that flow over a shared
//! [`AppState`] and keeps the persisted transaction record in sync.
//!
//! The wallet and the token are reached only through the
//! [`WalletProvider`] and [`TokenContract`] capabilities.

pub mod amount;
pub mod app;
pub mod capability;
pub mod connect;
pub mod error;
pub mod monitor;
pub mod state;
pub mod submit;
pub mod token;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use amount::{format_amount, parse_amount, AmountError};
pub use app::{StorageSync, TransferApp};
pub use capability::{Receipt, TokenContract, TransactionInfo, TransferEvent, WalletProvider};
pub use connect::connect;
pub use error::TransferError;
pub use monitor::{
    estimate_confirmation_minutes, monitor, MonitorOptions, MonitorOutcome,
    DEFAULT_CONFIRMATION_TIMEOUT,
};
pub use state::{AppState, Event, Session, TokenBinding};
pub use submit::{submit_transfer, validate_transfer, TransferRequest, ValidatedTransfer};
pub use token::{load_token, refresh_balance};
