//! Capabilities the transfer flow needs from the outside world.
//!
//! The wallet and the token contract are passed into every operation so that
//! backends can be swapped (JSON-RPC wallet, local key, test fakes).

use alloy_primitives::{Address, TxHash, U256};
use std::future::Future;

/// A transaction as seen by the wallet's node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionInfo {
    pub hash: TxHash,
    /// Set once the transaction is included
    pub block_number: Option<u64>,
}

/// Decoded ERC20 `Transfer` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

/// Receipt of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    /// Execution status; `false` means the transaction reverted
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// Token `Transfer` event emitted by the transaction, if any
    pub transfer: Option<TransferEvent>,
}

/// Wallet provider: account access, signing and chain queries.
pub trait WalletProvider: Send + Sync {
    /// Whether a wallet is reachable at all.
    fn is_available(&self) -> impl Future<Output = bool> + Send;

    /// Ask the wallet for account access. The first account is the primary one.
    fn request_accounts(&self) -> impl Future<Output = eyre::Result<Vec<Address>>> + Send;

    /// Account that signs outgoing transactions.
    fn get_signer(&self) -> impl Future<Output = eyre::Result<Address>> + Send;

    /// Current gas price in wei.
    fn get_gas_price(&self) -> impl Future<Output = eyre::Result<u128>> + Send;

    /// Look a transaction up by hash. `None` if the node does not know it.
    fn get_transaction(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = eyre::Result<Option<TransactionInfo>>> + Send;

    /// Wait until the transaction is included and return its receipt.
    ///
    /// Resolves only when the backend sees a receipt or gives up.
    fn await_confirmation(&self, hash: TxHash) -> impl Future<Output = eyre::Result<Receipt>> + Send;
}

/// ERC20 token contract bound to one address.
pub trait TokenContract: Send + Sync {
    fn address(&self) -> Address;

    fn symbol(&self) -> impl Future<Output = eyre::Result<String>> + Send;

    fn decimals(&self) -> impl Future<Output = eyre::Result<u8>> + Send;

    fn balance_of(&self, owner: Address) -> impl Future<Output = eyre::Result<U256>> + Send;

    /// Send `transfer(to, amount)` signed by `from`. Returns once the
    /// transaction is broadcast, not when it is confirmed.
    fn transfer(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> impl Future<Output = eyre::Result<TxHash>> + Send;
}
