//! In-memory fakes of the wallet and token capabilities.

use crate::capability::{Receipt, TokenContract, TransactionInfo, TransferEvent, WalletProvider};
use alloy_primitives::{Address, TxHash, B256, U256};
use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};
use tokio::sync::Notify;

const GWEI: u128 = 1_000_000_000;

/// Wallet whose answers are scripted by the test. Confirmation waits block
/// until [`FakeWallet::resolve`] or [`FakeWallet::fail_confirmation`] is
/// called for the hash.
#[derive(Clone)]
pub struct FakeWallet {
    inner: Arc<WalletInner>,
}

struct WalletInner {
    state: Mutex<WalletState>,
    notify: Notify,
    calls: AtomicUsize,
}

struct WalletState {
    available: bool,
    accounts: Result<Vec<Address>, String>,
    signer_error: Option<String>,
    gas_price: Result<u128, String>,
    unknown: HashSet<TxHash>,
    outcomes: HashMap<TxHash, Result<Receipt, String>>,
}

impl FakeWallet {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            inner: Arc::new(WalletInner {
                state: Mutex::new(WalletState {
                    available: true,
                    accounts: Ok(accounts),
                    signer_error: None,
                    gas_price: Ok(GWEI),
                    unknown: HashSet::new(),
                    outcomes: HashMap::new(),
                }),
                notify: Notify::new(),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    /// No wallet reachable.
    pub fn unavailable() -> Self {
        let wallet = Self::new(vec![]);
        wallet.lock().available = false;
        wallet
    }

    pub fn reject_accounts(&self, message: &str) {
        self.lock().accounts = Err(message.to_string());
    }

    pub fn reject_signing(&self, message: &str) {
        self.lock().signer_error = Some(message.to_string());
    }

    pub fn set_gas_price(&self, wei: u128) {
        self.lock().gas_price = Ok(wei);
    }

    pub fn fail_gas_price(&self, message: &str) {
        self.lock().gas_price = Err(message.to_string());
    }

    /// Make the node claim it never saw `hash`.
    pub fn forget_transaction(&self, hash: TxHash) {
        self.lock().unknown.insert(hash);
    }

    /// Include `hash` with the given execution status.
    pub fn resolve(&self, hash: TxHash, success: bool) {
        let receipt = Receipt {
            tx_hash: hash,
            success,
            block_number: Some(1),
            gas_used: 21_000,
            transfer: None,
        };
        self.lock().outcomes.insert(hash, Ok(receipt));
        self.inner.notify.notify_waiters();
    }

    /// Include `hash` successfully, emitting `transfer`.
    pub fn resolve_with_transfer(&self, hash: TxHash, transfer: TransferEvent) {
        let receipt = Receipt {
            tx_hash: hash,
            success: true,
            block_number: Some(1),
            gas_used: 51_000,
            transfer: Some(transfer),
        };
        self.lock().outcomes.insert(hash, Ok(receipt));
        self.inner.notify.notify_waiters();
    }

    /// Make waiting on `hash` error out.
    pub fn fail_confirmation(&self, hash: TxHash, message: &str) {
        self.lock().outcomes.insert(hash, Err(message.to_string()));
        self.inner.notify.notify_waiters();
    }

    /// Number of calls that would have reached the network.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, WalletState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn count(&self) {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl WalletProvider for FakeWallet {
    async fn is_available(&self) -> bool {
        self.lock().available
    }

    async fn request_accounts(&self) -> eyre::Result<Vec<Address>> {
        self.count();
        self.lock().accounts.clone().map_err(|e| eyre::eyre!(e))
    }

    async fn get_signer(&self) -> eyre::Result<Address> {
        self.count();
        let state = self.lock();
        if let Some(e) = &state.signer_error {
            eyre::bail!("{e}");
        }
        match &state.accounts {
            Ok(accounts) => accounts
                .first()
                .copied()
                .ok_or_else(|| eyre::eyre!("no signer available")),
            Err(e) => Err(eyre::eyre!("{e}")),
        }
    }

    async fn get_gas_price(&self) -> eyre::Result<u128> {
        self.count();
        self.lock().gas_price.clone().map_err(|e| eyre::eyre!(e))
    }

    async fn get_transaction(&self, hash: TxHash) -> eyre::Result<Option<TransactionInfo>> {
        self.count();
        if self.lock().unknown.contains(&hash) {
            return Ok(None);
        }
        Ok(Some(TransactionInfo {
            hash,
            block_number: None,
        }))
    }

    async fn await_confirmation(&self, hash: TxHash) -> eyre::Result<Receipt> {
        self.count();
        loop {
            let notified = self.inner.notify.notified();
            let outcome = self.lock().outcomes.get(&hash).cloned();
            if let Some(outcome) = outcome {
                return outcome.map_err(|e| eyre::eyre!(e));
            }
            notified.await;
        }
    }
}

/// Token with scripted reads and recorded transfers.
#[derive(Clone)]
pub struct FakeToken {
    inner: Arc<TokenInner>,
}

struct TokenInner {
    address: Address,
    state: Mutex<TokenState>,
    calls: AtomicUsize,
}

struct TokenState {
    symbol: String,
    decimals: u8,
    balances: HashMap<Address, U256>,
    read_error: Option<String>,
    transfer_error: Option<String>,
    next_hashes: VecDeque<TxHash>,
    transfers: Vec<TransferEvent>,
}

impl FakeToken {
    pub fn new(symbol: &str, decimals: u8) -> Self {
        Self {
            inner: Arc::new(TokenInner {
                address: Address::repeat_byte(0xda),
                state: Mutex::new(TokenState {
                    symbol: symbol.to_string(),
                    decimals,
                    balances: HashMap::new(),
                    read_error: None,
                    transfer_error: None,
                    next_hashes: VecDeque::new(),
                    transfers: Vec::new(),
                }),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn set_balance(&self, owner: Address, balance: U256) {
        self.lock().balances.insert(owner, balance);
    }

    pub fn fail_reads(&self, message: &str) {
        self.lock().read_error = Some(message.to_string());
    }

    pub fn fail_transfers(&self, message: &str) {
        self.lock().transfer_error = Some(message.to_string());
    }

    /// Hash returned by the next transfer.
    pub fn next_hash(&self, hash: TxHash) {
        self.lock().next_hashes.push_back(hash);
    }

    /// Transfers sent so far.
    pub fn transfers(&self) -> Vec<TransferEvent> {
        self.lock().transfers.clone()
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, TokenState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<R>(&self, f: impl FnOnce(&TokenState) -> R) -> eyre::Result<R> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        match &state.read_error {
            Some(e) => Err(eyre::eyre!("{e}")),
            None => Ok(f(&state)),
        }
    }
}

impl TokenContract for FakeToken {
    fn address(&self) -> Address {
        self.inner.address
    }

    async fn symbol(&self) -> eyre::Result<String> {
        self.read(|s| s.symbol.clone())
    }

    async fn decimals(&self) -> eyre::Result<u8> {
        self.read(|s| s.decimals)
    }

    async fn balance_of(&self, owner: Address) -> eyre::Result<U256> {
        self.read(|s| s.balances.get(&owner).copied().unwrap_or_default())
    }

    async fn transfer(&self, from: Address, to: Address, amount: U256) -> eyre::Result<TxHash> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        if let Some(e) = &state.transfer_error {
            eyre::bail!("{e}");
        }

        let sent = state.transfers.len() as u64 + 1;
        let hash = state
            .next_hashes
            .pop_front()
            .unwrap_or_else(|| B256::from(U256::from(sent)));
        state.transfers.push(TransferEvent {
            from,
            to,
            value: amount,
        });
        Ok(hash)
    }
}
