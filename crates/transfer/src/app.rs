//! The transfer client: wallet connection, token read, transfer submission
//! and confirmation monitoring wired around one shared [`AppState`].
//!
//! Operations run on the caller's task; monitors run on their own spawned
//! tasks and may overlap with new submissions. All of them publish through
//! [`Event`]s folded into the state channel, so readers always see a
//! consistent snapshot.

use crate::{
    capability::{TokenContract, WalletProvider},
    connect::connect,
    error::TransferError,
    monitor::{monitor, MonitorOptions, MonitorOutcome},
    state::{AppState, Event, Session},
    submit::{submit_transfer, TransferRequest},
    token::{load_token, refresh_balance},
};
use alloy_primitives::TxHash;
use std::sync::Arc;
use store::{TransactionRecord, TxStatus, TxStore};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

pub struct TransferApp<W, T, S> {
    wallet: W,
    token: T,
    store: S,
    options: MonitorOptions,
    state: Arc<watch::Sender<AppState>>,
}

impl<W, T, S> TransferApp<W, T, S>
where
    W: WalletProvider + Clone + 'static,
    T: TokenContract + Clone + 'static,
    S: TxStore + Clone,
{
    pub fn new(wallet: W, token: T, store: S, options: MonitorOptions) -> Self {
        let (state, _) = watch::channel(AppState::default());
        Self {
            wallet,
            token,
            store,
            options,
            state: Arc::new(state),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Receive every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// Restore the stored record. A pending one is monitored again; no new
    /// transaction is ever sent from here.
    pub fn load(&self) -> Result<Option<JoinHandle<MonitorOutcome>>, TransferError> {
        let Some(record) = self.store.load()? else {
            debug!("No stored transaction");
            return Ok(None);
        };

        info!(tx_hash = %record.hash, status = %record.status, "Restored stored transaction");
        self.dispatch(Event::Restored(record));

        if record.status == TxStatus::Pending {
            return Ok(Some(self.spawn_monitor(record.hash)));
        }
        Ok(None)
    }

    /// Connect the wallet, then read the token for the connected account.
    pub async fn connect(&self) -> Result<Session, TransferError> {
        let session = connect(&self.wallet)
            .await
            .inspect_err(|e| self.dispatch(Event::Error(e.to_string())))?;
        self.dispatch(Event::Connected(session));

        let binding = load_token(&self.token, session.account)
            .await
            .inspect_err(|e| self.dispatch(Event::Error(e.to_string())))?;
        self.dispatch(Event::TokenLoaded(binding));

        Ok(session)
    }

    /// Submit a transfer and start monitoring it.
    pub async fn submit(
        &self,
        request: &TransferRequest,
    ) -> Result<(TransactionRecord, JoinHandle<MonitorOutcome>), TransferError> {
        let snapshot = self.state();
        let record = submit_transfer(&self.wallet, &self.token, &snapshot, request, &self.store)
            .await
            .inspect_err(|e| self.dispatch(Event::Error(e.to_string())))?;
        self.dispatch(Event::Submitted(record));

        Ok((record, self.spawn_monitor(record.hash)))
    }

    /// Follow changes other contexts make to the store until the returned
    /// guard is dropped.
    pub fn watch_storage(&self) -> StorageSync {
        let mut subscription = self.store.subscribe();
        let state = Arc::clone(&self.state);

        let task = tokio::spawn(async move {
            while let Some(record) = subscription.recv().await {
                info!(tx_hash = %record.hash, status = %record.status, "Transaction changed in another session");
                dispatch(&state, Event::External(record));
            }
        });

        StorageSync { task }
    }

    fn dispatch(&self, event: Event) {
        dispatch(&self.state, event);
    }

    fn spawn_monitor(&self, hash: TxHash) -> JoinHandle<MonitorOutcome> {
        let wallet = self.wallet.clone();
        let token = self.token.clone();
        let store = self.store.clone();
        let options = self.options.clone();
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let outcome = monitor(&wallet, &store, hash, &options, |event| {
                dispatch(&state, event)
            })
            .await;

            if outcome.status == TxStatus::Confirmed {
                refresh_after_confirmation(&token, &state).await;
            }
            outcome
        })
    }
}

/// Re-read the balance once a transfer lands so the display is not stale.
async fn refresh_after_confirmation<T: TokenContract>(token: &T, state: &watch::Sender<AppState>) {
    let snapshot = state.borrow().clone();
    let (Some(session), Some(binding)) = (snapshot.session, snapshot.token) else {
        return;
    };

    match refresh_balance(token, session.account).await {
        Ok(balance) => dispatch(
            state,
            Event::BalanceRefreshed {
                token: binding.address,
                balance,
            },
        ),
        Err(e) => warn!(error = %e, "Failed to refresh balance after confirmation"),
    }
}

fn dispatch(state: &watch::Sender<AppState>, event: Event) {
    state.send_modify(|current| *current = current.apply(event));
}

/// Scoped cross-context subscription. Dropping it stops the watcher.
#[derive(Debug)]
pub struct StorageSync {
    task: JoinHandle<()>,
}

impl Drop for StorageSync {
    fn drop(&mut self) {
        self.task.abort();
    }
}
