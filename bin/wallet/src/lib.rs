//! Terminal front end for the token transfer client.
//!
//! Every invocation behaves like one page load: the stored transaction is
//! restored (and monitored again while pending), the wallet is connected and
//! one command runs against the resulting state.

pub mod config;
pub mod metrics;
pub mod view;

use crate::{metrics::Metrics, view::Renderer};
use std::{future::Future, time::Instant};
use store::TxStore;
use tokio::{sync::watch, task::JoinHandle};
use tracing::info;
use transfer::{
    AppState, MonitorOutcome, TokenContract, TransferApp, TransferRequest, WalletProvider,
};

/// Restore the stored transaction, then connect the wallet.
///
/// Returns the monitor resumed for a pending record. Restored state stays in
/// place when connecting fails.
pub async fn start<W, T, S>(
    app: &TransferApp<W, T, S>,
) -> eyre::Result<Option<JoinHandle<MonitorOutcome>>>
where
    W: WalletProvider + Clone + 'static,
    T: TokenContract + Clone + 'static,
    S: TxStore + Clone,
{
    let resumed = app.load()?;
    app.connect().await?;

    Ok(resumed)
}

/// Submit `request` and return its monitor.
///
/// Refuses while the tracked transaction is still pending unless `replace`
/// is set.
pub async fn send<W, T, S>(
    app: &TransferApp<W, T, S>,
    request: &TransferRequest,
    replace: bool,
    metrics: &Metrics,
) -> eyre::Result<JoinHandle<MonitorOutcome>>
where
    W: WalletProvider + Clone + 'static,
    T: TokenContract + Clone + 'static,
    S: TxStore + Clone,
{
    let state = app.state();
    if let Some(hash) = state.tracked_hash().filter(|_| state.is_pending() && !replace) {
        eyre::bail!("Transaction {hash} is still pending, pass --replace to send anyway");
    }

    let (record, monitor) = app.submit(request).await?;
    metrics.record_submitted();
    info!(tx_hash = %record.hash, "Waiting for confirmation");

    Ok(monitor)
}

/// Wait for a monitor and record how it ended.
pub async fn resolve(
    monitor: JoinHandle<MonitorOutcome>,
    started: Instant,
    metrics: &Metrics,
) -> eyre::Result<MonitorOutcome> {
    let outcome = monitor.await?;
    metrics.record_resolved(outcome.status, started.elapsed());

    Ok(outcome)
}

/// Show every state change until `until` completes, then show the final
/// state and return its output.
pub async fn follow<F: Future>(
    mut updates: watch::Receiver<AppState>,
    renderer: &mut Renderer,
    metrics: &Metrics,
    until: F,
) -> F::Output {
    tokio::pin!(until);
    loop {
        let state = updates.borrow_and_update().clone();
        metrics.observe(&state);
        renderer.show(&state);

        tokio::select! {
            output = &mut until => {
                let state = updates.borrow().clone();
                metrics.observe(&state);
                renderer.show(&state);
                return output;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return until.await;
                }
            }
        }
    }
}
