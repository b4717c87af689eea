use crate::{
    capability::{Receipt, WalletProvider},
    error::{provider_message, TransferError},
    state::Event,
};
use alloy_primitives::TxHash;
use std::time::Duration;
use store::{TxStatus, TxStore};
use tracing::{debug, error, info, warn};

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Default upper bound on the confirmation wait.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOptions {
    /// Give up waiting after this long. `None` waits as long as the wallet does.
    pub confirmation_timeout: Option<Duration>,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            confirmation_timeout: Some(DEFAULT_CONFIRMATION_TIMEOUT),
        }
    }
}

/// How a monitored transaction ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOutcome {
    pub hash: TxHash,
    /// `Confirmed` or `Failed`
    pub status: TxStatus,
    pub receipt: Option<Receipt>,
    pub error: Option<TransferError>,
}

/// Display-only estimate: two minutes per gwei of gas price, rounded up.
/// `None` when the price is zero.
pub fn estimate_confirmation_minutes(gas_price_wei: u128) -> Option<u64> {
    if gas_price_wei == 0 {
        return None;
    }
    let minutes = gas_price_wei.saturating_mul(2).div_ceil(WEI_PER_GWEI);
    Some(u64::try_from(minutes).unwrap_or(u64::MAX))
}

/// Follow `hash` until it is confirmed or fails.
///
/// Every step is reported through `emit`. The terminal status is persisted
/// only if the store still tracks `hash`, so a transfer submitted later is
/// never overwritten by an older one resolving.
pub async fn monitor<W, S, F>(
    wallet: &W,
    store: &S,
    hash: TxHash,
    options: &MonitorOptions,
    mut emit: F,
) -> MonitorOutcome
where
    W: WalletProvider,
    S: TxStore,
    F: FnMut(Event),
{
    match wallet.get_gas_price().await {
        Ok(gas_price) => {
            let minutes = estimate_confirmation_minutes(gas_price);
            debug!(tx_hash = %hash, gas_price, ?minutes, "Estimated confirmation time");
            emit(Event::Estimated { hash, minutes });
        }
        Err(e) => warn!(tx_hash = %hash, error = %e, "Failed to fetch gas price"),
    }

    let (status, receipt, error) = match wait_for_receipt(wallet, hash, options).await {
        Ok(receipt) if receipt.success => (TxStatus::Confirmed, Some(receipt), None),
        Ok(receipt) => (TxStatus::Failed, Some(receipt), None),
        Err(e) => (TxStatus::Failed, None, Some(e)),
    };

    match store.advance(hash, status) {
        Ok(true) => {}
        Ok(false) => debug!(tx_hash = %hash, %status, "Stored record moved on, not persisting"),
        Err(e) => error!(tx_hash = %hash, error = %e, "Failed to persist transaction status"),
    }

    match &error {
        Some(e) => {
            warn!(tx_hash = %hash, error = %e, "Transaction failed");
            emit(Event::ConfirmationFailed {
                hash,
                message: e.to_string(),
            });
        }
        None => {
            let transfer = receipt.as_ref().and_then(|r| r.transfer);
            info!(
                tx_hash = %hash,
                %status,
                block_number = ?receipt.as_ref().and_then(|r| r.block_number),
                from = ?transfer.map(|t| t.from),
                to = ?transfer.map(|t| t.to),
                value = ?transfer.map(|t| t.value),
                "Transaction resolved"
            );
            emit(Event::StatusChanged { hash, status });
        }
    }

    MonitorOutcome {
        hash,
        status,
        receipt,
        error,
    }
}

async fn wait_for_receipt<W: WalletProvider>(
    wallet: &W,
    hash: TxHash,
    options: &MonitorOptions,
) -> Result<Receipt, TransferError> {
    let transaction = wallet
        .get_transaction(hash)
        .await
        .map_err(|e| TransferError::Confirmation(provider_message(&e)))?;
    if transaction.is_none() {
        return Err(TransferError::Confirmation(format!(
            "Transaction {hash} not found"
        )));
    }

    let wait = wallet.await_confirmation(hash);
    let result = match options.confirmation_timeout {
        Some(limit) => tokio::time::timeout(limit, wait).await.map_err(|_| {
            TransferError::Confirmation(format!(
                "Transaction {hash} not confirmed after {}s",
                limit.as_secs()
            ))
        })?,
        None => wait.await,
    };

    result.map_err(|e| TransferError::Confirmation(provider_message(&e)))
}
