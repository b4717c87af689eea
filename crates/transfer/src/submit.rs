use crate::{
    amount::parse_amount,
    capability::{TokenContract, WalletProvider},
    error::{provider_message, TransferError},
    state::AppState,
};
use alloy_primitives::{Address, U256};
use store::{TransactionRecord, TxStore};
use tracing::{error, info, warn};

/// Transfer as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferRequest {
    pub recipient: String,
    pub amount: String,
}

impl TransferRequest {
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }
}

/// Checked transfer: recipient address and amount in token base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub to: Address,
    pub amount: U256,
}

/// Check a request against the current state without touching the network.
pub fn validate_transfer(
    state: &AppState,
    request: &TransferRequest,
) -> Result<ValidatedTransfer, TransferError> {
    let binding = match (&state.session, &state.token) {
        (Some(_), Some(binding)) => binding,
        _ => {
            return Err(TransferError::Validation(
                "Connect a wallet before sending tokens".to_string(),
            ))
        }
    };

    if request.recipient.trim().is_empty() || request.amount.trim().is_empty() {
        return Err(TransferError::Validation(
            "Please fill in all fields".to_string(),
        ));
    }

    let to = config::parse_address(&request.recipient)
        .map_err(|e| TransferError::Validation(e.to_string()))?;
    let amount = parse_amount(&request.amount, binding.decimals)
        .map_err(|e| TransferError::Validation(e.to_string()))?;

    Ok(ValidatedTransfer { to, amount })
}

/// Send a transfer and record it as the pending transaction.
///
/// The new record replaces whatever was stored before, pending or not.
/// Nothing is recorded if sending fails.
pub async fn submit_transfer<W, T, S>(
    wallet: &W,
    token: &T,
    state: &AppState,
    request: &TransferRequest,
    store: &S,
) -> Result<TransactionRecord, TransferError>
where
    W: WalletProvider,
    T: TokenContract,
    S: TxStore,
{
    let transfer = validate_transfer(state, request)?;

    if let Some(previous) = state.tracked_hash().filter(|_| state.is_pending()) {
        warn!(%previous, "Replacing a transaction that is still pending");
    }

    let from = wallet
        .get_signer()
        .await
        .map_err(|e| TransferError::Submission(provider_message(&e)))?;

    let hash = token
        .transfer(from, transfer.to, transfer.amount)
        .await
        .map_err(|e| TransferError::Submission(provider_message(&e)))?;

    let record = TransactionRecord::pending(hash);
    if let Err(e) = store.save(&record) {
        // the transfer is already broadcast, keep tracking it in memory
        error!(tx_hash = %hash, error = %e, "Failed to persist pending transaction");
    }

    info!(
        tx_hash = %hash,
        %from,
        to = %transfer.to,
        amount = %request.amount.trim(),
        "Transfer submitted"
    );

    Ok(record)
}
