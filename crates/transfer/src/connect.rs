use crate::{
    capability::WalletProvider,
    error::{provider_message, TransferError},
    state::Session,
};
use tracing::{debug, info};

/// Request account access from the wallet and return the primary account.
///
/// No retry: a rejection is reported and the user reconnects.
pub async fn connect<W: WalletProvider>(wallet: &W) -> Result<Session, TransferError> {
    if !wallet.is_available().await {
        return Err(TransferError::ProviderUnavailable);
    }

    debug!("Requesting wallet accounts");
    let accounts = wallet
        .request_accounts()
        .await
        .map_err(|e| TransferError::ConnectionRejected(provider_message(&e)))?;

    let Some(&account) = accounts.first() else {
        return Err(TransferError::ConnectionRejected(
            "Wallet did not expose any account".to_string(),
        ));
    };

    info!(%account, "Wallet connected");
    Ok(Session { account })
}
