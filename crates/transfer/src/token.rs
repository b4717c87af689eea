use crate::{
    amount::format_amount,
    capability::TokenContract,
    error::{provider_message, TransferError},
    state::TokenBinding,
};
use alloy_primitives::{Address, U256};
use tracing::{debug, info};

/// Read symbol, decimals and the balance of `account` from the token.
pub async fn load_token<T: TokenContract>(
    token: &T,
    account: Address,
) -> Result<TokenBinding, TransferError> {
    let address = token.address();
    debug!(token = %address, %account, "Loading token");

    let symbol = token.symbol().await.map_err(read_error)?;
    let decimals = token.decimals().await.map_err(read_error)?;
    let balance = token.balance_of(account).await.map_err(read_error)?;

    // Decimals above what a uint256 can scale by are not a usable token.
    let balance_display = format_amount(balance, decimals)
        .map_err(|e| TransferError::ContractRead(e.to_string()))?;

    info!(token = %address, %symbol, decimals, balance = %balance_display, "Token loaded");

    Ok(TokenBinding {
        address,
        symbol,
        decimals,
        balance,
    })
}

/// Re-read only the balance of `account`.
pub async fn refresh_balance<T: TokenContract>(
    token: &T,
    account: Address,
) -> Result<U256, TransferError> {
    token.balance_of(account).await.map_err(read_error)
}

fn read_error(e: eyre::Report) -> TransferError {
    TransferError::ContractRead(provider_message(&e))
}
