//! Ethereum JSON-RPC backends for the transfer capabilities.

mod token;
mod wallet;

pub use token::Erc20Token;
pub use wallet::RpcWallet;

use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
}

/// Provider for an endpoint that holds the accounts itself and signs
/// `eth_sendTransaction` requests.
pub fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{e}")))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Provider that signs locally with `private_key`.
pub fn create_wallet_provider(
    rpc_url: &str,
    private_key: &str,
) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{e}")))?;

    let signer = parse_private_key(private_key)?;
    let wallet = EthereumWallet::from(signer);

    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

    Ok(provider)
}

/// Address controlled by `private_key`.
pub fn signer_address(private_key: &str) -> Result<Address, ClientError> {
    Ok(parse_private_key(private_key)?.address())
}

fn parse_private_key(private_key: &str) -> Result<PrivateKeySigner, ClientError> {
    private_key
        .trim()
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // well-known development key
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            create_provider("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            create_wallet_provider("not a url", DEV_KEY),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(matches!(
            create_wallet_provider("http://localhost:8545", "0x1234"),
            Err(ClientError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_signer_address() {
        let address = signer_address(DEV_KEY).unwrap();
        assert_eq!(
            address,
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }
}
