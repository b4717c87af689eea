//! Network configuration for the token transfer client.
//!
//! Provides the token contract the client is bound to and the block explorer
//! used for transaction links on each supported network.

use alloy_primitives::{address, Address, TxHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Not a 20-byte hex address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Mixed-case address whose EIP-55 checksum does not match
    #[error("Address checksum mismatch: {0}")]
    ChecksumMismatch(String),

    #[error("Address must not be zero")]
    ZeroAddress,
}

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

/// Token contract the client reads and transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token contract address
    pub address: Address,
    /// Symbol the preset expects the contract to report. Informational only,
    /// the symbol shown to the user is always read from the contract.
    pub expected_symbol: String,
}

impl TokenConfig {
    /// DAI on Ethereum mainnet.
    pub fn dai() -> Self {
        Self {
            // https://etherscan.io/token/0x6B175474E89094C44Da98b954EedeAC495271d0F
            address: address!("0x6B175474E89094C44Da98b954EedeAC495271d0F"),
            expected_symbol: "DAI".to_string(),
        }
    }

    /// Circle USDC on Ethereum Sepolia.
    pub fn sepolia_usdc() -> Self {
        Self {
            // https://sepolia.etherscan.io/token/0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238
            address: address!("0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
            expected_symbol: "USDC".to_string(),
        }
    }
}

/// Block explorer used for display links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Explorer base url, without trailing slash
    pub base_url: String,
}

impl ExplorerConfig {
    pub fn etherscan() -> Self {
        Self {
            base_url: "https://etherscan.io".to_string(),
        }
    }

    pub fn sepolia_etherscan() -> Self {
        Self {
            base_url: "https://sepolia.etherscan.io".to_string(),
        }
    }

    /// Link to a transaction page. The hash is not checked against the
    /// explorer's expectations.
    pub fn tx_url(&self, hash: &TxHash) -> String {
        format!("{}/tx/{}", self.base_url.trim_end_matches('/'), hash)
    }
}

/// Complete network configuration for the transfer client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Chain ID
    pub chain_id: u64,
    /// Token the client is bound to
    pub token: TokenConfig,
    /// Explorer for transaction links
    pub explorer: ExplorerConfig,
}

impl NetworkConfig {
    /// Ethereum mainnet with DAI.
    pub fn mainnet() -> Self {
        NetworkConfigBuilder::mainnet().build()
    }

    /// Ethereum Sepolia with USDC.
    pub fn sepolia() -> Self {
        NetworkConfigBuilder::testnet().build()
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    network_type: NetworkType,
    chain_id: u64,
    token: TokenConfig,
    explorer: ExplorerConfig,
}

impl NetworkConfigBuilder {
    /// Start with mainnet defaults.
    pub fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            chain_id: 1,
            token: TokenConfig::dai(),
            explorer: ExplorerConfig::etherscan(),
        }
    }

    /// Start with testnet defaults.
    pub fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            chain_id: 11155111,
            token: TokenConfig::sepolia_usdc(),
            explorer: ExplorerConfig::sepolia_etherscan(),
        }
    }

    /// Override the token contract address.
    pub fn token_address(mut self, address: Address) -> Self {
        self.token.address = address;
        self
    }

    /// Override the explorer base url.
    pub fn explorer_url(mut self, base_url: impl Into<String>) -> Self {
        self.explorer.base_url = base_url.into();
        self
    }

    /// Build the network configuration.
    pub fn build(self) -> NetworkConfig {
        NetworkConfig {
            network_type: self.network_type,
            chain_id: self.chain_id,
            token: self.token,
            explorer: self.explorer,
        }
    }
}

/// Parse a user supplied address (token override, transfer recipient).
///
/// All-lowercase and all-uppercase hex is accepted as is; mixed case must carry
/// a valid EIP-55 checksum. The zero address is rejected.
pub fn parse_address(input: &str) -> Result<Address, ConfigError> {
    let trimmed = input.trim();
    let address: Address = trimmed
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(trimmed.to_string()))?;

    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && Address::parse_checksummed(format!("0x{hex}"), None).is_err() {
        return Err(ConfigError::ChecksumMismatch(trimmed.to_string()));
    }

    if address == Address::ZERO {
        return Err(ConfigError::ZeroAddress);
    }

    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_mainnet_config() {
        let config = NetworkConfig::mainnet();
        assert_eq!(config.chain_id, 1);
        assert_eq!(config.network_type, NetworkType::Mainnet);
        assert_eq!(config.token.expected_symbol, "DAI");
        assert_eq!(
            config.token.address,
            address!("6B175474E89094C44Da98b954EedeAC495271d0F")
        );
    }

    #[test]
    fn test_sepolia_config() {
        let config = NetworkConfig::sepolia();
        assert_eq!(config.chain_id, 11155111);
        assert_eq!(config.network_type, NetworkType::Testnet);
        assert_eq!(config.explorer.base_url, "https://sepolia.etherscan.io");
    }

    #[test]
    fn test_custom_config_builder() {
        let custom_token = address!("1111111111111111111111111111111111111111");

        let config = NetworkConfigBuilder::mainnet()
            .token_address(custom_token)
            .explorer_url("https://explorer.example/")
            .build();

        assert_eq!(config.token.address, custom_token);
        assert_eq!(config.network_type, NetworkType::Mainnet);

        let hash = b256!("00000000000000000000000000000000000000000000000000000000000000ab");
        assert_eq!(
            config.explorer.tx_url(&hash),
            "https://explorer.example/tx/0x00000000000000000000000000000000000000000000000000000000000000ab"
        );
    }

    #[test]
    fn test_etherscan_tx_url() {
        let hash = b256!("0000000000000000000000000000000000000000000000000000000000000001");
        let url = ExplorerConfig::etherscan().tx_url(&hash);
        assert!(url.starts_with("https://etherscan.io/tx/0x"));
        assert!(url.ends_with("01"));
    }

    #[test]
    fn test_parse_address_checksummed() {
        let parsed = parse_address("0x6B175474E89094C44Da98b954EedeAC495271d0F").unwrap();
        assert_eq!(parsed, TokenConfig::dai().address);
    }

    #[test]
    fn test_parse_address_checksummed_without_prefix() {
        let parsed = parse_address("6B175474E89094C44Da98b954EedeAC495271d0F").unwrap();
        assert_eq!(parsed, TokenConfig::dai().address);

        let result = parse_address("6B175474E89094C44Da98b954EedeAC495271d0f");
        assert!(matches!(result, Err(ConfigError::ChecksumMismatch(_))));
    }

    #[test]
    fn test_parse_address_lowercase() {
        let parsed = parse_address("0x6b175474e89094c44da98b954eedeac495271d0f").unwrap();
        assert_eq!(parsed, TokenConfig::dai().address);
    }

    #[test]
    fn test_parse_address_bad_checksum() {
        // last character case flipped
        let result = parse_address("0x6B175474E89094C44Da98b954EedeAC495271d0f");
        assert!(matches!(result, Err(ConfigError::ChecksumMismatch(_))));
    }

    #[test]
    fn test_parse_address_rejects_garbage_and_zero() {
        assert!(matches!(
            parse_address("not an address"),
            Err(ConfigError::InvalidAddress(_))
        ));
        assert_eq!(
            parse_address("0x0000000000000000000000000000000000000000"),
            Err(ConfigError::ZeroAddress)
        );
    }

    #[test]
    fn test_network_type_serde() {
        let parsed: NetworkType = serde_json::from_str("\"testnet\"").unwrap();
        assert_eq!(parsed, NetworkType::Testnet);
    }
}
