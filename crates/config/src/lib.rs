//! Configuration types for the token transfer client.
//!
//! This crate provides:
//! - Network presets (mainnet, testnet)
//! - The token contract and block explorer for each network
//! - Validation of user supplied addresses

pub mod network;

pub use network::{
    parse_address, ConfigError, ExplorerConfig, NetworkConfig, NetworkConfigBuilder,
    NetworkType, TokenConfig,
};
