use config::{parse_address, NetworkConfig, NetworkConfigBuilder, NetworkType};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use transfer::MonitorOptions;

/// Wallet client configuration, read from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint of the wallet or node
    pub rpc_url: String,

    /// Network preset: `mainnet` (DAI) or `testnet` (Sepolia USDC)
    #[serde(default = "default_network")]
    pub network: NetworkType,

    /// Overrides the preset token contract
    #[serde(default)]
    pub token_address: Option<String>,

    /// JSON file holding the current transaction
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// Receipt and storage polling interval
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Give up on a confirmation after this many seconds, `0` waits forever
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
}

const fn default_network() -> NetworkType {
    NetworkType::Mainnet
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("wallet-state.json")
}

const fn default_poll_interval_secs() -> u64 {
    4
}

const fn default_confirmation_timeout_secs() -> u64 {
    30 * 60
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> eyre::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.poll_interval_secs == 0 {
            eyre::bail!("poll_interval_secs must be at least 1");
        }
        self.network_config()?;
        Ok(())
    }

    /// Network preset with the configured token override applied.
    pub fn network_config(&self) -> eyre::Result<NetworkConfig> {
        let builder = match self.network {
            NetworkType::Mainnet => NetworkConfigBuilder::mainnet(),
            NetworkType::Testnet => NetworkConfigBuilder::testnet(),
        };
        let builder = match &self.token_address {
            Some(address) => builder.token_address(
                parse_address(address).map_err(|e| eyre::eyre!("token_address: {e}"))?,
            ),
            None => builder,
        };

        Ok(builder.build())
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub const fn monitor_options(&self) -> MonitorOptions {
        MonitorOptions {
            confirmation_timeout: match self.confirmation_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}
