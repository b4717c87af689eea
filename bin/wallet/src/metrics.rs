//! Prometheus metrics for the wallet client.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;
use store::TxStatus;
use transfer::AppState;

/// Wallet metrics, registered with the global registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "wallet_transfers_submitted_total",
            "Total number of token transfers submitted"
        );
        describe_counter!(
            "wallet_transfers_confirmed_total",
            "Total number of transfers confirmed on chain"
        );
        describe_counter!(
            "wallet_transfers_failed_total",
            "Total number of transfers that reverted or could not be confirmed"
        );
        describe_histogram!(
            "wallet_confirmation_duration_seconds",
            "Time from monitoring start to a terminal status in seconds"
        );
        describe_gauge!(
            "wallet_token_balance",
            "Token balance of the connected account by symbol"
        );
    }

    pub fn record_submitted(&self) {
        counter!("wallet_transfers_submitted_total").increment(1);
    }

    /// Record a monitored transaction reaching `status` after `duration`.
    pub fn record_resolved(&self, status: TxStatus, duration: Duration) {
        match status {
            TxStatus::Confirmed => counter!("wallet_transfers_confirmed_total").increment(1),
            TxStatus::Failed => counter!("wallet_transfers_failed_total").increment(1),
            TxStatus::None | TxStatus::Pending => return,
        }
        histogram!("wallet_confirmation_duration_seconds").record(duration.as_secs_f64());
    }

    /// Update gauges from a state snapshot.
    pub fn observe(&self, state: &AppState) {
        if let Some(token) = &state.token {
            let balance = token.display_balance().parse::<f64>().unwrap_or(0.0);
            gauge!("wallet_token_balance", "symbol" => token.symbol.clone()).set(balance);
        }
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {e}"))?;

    Ok(())
}
