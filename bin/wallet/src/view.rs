//! Plain-text rendering of the client state.

use alloy_primitives::Address;
use config::ExplorerConfig;
use store::TxStatus;
use transfer::AppState;

/// `0x1234...abcd` form of an address.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

const fn status_title(status: TxStatus) -> Option<&'static str> {
    match status {
        TxStatus::None => None,
        TxStatus::Pending => Some("Transaction Pending"),
        TxStatus::Confirmed => Some("Transaction Confirmed"),
        TxStatus::Failed => Some("Transaction Failed"),
    }
}

/// Render `state` the way the terminal shows it.
pub fn render(state: &AppState, explorer: &ExplorerConfig) -> String {
    let mut lines = Vec::new();

    match &state.session {
        None => lines.push("Wallet not connected".to_string()),
        Some(session) => {
            lines.push(format!("Connected Account: {}", short_address(&session.account)));
            match &state.token {
                Some(token) => {
                    lines.push(format!("Balance: {} {}", token.display_balance(), token.symbol))
                }
                None => lines.push("Balance: 0".to_string()),
            }
        }
    }

    if let Some(record) = state.transaction {
        if let Some(title) = status_title(record.status) {
            lines.push(title.to_string());
            if let Some(minutes) = state.estimated_minutes.filter(|_| state.is_pending()) {
                lines.push(format!("Estimated confirmation time: ~{minutes} minutes"));
            }
            lines.push(format!("View on explorer: {}", explorer.tx_url(&record.hash)));
        }
    }

    if let Some(error) = &state.error {
        lines.push(format!("Error: {error}"));
    }

    lines.join("\n")
}

/// Prints each distinct rendering once.
#[derive(Debug)]
pub struct Renderer {
    explorer: ExplorerConfig,
    last: Option<String>,
}

impl Renderer {
    pub const fn new(explorer: ExplorerConfig) -> Self {
        Self {
            explorer,
            last: None,
        }
    }

    /// Print `state` unless it renders the same as last time. Returns whether
    /// anything was printed.
    pub fn show(&mut self, state: &AppState) -> bool {
        let rendered = render(state, &self.explorer);
        if self.last.as_ref() == Some(&rendered) {
            return false;
        }
        println!("{rendered}\n");
        self.last = Some(rendered);
        true
    }
}
