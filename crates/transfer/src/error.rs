use store::StoreError;
use thiserror::Error;

/// Errors surfaced to the user by the transfer flow.
///
/// Messages coming from the wallet or the chain are carried verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("No wallet provider available. Start a wallet or configure one to use this app")]
    ProviderUnavailable,

    /// Account access refused or the wallet errored while asked for accounts
    #[error("{0}")]
    ConnectionRejected(String),

    /// Token symbol, decimals or balance could not be read
    #[error("{0}")]
    ContractRead(String),

    /// Transfer input rejected before anything was sent
    #[error("{0}")]
    Validation(String),

    /// Signing or sending the transfer failed
    #[error("{0}")]
    Submission(String),

    /// Waiting for the transfer to be confirmed failed
    #[error("{0}")]
    Confirmation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Full message of a provider error, including its causes.
pub(crate) fn provider_message(e: &eyre::Report) -> String {
    format!("{e:#}")
}
