use alloy_primitives::{Address, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Log, TransactionReceipt};
use alloy_sol_types::SolEvent;
use binding::token::IERC20;
use std::time::Duration;
use tracing::debug;
use transfer::{Receipt, TransactionInfo, TransferEvent, WalletProvider};

/// Wallet backed by a JSON-RPC endpoint.
///
/// Without a local account the endpoint is treated as the wallet: accounts
/// come from `eth_requestAccounts` / `eth_accounts` and it signs what is sent.
/// With one, the provider is expected to sign for that account itself.
#[derive(Debug, Clone)]
pub struct RpcWallet<P> {
    provider: P,
    local_account: Option<Address>,
    poll_interval: Duration,
}

impl<P> RpcWallet<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, poll_interval: Duration) -> Self {
        Self {
            provider,
            local_account: None,
            poll_interval,
        }
    }

    pub const fn with_local_account(provider: P, account: Address, poll_interval: Duration) -> Self {
        Self {
            provider,
            local_account: Some(account),
            poll_interval,
        }
    }
}

impl<P> WalletProvider for RpcWallet<P>
where
    P: Provider + Clone,
{
    async fn is_available(&self) -> bool {
        match self.provider.get_chain_id().await {
            Ok(chain_id) => {
                debug!(chain_id, "Wallet endpoint reachable");
                true
            }
            Err(e) => {
                debug!(error = %e, "Wallet endpoint unreachable");
                false
            }
        }
    }

    async fn request_accounts(&self) -> eyre::Result<Vec<Address>> {
        if let Some(account) = self.local_account {
            return Ok(vec![account]);
        }
        let accounts: Vec<Address> = self
            .provider
            .raw_request("eth_requestAccounts".into(), ())
            .await?;
        Ok(accounts)
    }

    async fn get_signer(&self) -> eyre::Result<Address> {
        if let Some(account) = self.local_account {
            return Ok(account);
        }
        let accounts = self.provider.get_accounts().await?;
        accounts
            .first()
            .copied()
            .ok_or_else(|| eyre::eyre!("Wallet exposes no accounts"))
    }

    async fn get_gas_price(&self) -> eyre::Result<u128> {
        Ok(self.provider.get_gas_price().await?)
    }

    async fn get_transaction(&self, hash: TxHash) -> eyre::Result<Option<TransactionInfo>> {
        let transaction = self.provider.get_transaction_by_hash(hash).await?;
        Ok(transaction.map(|tx| TransactionInfo {
            hash,
            block_number: tx.block_number,
        }))
    }

    async fn await_confirmation(&self, hash: TxHash) -> eyre::Result<Receipt> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;
            if let Some(receipt) = self.provider.get_transaction_receipt(hash).await? {
                return Ok(convert_receipt(&receipt));
            }
            debug!(tx_hash = %hash, "Receipt not available yet");
        }
    }
}

fn convert_receipt(receipt: &TransactionReceipt) -> Receipt {
    Receipt {
        tx_hash: receipt.transaction_hash,
        success: receipt.status(),
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
        transfer: find_transfer(receipt.logs()),
    }
}

/// First ERC20 `Transfer` event among `logs`.
fn find_transfer(logs: &[Log]) -> Option<TransferEvent> {
    logs.iter().find_map(|log| {
        IERC20::Transfer::decode_log(&log.inner)
            .ok()
            .map(|event| TransferEvent {
                from: event.from,
                to: event.to,
                value: event.value,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{LogData, U256};

    fn rpc_log(data: LogData) -> Log {
        Log {
            inner: alloy_primitives::Log {
                address: Address::repeat_byte(0xda),
                data,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_find_transfer_decodes_event() {
        let event = IERC20::Transfer {
            from: Address::repeat_byte(1),
            to: Address::repeat_byte(2),
            value: U256::from(1_000u64),
        };
        let logs = vec![
            rpc_log(LogData::new_unchecked(vec![], Default::default())),
            rpc_log(event.encode_log_data()),
        ];

        assert_eq!(
            find_transfer(&logs),
            Some(TransferEvent {
                from: Address::repeat_byte(1),
                to: Address::repeat_byte(2),
                value: U256::from(1_000u64),
            })
        );
    }

    #[test]
    fn test_find_transfer_without_event() {
        assert_eq!(find_transfer(&[]), None);
    }
}
