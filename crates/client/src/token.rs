use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use binding::token::IERC20;
use tracing::debug;
use transfer::TokenContract;

/// ERC20 contract reached through `provider`.
#[derive(Debug, Clone)]
pub struct Erc20Token<P> {
    provider: P,
    address: Address,
}

impl<P> Erc20Token<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }
}

impl<P> TokenContract for Erc20Token<P>
where
    P: Provider + Clone,
{
    fn address(&self) -> Address {
        self.address
    }

    async fn symbol(&self) -> eyre::Result<String> {
        let contract = IERC20::new(self.address, &self.provider);
        Ok(contract.symbol().call().await?)
    }

    async fn decimals(&self) -> eyre::Result<u8> {
        let contract = IERC20::new(self.address, &self.provider);
        Ok(contract.decimals().call().await?)
    }

    async fn balance_of(&self, owner: Address) -> eyre::Result<U256> {
        debug!(token = %self.address, %owner, "Querying token balance");

        let contract = IERC20::new(self.address, &self.provider);
        Ok(contract.balanceOf(owner).call().await?)
    }

    async fn transfer(&self, from: Address, to: Address, amount: U256) -> eyre::Result<TxHash> {
        let contract = IERC20::new(self.address, &self.provider);

        let pending = contract.transfer(to, amount).from(from).send().await?;

        Ok(*pending.tx_hash())
    }
}
