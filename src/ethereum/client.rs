//! Ethereum RPC client.

use alloy::{
    eips::{BlockId, BlockNumberOrTag},
    network::Ethereum,
    primitives::{Address, Bytes, TxHash},
    providers::{PendingTransactionBuilder, Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionRequest,
    transports::TransportError,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::{
    error::{Result, SessionError, USER_REJECTED_REQUEST},
    ethereum::ChainTransport,
    types::{BlockInfo, TxReceipt},
};

/// Type alias for the HTTP provider.
pub type HttpProvider = RootProvider<Ethereum>;

/// JSON-RPC transport over alloy's HTTP provider.
#[derive(Clone)]
pub struct RpcTransport {
    /// The underlying provider.
    provider: Arc<HttpProvider>,
    /// RPC URL for logging.
    rpc_url: String,
    /// Lazily initialized chain ID.
    chain_id: Arc<OnceCell<u64>>,
}

impl RpcTransport {
    /// Create a new transport.
    ///
    /// Note: This does NOT make any network calls.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|_| SessionError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        let provider = ProviderBuilder::new().connect_http(url).root().clone();

        tracing::info!(rpc_url = %rpc_url, "RPC transport created");

        Ok(Self {
            provider: Arc::new(provider),
            rpc_url: rpc_url.to_string(),
            chain_id: Arc::new(OnceCell::new()),
        })
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }

    /// Get the endpoint this transport talks to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

/// Map a rejected `eth_requestAccounts` to `AuthorizationDenied`.
fn authorization_error(err: TransportError) -> SessionError {
    match err.as_error_resp() {
        Some(payload) if payload.code == USER_REJECTED_REQUEST => {
            SessionError::AuthorizationDenied(payload.message.to_string())
        }
        _ => SessionError::Transport(err.to_string()),
    }
}

#[async_trait]
impl ChainTransport for RpcTransport {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let accounts: Vec<Address> = self
            .provider
            .client()
            .request_noparams("eth_requestAccounts")
            .await
            .map_err(authorization_error)?;
        Ok(accounts)
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        let accounts = self.provider.get_accounts().await?;
        Ok(accounts)
    }

    async fn network_id(&self) -> Result<u64> {
        let network_id = self.provider.get_net_version().await?;
        Ok(network_id)
    }

    async fn chain_id(&self) -> Result<u64> {
        self.chain_id
            .get_or_try_init(|| async {
                let chain_id = self.provider.get_chain_id().await?;
                tracing::info!(
                    chain_id = chain_id,
                    rpc_url = %self.rpc_url,
                    "Connected to Ethereum node"
                );
                Ok(chain_id)
            })
            .await
            .copied()
    }

    async fn block(&self, block: BlockNumberOrTag) -> Result<Option<BlockInfo>> {
        let block = self.provider.get_block_by_number(block).await?;
        Ok(block.as_ref().map(BlockInfo::from))
    }

    async fn block_number(&self) -> Result<u64> {
        let number = self.provider.get_block_number().await?;
        Ok(number)
    }

    async fn gas_price(&self) -> Result<u128> {
        let gas_price = self.provider.get_gas_price().await?;
        Ok(gas_price)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        let count = self.provider.get_transaction_count(address).await?;
        Ok(count)
    }

    async fn call(&self, tx: TransactionRequest, block: BlockId) -> Result<Bytes> {
        let result = self.provider.call(tx).block(block).await?;
        Ok(result)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<TxHash> {
        let pending = self.provider.send_raw_transaction(&raw).await?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        let receipt = PendingTransactionBuilder::new(self.provider.as_ref().clone(), tx_hash)
            .get_receipt()
            .await?;
        Ok(TxReceipt::from(&receipt))
    }
}
