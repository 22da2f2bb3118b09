//! Transport seam between the session and a node.
//!
//! The session only consumes the fixed surface declared by [`ChainTransport`].
//! [`RpcTransport`](super::RpcTransport) implements it over alloy's HTTP
//! provider; wallet-backed or in-memory transports can be injected instead.

use std::fmt;
use std::sync::Arc;

use alloy::{
    eips::{BlockId, BlockNumberOrTag},
    primitives::{Address, Bytes, TxHash},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;

use crate::{
    error::Result,
    types::{BlockInfo, TxReceipt},
};

/// Node operations used by a contract session.
#[async_trait]
pub trait ChainTransport: Send + Sync {
    /// Ask the provider to authorize account access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Accounts already exposed by the provider (`eth_accounts`).
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Network identifier (`net_version`).
    async fn network_id(&self) -> Result<u64>;

    /// Chain identifier used for transaction signing (`eth_chainId`).
    async fn chain_id(&self) -> Result<u64>;

    /// Fetch a block header summary. `None` if the node does not know the block.
    async fn block(&self, block: BlockNumberOrTag) -> Result<Option<BlockInfo>>;

    /// Latest block number.
    async fn block_number(&self) -> Result<u64>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<u128>;

    /// Number of transactions sent from `address` (next nonce).
    async fn transaction_count(&self, address: Address) -> Result<u64>;

    /// Execute a read-only call at the given block.
    async fn call(&self, tx: TransactionRequest, block: BlockId) -> Result<Bytes>;

    /// Submit an unsigned transaction for the provider to sign and broadcast.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// Broadcast an already signed, EIP-2718 encoded transaction.
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<TxHash>;

    /// Wait until the transaction is mined and return its receipt.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt>;
}

/// Where a session obtains its transport from.
#[derive(Clone)]
pub enum ProviderSource {
    /// A wallet-backed transport supplied by the host application.
    Injected(Arc<dyn ChainTransport>),
    /// A plain JSON-RPC endpoint.
    Legacy(String),
    /// The local development endpoint.
    Fallback(String),
}

impl ProviderSource {
    /// Apply the preference order: injected, then legacy, then local fallback.
    pub fn detect(injected: Option<Arc<dyn ChainTransport>>, legacy_url: Option<&str>) -> Self {
        match (injected, legacy_url) {
            (Some(transport), _) => ProviderSource::Injected(transport),
            (None, Some(url)) => ProviderSource::Legacy(url.to_string()),
            (None, None) => ProviderSource::Fallback(super::DEFAULT_LOCAL_RPC_URL.to_string()),
        }
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderSource::Injected(_) => "injected",
            ProviderSource::Legacy(_) => "legacy",
            ProviderSource::Fallback(_) => "fallback",
        }
    }
}

impl fmt::Debug for ProviderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderSource::Injected(_) => f.write_str("Injected(..)"),
            ProviderSource::Legacy(url) => f.debug_tuple("Legacy").field(url).finish(),
            ProviderSource::Fallback(url) => f.debug_tuple("Fallback").field(url).finish(),
        }
    }
}
