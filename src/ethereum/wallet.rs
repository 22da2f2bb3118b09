//! Local key handling for self-signed transactions.

use alloy::{
    eips::eip2718::Encodable2718,
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};

use crate::error::{Result, SessionError};

/// Wallet manager for transaction signing.
#[derive(Clone)]
pub struct WalletManager {
    /// The local signer.
    signer: PrivateKeySigner,
    /// Wallet address.
    address: Address,
}

impl WalletManager {
    /// Create a wallet manager from a private key string.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        // Remove 0x prefix if present
        let key = private_key.strip_prefix("0x").unwrap_or(private_key);

        let signer: PrivateKeySigner =
            key.parse().map_err(|e: alloy::signers::local::LocalSignerError| {
                SessionError::Wallet(e.to_string())
            })?;

        let address = signer.address();

        tracing::debug!(address = %address, "Signing key loaded");

        Ok(Self { signer, address })
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a fully populated request and return the EIP-2718 encoded envelope.
    ///
    /// The request must carry nonce, gas limit, gas price and chain id.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes> {
        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = tx
            .with_from(self.address)
            .build(&wallet)
            .await
            .map_err(|e| SessionError::Transaction(format!("Failed to sign transaction: {e}")))?;
        Ok(Bytes::from(envelope.encoded_2718()))
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}
