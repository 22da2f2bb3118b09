//! Chain metadata types.

use alloy::{
    network::ReceiptResponse,
    primitives::{Address, BlockHash, TxHash},
    rpc::types::{Block, TransactionReceipt},
};
use serde::{Deserialize, Serialize};

/// Summary of a block header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Block number.
    pub number: u64,
    /// Block hash.
    pub hash: BlockHash,
    /// Block timestamp (Unix seconds).
    pub timestamp: u64,
    /// Gas limit of the block.
    pub gas_limit: u64,
    /// Gas used by the block.
    pub gas_used: u64,
    /// Base fee per gas (post London only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<u64>,
}

impl From<&Block> for BlockInfo {
    fn from(block: &Block) -> Self {
        Self {
            number: block.header.number,
            hash: block.header.hash,
            timestamp: block.header.timestamp,
            gas_limit: block.header.gas_limit,
            gas_used: block.header.gas_used,
            base_fee_per_gas: block.header.base_fee_per_gas,
        }
    }
}

/// Summary of a mined transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub transaction_hash: TxHash,
    /// Number of the block that included the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Hash of the block that included the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<BlockHash>,
    /// Gas used by this transaction.
    pub gas_used: u64,
    /// Price paid per unit of gas in wei.
    pub effective_gas_price: u128,
    /// Whether execution succeeded (false on revert).
    pub status: bool,
    /// Sender address.
    pub from: Address,
    /// Recipient address (None for contract creation).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Address of the created contract, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
}

impl From<&TransactionReceipt> for TxReceipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            block_hash: receipt.block_hash,
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
            status: ReceiptResponse::status(receipt),
            from: receipt.from,
            to: receipt.to,
            contract_address: receipt.contract_address,
        }
    }
}
