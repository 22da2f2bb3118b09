//! Common utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy::{
    dyn_abi::DynSolValue,
    eips::{BlockId, BlockNumberOrTag},
    json_abi::JsonAbi,
    primitives::{address, Address, BlockHash, Bytes, TxHash},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;

use contract_session::{
    BlockInfo, ChainTransport, ContractSession, Result, SessionError, TxReceipt, DEV_CHAIN_ID,
    GANACHE_NETWORK_ID,
};

/// First Hardhat/Anvil development account.
pub const DEV_ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Private key of [`DEV_ACCOUNT`] (DO NOT use in production!).
pub const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address the "Users" contract is registered at.
pub const USERS_ADDRESS: Address = address!("0000000000000000000000000000000000000abc");

/// Two-entry ABI: a view reader and a non-payable writer.
pub fn users_abi() -> JsonAbi {
    JsonAbi::parse([
        "function getUserById(uint256 id) external view returns (string name, uint8 age)",
        "function updateUser(string name) external",
    ])
    .unwrap()
}

/// ABI covering the three argument shapes and the mutability kinds.
pub fn shapes_abi() -> JsonAbi {
    JsonAbi::parse([
        "function ping() external view returns (bool)",
        "function pair(string a, string b) external view returns (string)",
        "function echo(string x) external view returns (string)",
        "function sum(uint256[] values) external pure returns (uint256)",
        "function deposit() external payable",
    ])
    .unwrap()
}

/// Encode return values the way a node would return them.
pub fn encode_output(values: Vec<DynSolValue>) -> Bytes {
    Bytes::from(DynSolValue::Tuple(values).abi_encode_params())
}

#[derive(Debug, Clone)]
struct MockState {
    network_id: u64,
    chain_id: u64,
    accounts: Vec<Address>,
    deny_authorization: bool,
    gas_limit: Option<u64>,
    gas_price: u128,
    nonce: u64,
    call_output: Bytes,
    call_error: Option<String>,
    broadcast_error: Option<String>,
    receipt_status: bool,
    method_counts: HashMap<&'static str, usize>,
    calls: Vec<TransactionRequest>,
    sent: Vec<TransactionRequest>,
    raw_sent: Vec<Bytes>,
}

/// In-memory node used in place of a JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                network_id: GANACHE_NETWORK_ID,
                chain_id: DEV_CHAIN_ID,
                accounts: vec![DEV_ACCOUNT],
                deny_authorization: false,
                gas_limit: Some(6_721_975),
                gas_price: 20_000_000_000,
                nonce: 7,
                call_output: Bytes::new(),
                call_error: None,
                broadcast_error: None,
                receipt_status: true,
                method_counts: HashMap::new(),
                calls: Vec::new(),
                sent: Vec::new(),
                raw_sent: Vec::new(),
            })),
        }
    }

    fn update(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state.lock().unwrap());
    }

    fn record(&self, method: &'static str) -> MockState {
        let mut state = self.state.lock().unwrap();
        *state.method_counts.entry(method).or_default() += 1;
        state.clone()
    }

    pub fn set_network_id(&self, network_id: u64) {
        self.update(|s| s.network_id = network_id);
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.update(|s| s.accounts = accounts);
    }

    pub fn deny_authorization(&self) {
        self.update(|s| s.deny_authorization = true);
    }

    pub fn set_gas_limit(&self, gas_limit: Option<u64>) {
        self.update(|s| s.gas_limit = gas_limit);
    }

    pub fn set_gas_price(&self, gas_price: u128) {
        self.update(|s| s.gas_price = gas_price);
    }

    pub fn set_call_output(&self, output: Bytes) {
        self.update(|s| s.call_output = output);
    }

    pub fn fail_calls(&self, reason: &str) {
        self.update(|s| s.call_error = Some(reason.to_string()));
    }

    pub fn fail_broadcast(&self, reason: &str) {
        self.update(|s| s.broadcast_error = Some(reason.to_string()));
    }

    pub fn revert_transactions(&self) {
        self.update(|s| s.receipt_status = false);
    }

    /// How many times `method` was invoked.
    pub fn count(&self, method: &str) -> usize {
        self.state.lock().unwrap().method_counts.get(method).copied().unwrap_or(0)
    }

    pub fn last_call(&self) -> Option<TransactionRequest> {
        self.state.lock().unwrap().calls.last().cloned()
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn raw_sent(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().raw_sent.clone()
    }

    /// A session bound to this transport.
    pub fn session(&self) -> ContractSession {
        ContractSession::with_transport(Arc::new(self.clone()))
    }
}

fn mined(tx_hash: TxHash, status: bool) -> TxReceipt {
    TxReceipt {
        transaction_hash: tx_hash,
        block_number: Some(42),
        block_hash: Some(BlockHash::with_last_byte(42)),
        gas_used: 52_000,
        effective_gas_price: 20_000_000_000,
        status,
        from: DEV_ACCOUNT,
        to: Some(USERS_ADDRESS),
        contract_address: None,
    }
}

#[async_trait]
impl ChainTransport for MockTransport {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let state = self.record("eth_requestAccounts");
        if state.deny_authorization {
            return Err(SessionError::AuthorizationDenied("User rejected the request.".into()));
        }
        Ok(state.accounts)
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.record("eth_accounts").accounts)
    }

    async fn network_id(&self) -> Result<u64> {
        Ok(self.record("net_version").network_id)
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.record("eth_chainId").chain_id)
    }

    async fn block(&self, block: BlockNumberOrTag) -> Result<Option<BlockInfo>> {
        let state = self.record("eth_getBlockByNumber");
        let number = block.as_number().unwrap_or(42);
        Ok(state.gas_limit.map(|gas_limit| BlockInfo {
            number,
            hash: BlockHash::with_last_byte(number as u8),
            timestamp: 1_700_000_000,
            gas_limit,
            gas_used: 0,
            base_fee_per_gas: None,
        }))
    }

    async fn block_number(&self) -> Result<u64> {
        self.record("eth_blockNumber");
        Ok(42)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(self.record("eth_gasPrice").gas_price)
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64> {
        Ok(self.record("eth_getTransactionCount").nonce)
    }

    async fn call(&self, tx: TransactionRequest, _block: BlockId) -> Result<Bytes> {
        let state = self.record("eth_call");
        self.update(|s| s.calls.push(tx));
        match state.call_error {
            Some(reason) => Err(SessionError::Transport(reason)),
            None => Ok(state.call_output),
        }
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let state = self.record("eth_sendTransaction");
        if let Some(reason) = state.broadcast_error {
            return Err(SessionError::Transport(reason));
        }
        self.update(|s| s.sent.push(tx));
        Ok(TxHash::with_last_byte(1))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<TxHash> {
        let state = self.record("eth_sendRawTransaction");
        if let Some(reason) = state.broadcast_error {
            return Err(SessionError::Transport(reason));
        }
        self.update(|s| s.raw_sent.push(raw));
        Ok(TxHash::with_last_byte(2))
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        let state = self.record("eth_getTransactionReceipt");
        Ok(mined(tx_hash, state.receipt_status))
    }
}
