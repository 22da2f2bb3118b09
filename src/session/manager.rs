//! Contract session manager.

use std::sync::Arc;

use alloy::{
    dyn_abi::DynSolValue,
    eips::{BlockId, BlockNumberOrTag},
    json_abi::{JsonAbi, StateMutability},
    network::TransactionBuilder,
    primitives::Address,
    rpc::types::TransactionRequest,
};
use tokio::sync::{OnceCell, RwLock};

use crate::{
    contracts::{
        abi::{coerce_inputs, function_for_arity, is_read_only, method_mutability_matches},
        CallableContract, CompiledArtifact, ContractRegistration, ContractRegistry,
    },
    error::{Result, SessionError},
    ethereum::{ChainTransport, ProviderSource, RpcTransport, WalletManager},
    session::{
        events::{EventEmitter, EventKind, TxEvent},
        transaction::{TransactionHandle, TxPayload},
    },
    types::{BlockInfo, CallArgs, CallOptions, DefaultOptions, TxOptions},
};

/// Session over one node connection and a set of named contracts.
///
/// Registration and listener setup take `&mut self`; queries, calls and
/// submissions take `&self` and share the gas and account caches.
pub struct ContractSession {
    transport: Option<Arc<dyn ChainTransport>>,
    contracts: ContractRegistry,
    defaults: RwLock<DefaultOptions>,
    account: OnceCell<Address>,
    events: EventEmitter,
}

impl Default for ContractSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractSession {
    /// Create a session that is not yet connected.
    pub fn new() -> Self {
        Self {
            transport: None,
            contracts: ContractRegistry::new(),
            defaults: RwLock::new(DefaultOptions::default()),
            account: OnceCell::new(),
            events: EventEmitter::new(),
        }
    }

    /// Create a session already bound to a transport, skipping authorization.
    pub fn with_transport(transport: Arc<dyn ChainTransport>) -> Self {
        let mut session = Self::new();
        session.transport = Some(transport);
        session
    }

    // ========================================================================
    // Transport bootstrap
    // ========================================================================

    /// Connect to a node.
    ///
    /// An injected provider is asked for account authorization first; a refusal
    /// fails with `AuthorizationDenied`. Connecting resets the account and gas
    /// caches.
    pub async fn connect(&mut self, source: ProviderSource) -> Result<()> {
        tracing::info!(source = source.kind(), "Connecting session");

        let (transport, account) = match source {
            ProviderSource::Injected(transport) => {
                let accounts = transport.request_accounts().await?;
                let account = accounts.first().copied().ok_or_else(|| {
                    SessionError::AuthorizationDenied("Provider authorized no accounts".into())
                })?;
                tracing::info!(account = %account, "Account access granted");
                (transport, Some(account))
            }
            ProviderSource::Legacy(url) | ProviderSource::Fallback(url) => {
                let transport: Arc<dyn ChainTransport> = Arc::new(RpcTransport::new(&url)?);
                (transport, None)
            }
        };

        self.transport = Some(transport);
        self.account = OnceCell::new_with(account);
        *self.defaults.get_mut() = DefaultOptions::default();
        Ok(())
    }

    /// Whether `connect` has completed.
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// The connected transport.
    pub fn transport(&self) -> Result<&Arc<dyn ChainTransport>> {
        self.transport.as_ref().ok_or(SessionError::NotConnected)
    }

    // ========================================================================
    // Contract registration
    // ========================================================================

    /// Register the deployment of `artifact` on the connected network.
    pub async fn register_from_artifact(
        &mut self,
        artifact: &CompiledArtifact,
        name: &str,
    ) -> Result<&CallableContract> {
        let network_id = self.resolve_network_id().await?;
        let deployment = artifact.deployment(network_id).ok_or_else(|| {
            SessionError::NetworkMismatch { network_id, available: artifact.network_ids() }
        })?;

        Ok(self.register(deployment.address, artifact.abi.clone(), name))
    }

    /// Register a contract under `name`, replacing any previous registration.
    pub fn register(&mut self, address: Address, abi: JsonAbi, name: &str) -> &CallableContract {
        if self.contracts.contains(name) {
            tracing::debug!(contract = %name, "Replacing existing registration");
        }
        tracing::info!(contract = %name, address = %address, "Contract registered");

        let registration = ContractRegistration { name: name.to_string(), address, abi };
        self.contracts.insert(registration)
    }

    /// Remove the registration stored under `name`.
    pub fn unregister(&mut self, name: &str) -> Option<ContractRegistration> {
        self.contracts.remove(name)
    }

    /// Callable handle for `name`.
    pub fn callable(&self, name: &str) -> Option<&CallableContract> {
        self.contracts.callable(name)
    }

    /// Registration stored under `name`.
    pub fn registration(&self, name: &str) -> Option<&ContractRegistration> {
        self.contracts.registration(name)
    }

    /// Names of registered contracts, sorted.
    pub fn contract_names(&self) -> Vec<String> {
        self.contracts.names()
    }

    // ========================================================================
    // Method introspection
    // ========================================================================

    /// Whether `method` of contract `name` declares `kind`.
    ///
    /// `None` if the contract is unknown or its ABI is empty, `Some(false)` if
    /// the method does not exist. Only the first overload is examined.
    pub fn abi_method_has_mutability(
        &self,
        kind: StateMutability,
        method: &str,
        name: &str,
    ) -> Option<bool> {
        let registration = self.contracts.registration(name)?;
        method_mutability_matches(&registration.abi, method, |m| m == kind)
    }

    /// View or pure.
    pub fn is_read_only_method(&self, method: &str, name: &str) -> Option<bool> {
        let registration = self.contracts.registration(name)?;
        method_mutability_matches(&registration.abi, method, is_read_only)
    }

    /// Accepts value transfer.
    pub fn is_payable_method(&self, method: &str, name: &str) -> Option<bool> {
        self.abi_method_has_mutability(StateMutability::Payable, method, name)
    }

    /// State-changing without value transfer.
    pub fn is_non_payable_method(&self, method: &str, name: &str) -> Option<bool> {
        self.abi_method_has_mutability(StateMutability::NonPayable, method, name)
    }

    /// Parse string arguments for `method` according to its ABI input types.
    pub fn coerce_args(&self, method: &str, raw: &[&str], name: &str) -> Result<CallArgs> {
        let registration = self
            .contracts
            .registration(name)
            .ok_or_else(|| SessionError::ContractNotRegistered(name.to_string()))?;
        let function = function_for_arity(&registration.abi, method, raw.len()).ok_or_else(|| {
            SessionError::MethodNotFound { contract: name.to_string(), method: method.to_string() }
        })?;

        Ok(CallArgs::Positional(coerce_inputs(function, raw)?))
    }

    // ========================================================================
    // Read-only invocation
    // ========================================================================

    /// Invoke a read-only method and decode its outputs.
    pub async fn call(
        &self,
        method: &str,
        args: CallArgs,
        name: &str,
        options: CallOptions,
    ) -> Result<Vec<DynSolValue>> {
        let callable = self.contracts.require(name)?;
        let transport = self.transport()?;
        let encoded = callable.encode(method, args)?;

        let mut tx = TransactionRequest::default()
            .with_to(callable.address())
            .with_input(encoded.calldata.clone());
        if let Some(from) = options.from {
            tx = tx.with_from(from);
        }
        if let Some(value) = options.value {
            tx = tx.with_value(value);
        }
        let block = options.block.unwrap_or(BlockId::latest());

        tracing::debug!(contract = %name, method = %method, "Calling contract method");

        let output = transport
            .call(tx, block)
            .await
            .map_err(|e| SessionError::ContractCall(format!("{name}.{method}: {e}")))?;

        encoded.decode_output(&output)
    }

    // ========================================================================
    // Transaction submission
    // ========================================================================

    /// Prepare `method(args...)` as a transaction from `from`.
    ///
    /// With a private key the transaction is signed locally; without one the
    /// connected provider signs it. Nothing is broadcast until
    /// [`TransactionHandle::send`] is awaited.
    pub async fn submit_transaction(
        &self,
        from: Address,
        private_key: Option<&str>,
        method: &str,
        args: CallArgs,
        options: TxOptions,
        name: &str,
    ) -> Result<TransactionHandle<'_>> {
        let callable = self.contracts.require(name)?;
        let transport = self.transport()?.clone();
        let encoded = callable.encode(method, args)?;

        let tx = self
            .base_transaction(from, &options)
            .await?
            .with_to(callable.address())
            .with_input(encoded.calldata);

        let payload = match private_key {
            Some(key) => {
                let wallet = WalletManager::from_private_key(key)?;
                if wallet.address() != from {
                    return Err(SessionError::Wallet(format!(
                        "Private key belongs to {}, not {}",
                        wallet.address(),
                        from
                    )));
                }
                let chain_id = transport.chain_id().await?;
                TxPayload::Signed(wallet.sign_transaction(tx.with_chain_id(chain_id)).await?)
            }
            None => TxPayload::Unsigned(tx),
        };

        tracing::debug!(contract = %name, method = %method, from = %from, "Transaction prepared");

        Ok(TransactionHandle::new(transport, &self.events, name, method, payload))
    }

    /// Nonce, gas price, gas limit and value for a transaction from `from`.
    async fn base_transaction(
        &self,
        from: Address,
        options: &TxOptions,
    ) -> Result<TransactionRequest> {
        let transport = self.transport()?;
        let nonce = transport.transaction_count(from).await?;

        let gas_price = match options.gas_price {
            Some(price) => price,
            None => self.resolve_gas_price(options.use_cache).await?,
        };
        let gas_limit = match options.gas_limit {
            Some(limit) => Some(limit),
            None => self.resolve_gas_limit(options.use_cache).await?,
        };

        let mut tx = TransactionRequest::default()
            .with_from(from)
            .with_nonce(nonce)
            .with_gas_price(gas_price);
        if let Some(limit) = gas_limit {
            tx = tx.with_gas_limit(limit);
        }
        if let Some(value) = options.value {
            tx = tx.with_value(value);
        }
        Ok(tx)
    }

    // ========================================================================
    // Chain metadata
    // ========================================================================

    /// Network identifier of the connected node.
    pub async fn resolve_network_id(&self) -> Result<u64> {
        self.transport()?.network_id().await
    }

    /// Chain identifier of the connected node.
    pub async fn resolve_chain_id(&self) -> Result<u64> {
        self.transport()?.chain_id().await
    }

    /// Gas limit of the latest block, cached.
    ///
    /// Returns `None` when the node cannot return the latest block.
    pub async fn resolve_gas_limit(&self, use_cache: bool) -> Result<Option<u64>> {
        if use_cache {
            if let Some(limit) = self.defaults.read().await.gas_limit {
                return Ok(Some(limit));
            }
        }

        let Some(block) = self.transport()?.block(BlockNumberOrTag::Latest).await? else {
            tracing::warn!("Latest block unavailable, gas limit unknown");
            return Ok(None);
        };

        self.defaults.write().await.gas_limit = Some(block.gas_limit);
        tracing::debug!(gas_limit = block.gas_limit, "Gas limit refreshed");
        Ok(Some(block.gas_limit))
    }

    /// Current gas price in wei, cached.
    pub async fn resolve_gas_price(&self, use_cache: bool) -> Result<u128> {
        if use_cache {
            if let Some(price) = self.defaults.read().await.gas_price {
                return Ok(price);
            }
        }

        let price = self.transport()?.gas_price().await?;
        self.defaults.write().await.gas_price = Some(price);
        tracing::debug!(gas_price = price, "Gas price refreshed");
        Ok(price)
    }

    /// Currently cached gas defaults.
    pub async fn default_options(&self) -> DefaultOptions {
        *self.defaults.read().await
    }

    /// Drop cached gas defaults.
    pub async fn clear_default_options(&self) {
        *self.defaults.write().await = DefaultOptions::default();
    }

    /// Block by number or tag.
    pub async fn get_block(&self, block: BlockNumberOrTag) -> Result<Option<BlockInfo>> {
        self.transport()?.block(block).await
    }

    /// Latest block number.
    pub async fn get_block_number(&self) -> Result<u64> {
        self.transport()?.block_number().await
    }

    /// First account exposed by the provider, cached.
    pub async fn resolve_user_account(&self) -> Result<Address> {
        let transport = self.transport()?;
        self.account
            .get_or_try_init(|| async {
                let accounts = transport.accounts().await?;
                let account = accounts.first().copied().ok_or(SessionError::NoAccounts)?;
                tracing::info!(account = %account, "User account resolved");
                Ok(account)
            })
            .await
            .copied()
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Register a session-wide lifecycle callback; the first one per kind wins.
    pub fn on<F>(&mut self, kind: EventKind, callback: F) -> &mut Self
    where
        F: Fn(&TxEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, callback);
        self
    }

    /// Deliver `event` to the session-wide callback for its kind.
    pub fn emit(&self, event: &TxEvent) {
        self.events.emit(event);
    }

    /// Session-wide callback table.
    pub fn events(&self) -> &EventEmitter {
        &self.events
    }
}

impl std::fmt::Debug for ContractSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractSession")
            .field("connected", &self.is_connected())
            .field("contracts", &self.contracts.names())
            .field("account", &self.account.get())
            .field("events", &self.events)
            .finish()
    }
}
