//! Named contract registry.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::{Function, JsonAbi},
    primitives::{Address, Bytes},
};
use serde::{Deserialize, Serialize};

use crate::{
    contracts::abi::function_for_arity,
    error::{Result, SessionError},
    types::CallArgs,
};

/// A contract registered under a logical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRegistration {
    /// Registry key.
    pub name: String,
    /// Deployed contract address.
    pub address: Address,
    /// Contract ABI.
    pub abi: JsonAbi,
}

/// Handle used to dispatch calls and transactions to a registered contract.
#[derive(Debug, Clone)]
pub struct CallableContract {
    name: String,
    address: Address,
    abi: Arc<JsonAbi>,
}

/// Calldata for one method invocation, with the ABI entry it was encoded for.
#[derive(Debug, Clone)]
pub struct EncodedCall<'a> {
    /// The function the arguments were encoded against.
    pub function: &'a Function,
    /// Selector followed by the ABI-encoded arguments.
    pub calldata: Bytes,
}

impl EncodedCall<'_> {
    /// Decode return data of this call.
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<DynSolValue>> {
        let values = self.function.abi_decode_output(data)?;
        Ok(values)
    }
}

impl CallableContract {
    fn new(registration: &ContractRegistration) -> Self {
        Self {
            name: registration.name.clone(),
            address: registration.address,
            abi: Arc::new(registration.abi.clone()),
        }
    }

    /// Registry name this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// ABI the handle encodes against.
    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Encode `method(args...)`.
    ///
    /// Picks the overload whose input count matches the arguments, falling
    /// back to the first declared one.
    pub fn encode(&self, method: &str, args: CallArgs) -> Result<EncodedCall<'_>> {
        let values = args.into_values();
        let function = function_for_arity(&self.abi, method, values.len()).ok_or_else(|| {
            SessionError::MethodNotFound { contract: self.name.clone(), method: method.to_string() }
        })?;

        let calldata = function.abi_encode_input(&values)?;
        Ok(EncodedCall { function, calldata: Bytes::from(calldata) })
    }
}

#[derive(Debug, Clone)]
struct RegisteredContract {
    registration: ContractRegistration,
    callable: CallableContract,
}

/// Contracts of a session, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    entries: HashMap<String, RegisteredContract>,
}

impl ContractRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a registration, replacing any previous entry of the same name.
    ///
    /// Returns the callable handle built for it.
    pub fn insert(&mut self, registration: ContractRegistration) -> &CallableContract {
        let callable = CallableContract::new(&registration);
        let entry = RegisteredContract { registration, callable };

        match self.entries.entry(entry.registration.name.clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(entry);
                &slot.into_mut().callable
            }
            Entry::Vacant(slot) => &slot.insert(entry).callable,
        }
    }

    /// Whether a contract is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove a registration.
    pub fn remove(&mut self, name: &str) -> Option<ContractRegistration> {
        self.entries.remove(name).map(|entry| entry.registration)
    }

    /// Registration stored under `name`.
    pub fn registration(&self, name: &str) -> Option<&ContractRegistration> {
        self.entries.get(name).map(|entry| &entry.registration)
    }

    /// Callable handle stored under `name`.
    pub fn callable(&self, name: &str) -> Option<&CallableContract> {
        self.entries.get(name).map(|entry| &entry.callable)
    }

    /// Callable handle, or `ContractNotRegistered`.
    pub fn require(&self, name: &str) -> Result<&CallableContract> {
        self.callable(name).ok_or_else(|| SessionError::ContractNotRegistered(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered contracts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no contract is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
