//! Call and transaction option types.

use alloy::{
    dyn_abi::DynSolValue,
    eips::BlockId,
    primitives::{Address, U256},
};
use serde::{Deserialize, Serialize};

/// Argument shape for a contract method invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CallArgs {
    /// Invoke with no arguments.
    #[default]
    NoArgs,
    /// Spread each value as a positional argument.
    Positional(Vec<DynSolValue>),
    /// Pass one value as the sole argument, even when it is an array or tuple.
    Single(DynSolValue),
}

impl CallArgs {
    /// Flatten into the positional argument list handed to the ABI encoder.
    pub fn into_values(self) -> Vec<DynSolValue> {
        match self {
            CallArgs::NoArgs => Vec::new(),
            CallArgs::Positional(values) => values,
            CallArgs::Single(value) => vec![value],
        }
    }

    /// Number of positional arguments this shape produces.
    pub fn len(&self) -> usize {
        match self {
            CallArgs::NoArgs => 0,
            CallArgs::Positional(values) => values.len(),
            CallArgs::Single(_) => 1,
        }
    }

    /// Whether no arguments are passed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<DynSolValue>> for CallArgs {
    fn from(values: Vec<DynSolValue>) -> Self {
        CallArgs::Positional(values)
    }
}

impl From<DynSolValue> for CallArgs {
    fn from(value: DynSolValue) -> Self {
        CallArgs::Single(value)
    }
}

/// Options for a read-only call.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Sender address seen by the contract.
    pub from: Option<Address>,
    /// Value attached to the call, for simulating payable methods.
    pub value: Option<U256>,
    /// Block to execute against (default: latest).
    pub block: Option<BlockId>,
}

/// Options for a transaction submission.
#[derive(Debug, Clone)]
pub struct TxOptions {
    /// Wei transferred with the transaction.
    pub value: Option<U256>,
    /// Explicit gas limit, bypassing the cached default.
    pub gas_limit: Option<u64>,
    /// Explicit gas price in wei, bypassing the cached default.
    pub gas_price: Option<u128>,
    /// Reuse cached gas defaults (default: true).
    pub use_cache: bool,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self { value: None, gas_limit: None, gas_price: None, use_cache: true }
    }
}

/// Gas parameters cached by a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultOptions {
    /// Gas limit taken from the latest block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    /// Gas price in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
}
