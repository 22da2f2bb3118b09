//! Compiled contract artifacts.
//!
//! Parses the Truffle-style build output that maps network identifiers to
//! deployment addresses alongside the contract ABI.

use std::collections::BTreeMap;

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, TxHash},
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Deployment of a contract on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeployment {
    /// Deployed contract address.
    pub address: Address,
    /// Hash of the deployment transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<TxHash>,
}

/// A contract build artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledArtifact {
    /// Contract name as emitted by the compiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_name: Option<String>,
    /// Contract ABI.
    pub abi: JsonAbi,
    /// Deployments keyed by network identifier.
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkDeployment>,
}

impl CompiledArtifact {
    /// Parse an artifact from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(json)?;
        Ok(artifact)
    }

    /// Deployment for the given network, if the artifact has one.
    pub fn deployment(&self, network_id: u64) -> Option<&NetworkDeployment> {
        self.networks.get(&network_id.to_string())
    }

    /// Network identifiers this artifact was deployed to.
    pub fn network_ids(&self) -> Vec<String> {
        self.networks.keys().cloned().collect()
    }
}
