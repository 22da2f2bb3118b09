//! Contract registration module.
//!
//! Contains compiled artifacts, the named contract registry, and ABI helpers.

pub mod abi;
pub mod artifact;
pub mod registry;

pub use artifact::{CompiledArtifact, NetworkDeployment};
pub use registry::{CallableContract, ContractRegistration, ContractRegistry, EncodedCall};
