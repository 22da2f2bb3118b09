//! Ethereum interaction module.
//!
//! Contains the transport seam, the alloy-backed RPC client, and wallet handling.

pub mod client;
pub mod constants;
pub mod transport;
pub mod wallet;

pub use client::{HttpProvider, RpcTransport};
pub use constants::*;
pub use transport::{ChainTransport, ProviderSource};
pub use wallet::WalletManager;
