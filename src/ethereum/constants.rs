//! Ethereum network and session constants.

// ============================================================================
// Endpoints
// ============================================================================

/// Local node endpoint used when no provider is configured.
pub const DEFAULT_LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

// ============================================================================
// Contract Registry
// ============================================================================

/// Name used when a contract is registered without one.
pub const DEFAULT_CONTRACT_NAME: &str = "default";

// ============================================================================
// Chain IDs
// ============================================================================

/// Default network ID of a Ganache development chain.
pub const GANACHE_NETWORK_ID: u64 = 5777;

/// Chain ID of a default Anvil/Hardhat development node.
pub const DEV_CHAIN_ID: u64 = 31337;
