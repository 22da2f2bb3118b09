//! Error types and handling module.
//!
//! Defines all session-level error types and conversions from the alloy stack.

use thiserror::Error;

/// Provider error code returned when the user rejects an authorization request.
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// Session-wide error type.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport errors.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The wallet provider refused account access.
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    /// An operation needed a transport before `connect` was called.
    #[error("Session is not connected to a node")]
    NotConnected,

    /// The compiled artifact has no deployment on the connected network.
    #[error("Contract not deployed on network {network_id} (artifact networks: {available:?})")]
    NetworkMismatch { network_id: u64, available: Vec<String> },

    /// No contract registered under the given name.
    #[error("Contract not registered: {0}")]
    ContractNotRegistered(String),

    /// The contract ABI has no function with the given name.
    #[error("Method `{method}` not found in ABI of contract `{contract}`")]
    MethodNotFound { contract: String, method: String },

    /// ABI encoding or decoding failed.
    #[error("ABI error: {0}")]
    Abi(String),

    /// A read-only contract call failed or reverted.
    #[error("Contract call failed: {0}")]
    ContractCall(String),

    /// Building, signing or broadcasting a transaction failed.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Pending transaction error.
    #[error("Pending transaction error: {0}")]
    PendingTransaction(String),

    /// Wallet-related errors.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Malformed compiled contract artifact.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider exposes no accounts.
    #[error("No accounts available from provider")]
    NoAccounts,
}

impl From<alloy::transports::TransportError> for SessionError {
    fn from(err: alloy::transports::TransportError) -> Self {
        SessionError::Transport(err.to_string())
    }
}

impl From<alloy::dyn_abi::Error> for SessionError {
    fn from(err: alloy::dyn_abi::Error) -> Self {
        SessionError::Abi(err.to_string())
    }
}

impl From<alloy::signers::local::LocalSignerError> for SessionError {
    fn from(err: alloy::signers::local::LocalSignerError) -> Self {
        SessionError::Wallet(err.to_string())
    }
}

impl From<alloy::hex::FromHexError> for SessionError {
    fn from(err: alloy::hex::FromHexError) -> Self {
        SessionError::Parse(err.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for SessionError {
    fn from(err: alloy::providers::PendingTransactionError) -> Self {
        SessionError::PendingTransaction(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Artifact(err.to_string())
    }
}

impl SessionError {
    /// Whether the error reports a failed precondition rather than a node failure.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            SessionError::NotConnected
                | SessionError::ContractNotRegistered(_)
                | SessionError::MethodNotFound { .. }
                | SessionError::NetworkMismatch { .. }
        )
    }
}

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_display() {
        let err = SessionError::Config("Missing RPC URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: Missing RPC URL");
    }

    #[test]
    fn test_not_connected_display() {
        assert_eq!(SessionError::NotConnected.to_string(), "Session is not connected to a node");
    }

    #[test]
    fn test_authorization_denied_display() {
        let err = SessionError::AuthorizationDenied("User rejected the request".to_string());
        assert_eq!(err.to_string(), "Authorization denied: User rejected the request");
    }

    #[test]
    fn test_network_mismatch_display() {
        let err = SessionError::NetworkMismatch {
            network_id: 5,
            available: vec!["1".to_string(), "5777".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("network 5"));
        assert!(msg.contains("5777"));
    }

    #[test]
    fn test_contract_not_registered_display() {
        let err = SessionError::ContractNotRegistered("Users".to_string());
        assert_eq!(err.to_string(), "Contract not registered: Users");
    }

    #[test]
    fn test_method_not_found_display() {
        let err = SessionError::MethodNotFound {
            contract: "Users".to_string(),
            method: "deleteUser".to_string(),
        };
        assert_eq!(err.to_string(), "Method `deleteUser` not found in ABI of contract `Users`");
    }

    #[test]
    fn test_contract_call_display() {
        let err = SessionError::ContractCall("execution reverted".to_string());
        assert_eq!(err.to_string(), "Contract call failed: execution reverted");
    }

    #[test]
    fn test_wallet_display() {
        let err = SessionError::Wallet("Invalid private key".to_string());
        assert_eq!(err.to_string(), "Wallet error: Invalid private key");
    }

    #[test]
    fn test_usage_errors() {
        assert!(SessionError::NotConnected.is_usage_error());
        assert!(SessionError::ContractNotRegistered("x".into()).is_usage_error());
        assert!(!SessionError::Transport("down".into()).is_usage_error());
        assert!(!SessionError::NoAccounts.is_usage_error());
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SessionError = parse_err.into();
        assert!(matches!(err, SessionError::Artifact(_)));
    }

    #[test]
    fn test_from_hex_error() {
        let hex_err = alloy::hex::decode("zz").unwrap_err();
        let err: SessionError = hex_err.into();
        assert!(matches!(err, SessionError::Parse(_)));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = SessionError::Config("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Config"));
    }
}
