//! Contract Session Library
//!
//! A thin session layer over alloy for smart-contract interaction.
//! Loads contract ABIs, invokes read-only methods, submits self-signed or
//! provider-signed transactions, and fetches chain metadata.
//!
//! # Features
//!
//! - **Transport Bootstrap**: Injected wallet provider, legacy RPC endpoint, or local fallback
//! - **Contract Registry**: Named contracts from addresses and ABIs or compiled artifacts
//! - **Calls and Transactions**: ABI-encoded calls, local signing or provider signing
//! - **Lifecycle Events**: `transactionHash`, `receipt` and `error` callbacks
//!
//! # Example
//!
//! ```rust,ignore
//! use contract_session::{CallArgs, Config, ContractSession, EventKind, TxOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let mut session = ContractSession::new();
//!     session.connect(config.provider_source(None)).await?;
//!
//!     session.register(address, abi, "Users");
//!     let user = session.call("getUserById", args, "Users", Default::default()).await?;
//!
//!     let outcome = session
//!         .submit_transaction(from, None, "updateUser", args, TxOptions::default(), "Users")
//!         .await?
//!         .on(EventKind::TransactionHash, |event| println!("{event:?}"))
//!         .send()
//!         .await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod contracts;
pub mod error;
pub mod ethereum;
pub mod session;
pub mod telemetry;
pub mod types;

pub use config::Config;
pub use contracts::{CallableContract, CompiledArtifact, ContractRegistration};
pub use error::{Result, SessionError};
pub use ethereum::constants::*;
pub use ethereum::{ChainTransport, ProviderSource, RpcTransport};
pub use session::{ContractSession, EventKind, TransactionHandle, TxEvent, TxOutcome};
pub use types::{BlockInfo, CallArgs, CallOptions, DefaultOptions, TxOptions, TxReceipt};
