//! Contract session module.
//!
//! Contains the session manager, transaction handles and lifecycle events.

pub mod events;
pub mod manager;
pub mod transaction;

pub use events::{EventCallback, EventEmitter, EventKind, TxEvent, TxFailure};
pub use manager::ContractSession;
pub use transaction::{TransactionHandle, TxOutcome, TxPayload};
