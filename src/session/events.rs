//! Transaction lifecycle events.
//!
//! [`EventEmitter`] keeps at most one callback per [`EventKind`]. The first
//! registration for a kind is retained and later ones are ignored, unlike
//! multi-subscriber emitters.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};

use crate::types::TxReceipt;

/// Lifecycle topics a callback can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// The transaction was accepted by the node and has a hash.
    TransactionHash,
    /// The transaction was mined successfully.
    Receipt,
    /// Broadcasting failed, waiting failed, or the transaction reverted.
    Error,
}

impl EventKind {
    /// All kinds, in lifecycle order.
    pub const ALL: [EventKind; 3] =
        [EventKind::TransactionHash, EventKind::Receipt, EventKind::Error];

    /// Wire name of the topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TransactionHash => "transactionHash",
            EventKind::Receipt => "receipt",
            EventKind::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transactionHash" => Ok(EventKind::TransactionHash),
            "receipt" => Ok(EventKind::Receipt),
            "error" => Ok(EventKind::Error),
            _ => Err(format!("Unknown event: {}", s)),
        }
    }
}

/// Why a submitted transaction did not produce a successful receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxFailure {
    /// Hash, when the node accepted the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<TxHash>,
    /// Human-readable reason.
    pub reason: String,
    /// Receipt of a reverted transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<TxReceipt>,
}

/// Payload delivered to lifecycle callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxEvent {
    /// Node accepted the transaction.
    TransactionHash(TxHash),
    /// Transaction mined with success status.
    Receipt(TxReceipt),
    /// Transaction failed after submission began.
    Error(TxFailure),
}

impl TxEvent {
    /// Topic this event is delivered on.
    pub fn kind(&self) -> EventKind {
        match self {
            TxEvent::TransactionHash(_) => EventKind::TransactionHash,
            TxEvent::Receipt(_) => EventKind::Receipt,
            TxEvent::Error(_) => EventKind::Error,
        }
    }
}

/// Callback invoked with a lifecycle event.
pub type EventCallback = Arc<dyn Fn(&TxEvent) + Send + Sync>;

/// Single-subscriber-per-topic event table.
#[derive(Clone, Default)]
pub struct EventEmitter {
    callbacks: HashMap<EventKind, EventCallback>,
}

impl EventEmitter {
    /// Create an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `kind` unless one is already registered.
    ///
    /// Returns whether the callback was stored.
    pub fn on<F>(&mut self, kind: EventKind, callback: F) -> bool
    where
        F: Fn(&TxEvent) + Send + Sync + 'static,
    {
        if self.callbacks.contains_key(&kind) {
            tracing::debug!(event = %kind, "Listener already registered, ignoring");
            return false;
        }
        self.callbacks.insert(kind, Arc::new(callback));
        true
    }

    /// Invoke the callback registered for the event's topic, if any.
    pub fn emit(&self, event: &TxEvent) {
        if let Some(callback) = self.callbacks.get(&event.kind()) {
            callback(event);
        }
    }

    /// Whether a callback is registered for `kind`.
    pub fn has_listener(&self, kind: EventKind) -> bool {
        self.callbacks.contains_key(&kind)
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<&str> =
            EventKind::ALL.iter().filter(|k| self.has_listener(**k)).map(|k| k.as_str()).collect();
        f.debug_struct("EventEmitter").field("listeners", &kinds).finish()
    }
}
