//! Prepared transactions and their lifecycle.
//!
//! A [`TransactionHandle`] is returned before anything is broadcast, so
//! listeners attached with [`TransactionHandle::on`] never miss an event.
//!
//! ```text
//! submit_transaction() -> TransactionHandle (nothing sent yet)
//!                              │ .on(kind, cb)
//!                              ▼
//!                           send()
//!                              │
//!            ┌─────────────────┼──────────────────┐
//!     broadcast fails     transactionHash     wait fails
//!            │                 │                  │
//!            ▼          receipt / error           ▼
//!          error               │                error
//!                              ▼
//!                    Mined | Reverted | Failed
//! ```

use std::sync::Arc;

use alloy::{
    primitives::{Bytes, TxHash},
    rpc::types::TransactionRequest,
};

use crate::{
    ethereum::ChainTransport,
    session::events::{EventEmitter, EventKind, TxEvent, TxFailure},
    types::TxReceipt,
};

/// What gets handed to the node.
#[derive(Debug, Clone)]
pub enum TxPayload {
    /// Signed locally, broadcast with `eth_sendRawTransaction`.
    Signed(Bytes),
    /// Signed by the connected provider via `eth_sendTransaction`.
    Unsigned(TransactionRequest),
}

/// Final state of a sent transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutcome {
    /// Mined with success status.
    Mined(TxReceipt),
    /// Mined but execution reverted.
    Reverted(TxReceipt),
    /// Never broadcast, or the receipt could not be obtained.
    Failed(TxFailure),
}

impl TxOutcome {
    /// Whether the transaction was mined successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, TxOutcome::Mined(_))
    }

    /// Receipt, when the transaction was mined.
    pub fn receipt(&self) -> Option<&TxReceipt> {
        match self {
            TxOutcome::Mined(receipt) | TxOutcome::Reverted(receipt) => Some(receipt),
            TxOutcome::Failed(failure) => failure.receipt.as_ref(),
        }
    }
}

/// A transaction prepared by a session, not yet broadcast.
pub struct TransactionHandle<'a> {
    transport: Arc<dyn ChainTransport>,
    session_events: &'a EventEmitter,
    listeners: EventEmitter,
    contract: String,
    method: String,
    payload: TxPayload,
}

impl<'a> TransactionHandle<'a> {
    pub(crate) fn new(
        transport: Arc<dyn ChainTransport>,
        session_events: &'a EventEmitter,
        contract: &str,
        method: &str,
        payload: TxPayload,
    ) -> Self {
        Self {
            transport,
            session_events,
            listeners: EventEmitter::new(),
            contract: contract.to_string(),
            method: method.to_string(),
            payload,
        }
    }

    /// Attach a listener for this transaction only.
    ///
    /// As with the session table, the first listener per kind wins.
    pub fn on<F>(mut self, kind: EventKind, callback: F) -> Self
    where
        F: Fn(&TxEvent) + Send + Sync + 'static,
    {
        self.listeners.on(kind, callback);
        self
    }

    /// Payload that `send` will broadcast.
    pub fn payload(&self) -> &TxPayload {
        &self.payload
    }

    /// Whether the transaction was signed with a local key.
    pub fn is_self_signed(&self) -> bool {
        matches!(self.payload, TxPayload::Signed(_))
    }

    /// Broadcast and follow the transaction until it is mined.
    ///
    /// Failures are reported through the `error` event and the outcome.
    pub async fn send(self) -> TxOutcome {
        tracing::info!(
            contract = %self.contract,
            method = %self.method,
            self_signed = self.is_self_signed(),
            "Broadcasting transaction"
        );

        let tx_hash = match self.broadcast().await {
            Ok(hash) => hash,
            Err(reason) => {
                tracing::warn!(error = %reason, "Transaction broadcast failed");
                let failure = TxFailure { tx_hash: None, reason, receipt: None };
                self.dispatch(TxEvent::Error(failure.clone()));
                return TxOutcome::Failed(failure);
            }
        };

        tracing::info!(tx_hash = %tx_hash, "Transaction accepted");
        self.dispatch(TxEvent::TransactionHash(tx_hash));

        match self.transport.wait_for_receipt(tx_hash).await {
            Ok(receipt) if receipt.status => {
                tracing::info!(
                    tx_hash = %tx_hash,
                    block = ?receipt.block_number,
                    "Transaction mined"
                );
                self.dispatch(TxEvent::Receipt(receipt.clone()));
                TxOutcome::Mined(receipt)
            }
            Ok(receipt) => {
                tracing::warn!(tx_hash = %tx_hash, "Transaction reverted");
                let failure = TxFailure {
                    tx_hash: Some(tx_hash),
                    reason: "Transaction has been reverted by the EVM".to_string(),
                    receipt: Some(receipt.clone()),
                };
                self.dispatch(TxEvent::Error(failure));
                TxOutcome::Reverted(receipt)
            }
            Err(e) => {
                tracing::warn!(tx_hash = %tx_hash, error = %e, "Failed to get receipt");
                let failure =
                    TxFailure { tx_hash: Some(tx_hash), reason: e.to_string(), receipt: None };
                self.dispatch(TxEvent::Error(failure.clone()));
                TxOutcome::Failed(failure)
            }
        }
    }

    async fn broadcast(&self) -> std::result::Result<TxHash, String> {
        let result = match &self.payload {
            TxPayload::Signed(raw) => self.transport.send_raw_transaction(raw.clone()).await,
            TxPayload::Unsigned(tx) => self.transport.send_transaction(tx.clone()).await,
        };
        result.map_err(|e| e.to_string())
    }

    fn dispatch(&self, event: TxEvent) {
        self.listeners.emit(&event);
        self.session_events.emit(&event);
    }
}

impl std::fmt::Debug for TransactionHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionHandle")
            .field("contract", &self.contract)
            .field("method", &self.method)
            .field("self_signed", &self.is_self_signed())
            .field("listeners", &self.listeners)
            .finish()
    }
}
