//! The transaction ledger.
//!
//! Completed fares are append-only rows in the remote store; there is no
//! update-in-place, only recording and bulk deletion (the operator's end-of-
//! shift reset). The running total is recomputed by a full scan on every
//! query so deletions are reflected immediately.

use std::sync::Arc;

use thiserror::Error;

use crate::locations::{self, Location};
use crate::services::fare::format_currency;
use crate::store::{FareStore, FareTransactionRow, NewTransaction, StoreError};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct LedgerService<S> {
    store: Arc<S>,
}

impl<S: FareStore> LedgerService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Append a completed fare to the ledger.
    ///
    /// Validation happens before any store call: the amount must be a
    /// non-negative finite number and both endpoints must be distinct
    /// registered locations.
    pub async fn record(
        &self,
        from_id: &str,
        to_id: &str,
        amount: f64,
        is_peak: bool,
    ) -> Result<FareTransactionRow, LedgerError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::Validation(
                "The fare amount must be a non-negative amount".into(),
            ));
        }
        let from = resolve(from_id)?;
        let to = resolve(to_id)?;
        if from.id == to.id {
            return Err(LedgerError::Validation(
                "From and to locations must differ".into(),
            ));
        }
        let row = self
            .store
            .insert_transaction(NewTransaction {
                from_location: from_id,
                to_location: to_id,
                amount,
                is_peak,
            })
            .await?;
        tracing::info!(
            id = %row.id,
            amount = %format_currency(row.amount),
            is_peak = row.is_peak,
            "Recorded fare transaction"
        );
        Ok(row)
    }

    /// All recorded transactions, newest first.
    pub async fn list_all(&self) -> Result<Vec<FareTransactionRow>, LedgerError> {
        Ok(self.store.list_transactions().await?)
    }

    /// Sum of all current transaction amounts, computed by full scan.
    pub async fn total_amount(&self) -> Result<f64, LedgerError> {
        let amounts = self.store.transaction_amounts().await?;
        Ok(amounts.iter().sum())
    }

    /// Ids of all current transactions.
    pub async fn list_ids(&self) -> Result<Vec<String>, LedgerError> {
        Ok(self.store.transaction_ids().await?)
    }

    /// Bulk-delete the given transactions.
    ///
    /// Deleting an empty id set is rejected up front (there is nothing to
    /// delete). Returns whether every listed row was removed.
    pub async fn delete_many(&self, ids: &[String]) -> Result<bool, LedgerError> {
        if ids.is_empty() {
            return Err(LedgerError::Validation(
                "No fare transactions found to delete".into(),
            ));
        }
        let deleted = self.store.delete_transactions(ids).await?;
        Ok(deleted == ids.len() as u64)
    }
}

fn resolve(id: &str) -> Result<&'static Location, LedgerError> {
    locations::find(id)
        .ok_or_else(|| LedgerError::Validation(format!("Unknown location id: {}", id)))
}
