//! Remote persistent store collaborator.
//!
//! The fare service does not own a database; pricing rules and fare
//! transactions live in a hosted store exposing the tables `price_settings`
//! and `fare_transactions` over a PostgREST-style REST API. The [`FareStore`]
//! trait is the seam: services take the store as an injected dependency, the
//! production implementation is [`rest::RestStore`], and tests substitute an
//! in-memory fake.

pub mod rest;

#[cfg(test)]
pub mod memory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Store error: {0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A row of the `price_settings` table
#[derive(Debug, Clone, Deserialize)]
pub struct PriceSettingRow {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    pub peak_price: f64,
    pub off_peak_price: f64,
    /// Store-generated timestamp (RFC 3339)
    pub created_at: String,
}

/// Insert payload for `price_settings`; id and timestamp are store-generated
#[derive(Debug, Serialize)]
pub struct NewPriceSetting<'a> {
    pub from_id: &'a str,
    pub to_id: &'a str,
    pub peak_price: f64,
    pub off_peak_price: f64,
}

/// A row of the `fare_transactions` table
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FareTransactionRow {
    pub id: String,
    pub from_location: String,
    pub to_location: String,
    pub amount: f64,
    pub is_peak: bool,
    /// Store-generated timestamp (RFC 3339)
    pub created_at: String,
}

/// Insert payload for `fare_transactions`
#[derive(Debug, Serialize)]
pub struct NewTransaction<'a> {
    pub from_location: &'a str,
    pub to_location: &'a str,
    pub amount: f64,
    pub is_peak: bool,
}

/// Point queries and mutations against the remote store.
///
/// Every method maps a single store round trip; none of them retry. Callers
/// decide what a failure means for their operation.
#[allow(async_fn_in_trait)]
pub trait FareStore: Send + Sync {
    async fn list_price_settings(&self) -> Result<Vec<PriceSettingRow>, StoreError>;

    /// Point query for the rule stored with exactly this orientation
    async fn find_price_setting(
        &self,
        from_id: &str,
        to_id: &str,
    ) -> Result<Option<PriceSettingRow>, StoreError>;

    async fn insert_price_setting(
        &self,
        new: NewPriceSetting<'_>,
    ) -> Result<PriceSettingRow, StoreError>;

    /// Returns the number of rows removed (0 when no rule matched)
    async fn delete_price_setting(&self, from_id: &str, to_id: &str) -> Result<u64, StoreError>;

    async fn insert_transaction(
        &self,
        new: NewTransaction<'_>,
    ) -> Result<FareTransactionRow, StoreError>;

    /// All transactions, newest first
    async fn list_transactions(&self) -> Result<Vec<FareTransactionRow>, StoreError>;

    /// Just the `amount` column, for the running total
    async fn transaction_amounts(&self) -> Result<Vec<f64>, StoreError>;

    /// Just the `id` column, for bulk deletion
    async fn transaction_ids(&self) -> Result<Vec<String>, StoreError>;

    /// Delete-where-id-in-set; a single statement on the store side.
    /// Returns the number of rows removed.
    async fn delete_transactions(&self, ids: &[String]) -> Result<u64, StoreError>;
}
