//! In-memory [`FareStore`] fake for service tests.
//!
//! Behaves like the remote store for the operations the services use and can
//! be switched into a failing mode so tests can assert the store-failure
//! paths.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{Duration, SecondsFormat, Utc};

use super::{
    FareStore, FareTransactionRow, NewPriceSetting, NewTransaction, PriceSettingRow, StoreError,
};

#[derive(Default)]
struct Tables {
    price_settings: Vec<PriceSettingRow>,
    transactions: Vec<FareTransactionRow>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a network error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Network("connection refused".into()))
        } else {
            Ok(())
        }
    }

    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Strictly increasing RFC 3339 timestamps. Fixed-width fractional
    /// seconds so string ordering matches chronological ordering.
    fn generated_at(&self, sequence: u64) -> String {
        (Utc::now() + Duration::microseconds(sequence as i64))
            .to_rfc3339_opts(SecondsFormat::Micros, false)
    }
}

impl FareStore for MemoryStore {
    async fn list_price_settings(&self) -> Result<Vec<PriceSettingRow>, StoreError> {
        self.check_available()?;
        Ok(self.tables.lock().unwrap().price_settings.clone())
    }

    async fn find_price_setting(
        &self,
        from_id: &str,
        to_id: &str,
    ) -> Result<Option<PriceSettingRow>, StoreError> {
        self.check_available()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .price_settings
            .iter()
            .find(|row| row.from_id == from_id && row.to_id == to_id)
            .cloned())
    }

    async fn insert_price_setting(
        &self,
        new: NewPriceSetting<'_>,
    ) -> Result<PriceSettingRow, StoreError> {
        self.check_available()?;
        let sequence = self.next_id();
        let row = PriceSettingRow {
            id: format!("ps-{}", sequence),
            from_id: new.from_id.to_string(),
            to_id: new.to_id.to_string(),
            peak_price: new.peak_price,
            off_peak_price: new.off_peak_price,
            created_at: self.generated_at(sequence),
        };
        self.tables
            .lock()
            .unwrap()
            .price_settings
            .push(row.clone());
        Ok(row)
    }

    async fn delete_price_setting(&self, from_id: &str, to_id: &str) -> Result<u64, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.price_settings.len();
        tables
            .price_settings
            .retain(|row| !(row.from_id == from_id && row.to_id == to_id));
        Ok((before - tables.price_settings.len()) as u64)
    }

    async fn insert_transaction(
        &self,
        new: NewTransaction<'_>,
    ) -> Result<FareTransactionRow, StoreError> {
        self.check_available()?;
        let sequence = self.next_id();
        let row = FareTransactionRow {
            id: format!("tx-{}", sequence),
            from_location: new.from_location.to_string(),
            to_location: new.to_location.to_string(),
            amount: new.amount,
            is_peak: new.is_peak,
            created_at: self.generated_at(sequence),
        };
        self.tables.lock().unwrap().transactions.push(row.clone());
        Ok(row)
    }

    async fn list_transactions(&self) -> Result<Vec<FareTransactionRow>, StoreError> {
        self.check_available()?;
        let mut rows = self.tables.lock().unwrap().transactions.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn transaction_amounts(&self) -> Result<Vec<f64>, StoreError> {
        self.check_available()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .transactions
            .iter()
            .map(|row| row.amount)
            .collect())
    }

    async fn transaction_ids(&self) -> Result<Vec<String>, StoreError> {
        self.check_available()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .transactions
            .iter()
            .map(|row| row.id.clone())
            .collect())
    }

    async fn delete_transactions(&self, ids: &[String]) -> Result<u64, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.transactions.len();
        tables.transactions.retain(|row| !ids.contains(&row.id));
        Ok((before - tables.transactions.len()) as u64)
    }
}
