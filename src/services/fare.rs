//! Fare calculation.
//!
//! A fare is the peak or off-peak price of the route's stored rule, selected
//! by classifying the boarding time against the peak windows in the
//! configured reference timezone. The route is an unordered pair, so the
//! lookup tries both orientations of the stored rule.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::peak::is_peak_hour;
use crate::store::{FareStore, PriceSettingRow, StoreError};

#[derive(Debug, Error)]
pub enum FareError {
    #[error("No price settings found for this route")]
    NoRouteConfigured,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A priced fare for one boarding
#[derive(Debug, Clone, Copy)]
pub struct Quote {
    /// Fare amount in Kenyan shillings
    pub amount: f64,
    /// Whether the boarding time fell in a peak window
    pub is_peak: bool,
}

pub struct FareCalculator<S> {
    store: Arc<S>,
    timezone: chrono_tz::Tz,
}

impl<S: FareStore> FareCalculator<S> {
    pub fn new(store: Arc<S>, timezone: chrono_tz::Tz) -> Self {
        Self { store, timezone }
    }

    /// Price the route for the given boarding time.
    pub async fn calculate_fare(
        &self,
        from_id: &str,
        to_id: &str,
        boarding_time: DateTime<Utc>,
    ) -> Result<Quote, FareError> {
        let rule = self
            .find_rule(from_id, to_id)
            .await?
            .ok_or(FareError::NoRouteConfigured)?;

        let local = boarding_time.with_timezone(&self.timezone);
        let is_peak = is_peak_hour(&local);
        let amount = if is_peak {
            rule.peak_price
        } else {
            rule.off_peak_price
        };
        Ok(Quote { amount, is_peak })
    }

    /// Point-query the rule for the unordered pair
    async fn find_rule(
        &self,
        from_id: &str,
        to_id: &str,
    ) -> Result<Option<PriceSettingRow>, StoreError> {
        if let Some(rule) = self.store.find_price_setting(from_id, to_id).await? {
            return Ok(Some(rule));
        }
        self.store.find_price_setting(to_id, from_id).await
    }
}

/// Render an amount for display and logs
pub fn format_currency(amount: f64) -> String {
    format!("Ksh. {}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::NewPriceSetting;
    use chrono::TimeZone;
    use chrono_tz::Africa::Nairobi;

    async fn calculator_with_rule() -> FareCalculator<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_price_setting(NewPriceSetting {
                from_id: "1",
                to_id: "5",
                peak_price: 100.0,
                off_peak_price: 60.0,
            })
            .await
            .unwrap();
        FareCalculator::new(store, Nairobi)
    }

    fn nairobi_utc(hour: u32) -> DateTime<Utc> {
        Nairobi
            .with_ymd_and_hms(2024, 3, 11, hour, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn peak_boarding_charges_peak_price() {
        let calculator = calculator_with_rule().await;
        let quote = calculator
            .calculate_fare("1", "5", nairobi_utc(7))
            .await
            .unwrap();
        assert_eq!(quote.amount, 100.0);
        assert!(quote.is_peak);
    }

    #[tokio::test]
    async fn off_peak_boarding_charges_off_peak_price() {
        let calculator = calculator_with_rule().await;
        let quote = calculator
            .calculate_fare("1", "5", nairobi_utc(12))
            .await
            .unwrap();
        assert_eq!(quote.amount, 60.0);
        assert!(!quote.is_peak);
    }

    #[tokio::test]
    async fn reverse_direction_finds_the_same_rule() {
        let calculator = calculator_with_rule().await;
        let quote = calculator
            .calculate_fare("5", "1", nairobi_utc(18))
            .await
            .unwrap();
        assert_eq!(quote.amount, 100.0);
    }

    #[tokio::test]
    async fn unconfigured_route_fails() {
        let calculator = calculator_with_rule().await;
        let err = calculator
            .calculate_fare("2", "3", nairobi_utc(12))
            .await
            .unwrap_err();
        assert!(matches!(err, FareError::NoRouteConfigured));
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_typed_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let calculator = FareCalculator::new(store, Nairobi);

        let err = calculator
            .calculate_fare("1", "5", nairobi_utc(12))
            .await
            .unwrap_err();
        assert!(matches!(err, FareError::Store(_)));
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(100.0), "Ksh. 100");
        assert_eq!(format_currency(62.5), "Ksh. 62.5");
    }
}
