//! Per-route price settings.
//!
//! A route is an unordered pair of registry locations; at most one rule may
//! exist per pair. Creation rejects duplicates in either orientation rather
//! than upserting, so the operator has to delete the old rule explicitly
//! before changing prices.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::locations::{self, Location};
use crate::store::{FareStore, NewPriceSetting, PriceSettingRow, StoreError};

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("{0}")]
    Validation(String),
    #[error("Price settings already exist for these locations. Delete existing settings first.")]
    DuplicateRule,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A stored pricing rule with its endpoints resolved against the registry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PricingRule {
    pub id: String,
    pub from: Location,
    pub to: Location,
    pub peak_price: f64,
    pub off_peak_price: f64,
    pub created_at: String,
}

pub struct PricingService<S> {
    store: Arc<S>,
}

impl<S: FareStore> PricingService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All stored rules, enriched with registry locations.
    ///
    /// Rows referencing a location id the registry does not know are dropped
    /// from the result rather than failing the whole listing.
    pub async fn list(&self) -> Result<Vec<PricingRule>, PricingError> {
        let rows = self.store.list_price_settings().await?;
        Ok(rows.into_iter().filter_map(enrich).collect())
    }

    /// Create a rule for the route between two distinct locations.
    ///
    /// Validation happens before any store call; a rule already stored for
    /// the pair in either orientation is a [`PricingError::DuplicateRule`].
    pub async fn create(
        &self,
        from_id: &str,
        to_id: &str,
        peak_price: f64,
        off_peak_price: f64,
    ) -> Result<PricingRule, PricingError> {
        let from = resolve(from_id)?;
        let to = resolve(to_id)?;
        if from.id == to.id {
            return Err(PricingError::Validation(
                "From and to locations must differ".into(),
            ));
        }
        validate_price("peak price", peak_price)?;
        validate_price("off-peak price", off_peak_price)?;

        if self.store.find_price_setting(from_id, to_id).await?.is_some()
            || self.store.find_price_setting(to_id, from_id).await?.is_some()
        {
            return Err(PricingError::DuplicateRule);
        }

        let row = self
            .store
            .insert_price_setting(NewPriceSetting {
                from_id,
                to_id,
                peak_price,
                off_peak_price,
            })
            .await?;
        tracing::info!(from = from.name, to = to.name, "Created price setting");

        Ok(PricingRule {
            id: row.id,
            from: from.clone(),
            to: to.clone(),
            peak_price: row.peak_price,
            off_peak_price: row.off_peak_price,
            created_at: row.created_at,
        })
    }

    /// Delete the rule stored for the route, whichever orientation it was
    /// created with, so a pair blocked by the duplicate check can always be
    /// freed again.
    ///
    /// Returns whether a rule was actually removed; deleting a route with no
    /// rule reports `false`.
    pub async fn delete(&self, from_id: &str, to_id: &str) -> Result<bool, PricingError> {
        let mut deleted = self.store.delete_price_setting(from_id, to_id).await?;
        if from_id != to_id {
            deleted += self.store.delete_price_setting(to_id, from_id).await?;
        }
        Ok(deleted > 0)
    }
}

fn resolve(id: &str) -> Result<&'static Location, PricingError> {
    locations::find(id)
        .ok_or_else(|| PricingError::Validation(format!("Unknown location id: {}", id)))
}

fn validate_price(label: &str, price: f64) -> Result<(), PricingError> {
    if !price.is_finite() || price < 0.0 {
        return Err(PricingError::Validation(format!(
            "The {} must be a non-negative amount",
            label
        )));
    }
    Ok(())
}

fn enrich(row: PriceSettingRow) -> Option<PricingRule> {
    let from = locations::find(&row.from_id);
    let to = locations::find(&row.to_id);
    match (from, to) {
        (Some(from), Some(to)) => Some(PricingRule {
            id: row.id,
            from: from.clone(),
            to: to.clone(),
            peak_price: row.peak_price,
            off_peak_price: row.off_peak_price,
            created_at: row.created_at,
        }),
        _ => {
            tracing::warn!(
                from_id = %row.from_id,
                to_id = %row.to_id,
                "Dropping price setting with unknown location id"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn service() -> PricingService<MemoryStore> {
        PricingService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_then_list_round_trips() {
        let pricing = service();
        pricing.create("1", "5", 100.0, 60.0).await.unwrap();

        let rules = pricing.list().await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].from.name, "KU");
        assert_eq!(rules[0].to.name, "Odeon");
        assert_eq!(rules[0].peak_price, 100.0);
        assert_eq!(rules[0].off_peak_price, 60.0);
    }

    #[tokio::test]
    async fn duplicate_rule_is_rejected() {
        let pricing = service();
        pricing.create("1", "5", 100.0, 60.0).await.unwrap();

        let err = pricing.create("1", "5", 120.0, 70.0).await.unwrap_err();
        assert!(matches!(err, PricingError::DuplicateRule));
    }

    #[tokio::test]
    async fn duplicate_check_covers_reverse_orientation() {
        let pricing = service();
        pricing.create("1", "5", 100.0, 60.0).await.unwrap();

        let err = pricing.create("5", "1", 120.0, 70.0).await.unwrap_err();
        assert!(matches!(err, PricingError::DuplicateRule));
    }

    #[tokio::test]
    async fn same_from_and_to_is_rejected_before_store_call() {
        let pricing = PricingService::new(Arc::new(MemoryStore::new()));
        // A failing store proves validation short-circuits the call
        pricing.store.set_failing(true);

        let err = pricing.create("1", "1", 100.0, 60.0).await.unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let pricing = service();
        let err = pricing.create("1", "5", -1.0, 60.0).await.unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));

        let err = pricing.create("1", "5", 100.0, -0.5).await.unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_location_is_rejected() {
        let pricing = service();
        let err = pricing.create("1", "99", 100.0, 60.0).await.unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }

    #[tokio::test]
    async fn list_drops_rows_with_unknown_locations() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_price_setting(NewPriceSetting {
                from_id: "1",
                to_id: "99",
                peak_price: 100.0,
                off_peak_price: 60.0,
            })
            .await
            .unwrap();
        store
            .insert_price_setting(NewPriceSetting {
                from_id: "2",
                to_id: "3",
                peak_price: 50.0,
                off_peak_price: 30.0,
            })
            .await
            .unwrap();

        let pricing = PricingService::new(store);
        let rules = pricing.list().await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].from.name, "Kahawa Sukari");
    }

    #[tokio::test]
    async fn delete_reports_whether_a_rule_was_removed() {
        let pricing = service();
        pricing.create("1", "5", 100.0, 60.0).await.unwrap();

        assert!(pricing.delete("1", "5").await.unwrap());
        assert!(!pricing.delete("1", "5").await.unwrap());
        assert!(!pricing.delete("2", "3").await.unwrap());
    }

    #[tokio::test]
    async fn delete_frees_the_pair_regardless_of_orientation() {
        let pricing = service();
        pricing.create("1", "5", 100.0, 60.0).await.unwrap();

        // The duplicate check blocks both orientations, so deleting with the
        // reverse orientation must still remove the stored rule
        assert!(pricing.delete("5", "1").await.unwrap());
        assert!(pricing.list().await.unwrap().is_empty());
        pricing.create("5", "1", 120.0, 70.0).await.unwrap();
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_typed_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let pricing = PricingService::new(store);

        let err = pricing.list().await.unwrap_err();
        assert!(matches!(err, PricingError::Store(_)));
    }
}
