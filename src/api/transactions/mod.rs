mod handlers;

pub use handlers::*;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::services::fare::FareCalculator;
use crate::services::ledger::LedgerService;
use crate::store::rest::RestStore;

#[derive(Clone)]
pub struct TransactionsState {
    pub calculator: Arc<FareCalculator<RestStore>>,
    pub ledger: Arc<LedgerService<RestStore>>,
}

pub fn router(store: Arc<RestStore>, timezone: chrono_tz::Tz) -> Router {
    let state = TransactionsState {
        calculator: Arc::new(FareCalculator::new(store.clone(), timezone)),
        ledger: Arc::new(LedgerService::new(store)),
    };
    Router::new()
        .route(
            "/",
            get(list_transactions)
                .post(record_transaction)
                .delete(reset_transactions),
        )
        .route("/total", get(total_amount))
        .with_state(state)
}
