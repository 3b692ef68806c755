mod list;

pub use list::*;

use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::services::pricing::PricingService;
use crate::store::rest::RestStore;

#[derive(Clone)]
pub struct PricesState {
    pub pricing: Arc<PricingService<RestStore>>,
}

pub fn router(store: Arc<RestStore>) -> Router {
    let state = PricesState {
        pricing: Arc::new(PricingService::new(store)),
    };
    Router::new()
        .route("/", get(list_price_settings).post(create_price_setting))
        .route("/{from_id}/{to_id}", delete(delete_price_setting))
        .with_state(state)
}
