pub mod error;
pub mod health;
pub mod locations;
pub mod prices;
pub mod seats;
pub mod transactions;
pub mod ws;

pub use error::ErrorResponse;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::seats::{SeatStore, SeatUpdateSender};
use crate::store::rest::RestStore;

pub fn router(
    store: Arc<RestStore>,
    timezone: chrono_tz::Tz,
    seat_store: SeatStore,
    seat_updates_tx: SeatUpdateSender,
) -> Router {
    let ws_state = ws::WsState {
        seat_store: seat_store.clone(),
        seat_updates_tx: seat_updates_tx.clone(),
    };

    Router::new()
        .nest("/locations", locations::router())
        .nest("/prices", prices::router(store.clone()))
        .nest("/transactions", transactions::router(store, timezone))
        .nest("/seats", seats::router(seat_store.clone(), seat_updates_tx))
        .nest("/health", health::router(seat_store, timezone))
        .route("/ws/seats", get(ws::ws_seats).with_state(ws_state))
}
