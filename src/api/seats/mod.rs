mod list;

pub use list::*;

use axum::{
    routing::{get, put},
    Router,
};

use crate::seats::{SeatStore, SeatUpdateSender};

#[derive(Clone)]
pub struct SeatsState {
    pub seat_store: SeatStore,
    pub seat_updates_tx: SeatUpdateSender,
}

pub fn router(seat_store: SeatStore, seat_updates_tx: SeatUpdateSender) -> Router {
    let state = SeatsState {
        seat_store,
        seat_updates_tx,
    };
    Router::new()
        .route("/", get(list_seats))
        .route("/{id}", put(update_seat))
        .with_state(state)
}
