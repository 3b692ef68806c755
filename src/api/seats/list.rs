use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{error_response, ApiError};
use crate::api::ErrorResponse;
use crate::seats::{SeatStatus, SeatUpdate};

use super::SeatsState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SeatListResponse {
    pub seats: Vec<SeatStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSeatRequest {
    pub occupied: bool,
    /// Set when the sensor unit reports this seat as unreachable
    #[serde(default)]
    pub disconnected: bool,
}

/// Current seat occupancy
#[utoipa::path(
    get,
    path = "/api/seats",
    responses(
        (status = 200, description = "Seat occupancy snapshot", body = SeatListResponse)
    ),
    tag = "seats"
)]
pub async fn list_seats(State(state): State<SeatsState>) -> Json<SeatListResponse> {
    let seats = state.seat_store.read().await.clone();
    Json(SeatListResponse { seats })
}

/// Report a seat state change (sensor unit endpoint)
#[utoipa::path(
    put,
    path = "/api/seats/{id}",
    params(("id" = u32, Path, description = "Seat id")),
    request_body = UpdateSeatRequest,
    responses(
        (status = 200, description = "The updated seat", body = SeatStatus),
        (status = 404, description = "Unknown seat id", body = ErrorResponse)
    ),
    tag = "seats"
)]
pub async fn update_seat(
    State(state): State<SeatsState>,
    Path(id): Path<u32>,
    Json(request): Json<UpdateSeatRequest>,
) -> Result<Json<SeatStatus>, ApiError> {
    let mut seats = state.seat_store.write().await;
    let seat = seats
        .iter_mut()
        .find(|seat| seat.id == id)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, format!("Unknown seat id: {}", id)))?;

    seat.occupied = request.occupied;
    seat.disconnected = request.disconnected;
    let updated = *seat;
    let snapshot = seats.clone();
    drop(seats);

    // Ignore send errors - they just mean no one is listening
    let _ = state.seat_updates_tx.send(SeatUpdate {
        timestamp: Utc::now().to_rfc3339(),
        seats: snapshot,
    });

    Ok(Json(updated))
}
