use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::locations;
use crate::seats::SeatStore;

#[derive(Clone)]
pub struct HealthState {
    pub seat_store: SeatStore,
    pub timezone: chrono_tz::Tz,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Whether the service is running
    pub healthy: bool,
    /// Number of stops in the location registry
    pub location_count: usize,
    /// Number of seats tracked for the sensor unit
    pub seat_count: usize,
    /// Timezone the peak windows are evaluated in
    pub timezone: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    let seat_count = state.seat_store.read().await.len();

    Json(HealthResponse {
        healthy: true,
        location_count: locations::all().len(),
        seat_count,
        timezone: state.timezone.to_string(),
    })
}

pub fn router(seat_store: SeatStore, timezone: chrono_tz::Tz) -> Router {
    let state = HealthState {
        seat_store,
        timezone,
    };
    Router::new().route("/", get(health_check)).with_state(state)
}
