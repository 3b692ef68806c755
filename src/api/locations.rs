use axum::{routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::locations::{self, Location};

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationListResponse {
    pub locations: Vec<Location>,
}

/// List the registered stops
#[utoipa::path(
    get,
    path = "/api/locations",
    responses(
        (status = 200, description = "The fixed stop registry", body = LocationListResponse)
    ),
    tag = "locations"
)]
pub async fn list_locations() -> Json<LocationListResponse> {
    Json(LocationListResponse {
        locations: locations::all().to_vec(),
    })
}

pub fn router() -> Router {
    Router::new().route("/", get(list_locations))
}
