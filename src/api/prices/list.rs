use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{pricing_error, ApiError};
use crate::api::ErrorResponse;
use crate::services::pricing::PricingRule;

use super::PricesState;

#[derive(Debug, Serialize, ToSchema)]
pub struct PriceSettingListResponse {
    pub settings: Vec<PricingRule>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePriceSettingRequest {
    /// Registry id of the boarding stop
    pub from_id: String,
    /// Registry id of the alighting stop
    pub to_id: String,
    /// Fare during peak windows, in shillings
    pub peak_price: f64,
    /// Fare outside peak windows, in shillings
    pub off_peak_price: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletePriceSettingResponse {
    /// Whether a rule was actually removed
    pub deleted: bool,
}

/// List all configured price settings with resolved locations
#[utoipa::path(
    get,
    path = "/api/prices",
    responses(
        (status = 200, description = "Configured price settings", body = PriceSettingListResponse),
        (status = 502, description = "Remote store failure", body = ErrorResponse)
    ),
    tag = "prices"
)]
pub async fn list_price_settings(
    State(state): State<PricesState>,
) -> Result<Json<PriceSettingListResponse>, ApiError> {
    let settings = state.pricing.list().await.map_err(pricing_error)?;
    Ok(Json(PriceSettingListResponse { settings }))
}

/// Create a price setting for a route
#[utoipa::path(
    post,
    path = "/api/prices",
    request_body = CreatePriceSettingRequest,
    responses(
        (status = 200, description = "The created price setting", body = PricingRule),
        (status = 400, description = "Invalid locations or prices", body = ErrorResponse),
        (status = 409, description = "A rule already exists for this route", body = ErrorResponse),
        (status = 502, description = "Remote store failure", body = ErrorResponse)
    ),
    tag = "prices"
)]
pub async fn create_price_setting(
    State(state): State<PricesState>,
    Json(request): Json<CreatePriceSettingRequest>,
) -> Result<Json<PricingRule>, ApiError> {
    let rule = state
        .pricing
        .create(
            &request.from_id,
            &request.to_id,
            request.peak_price,
            request.off_peak_price,
        )
        .await
        .map_err(pricing_error)?;
    Ok(Json(rule))
}

/// Delete the price setting stored for a route
#[utoipa::path(
    delete,
    path = "/api/prices/{from_id}/{to_id}",
    params(
        ("from_id" = String, Path, description = "Registry id of the boarding stop"),
        ("to_id" = String, Path, description = "Registry id of the alighting stop")
    ),
    responses(
        (status = 200, description = "Deletion result", body = DeletePriceSettingResponse),
        (status = 502, description = "Remote store failure", body = ErrorResponse)
    ),
    tag = "prices"
)]
pub async fn delete_price_setting(
    State(state): State<PricesState>,
    Path((from_id, to_id)): Path<(String, String)>,
) -> Result<Json<DeletePriceSettingResponse>, ApiError> {
    let deleted = state
        .pricing
        .delete(&from_id, &to_id)
        .await
        .map_err(pricing_error)?;
    Ok(Json(DeletePriceSettingResponse { deleted }))
}
