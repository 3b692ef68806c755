//! Shared error response shape for the HTTP surface.
//!
//! Service errors never cross the handler boundary as panics or raw store
//! faults; they are logged here and mapped to a status code plus a
//! user-facing message the tablet UI shows as a toast.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::fare::FareError;
use crate::services::ledger::LedgerError;
use crate::services::pricing::PricingError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn pricing_error(err: PricingError) -> ApiError {
    let status = match &err {
        PricingError::Validation(_) => StatusCode::BAD_REQUEST,
        PricingError::DuplicateRule => StatusCode::CONFLICT,
        PricingError::Store(inner) => {
            tracing::error!("Pricing store failure: {}", inner);
            StatusCode::BAD_GATEWAY
        }
    };
    error_response(status, err.to_string())
}

pub fn fare_error(err: FareError) -> ApiError {
    let status = match &err {
        FareError::NoRouteConfigured => StatusCode::NOT_FOUND,
        FareError::Store(inner) => {
            tracing::error!("Fare store failure: {}", inner);
            StatusCode::BAD_GATEWAY
        }
    };
    error_response(status, err.to_string())
}

pub fn ledger_error(err: LedgerError) -> ApiError {
    let status = match &err {
        LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
        LedgerError::Store(inner) => {
            tracing::error!("Ledger store failure: {}", inner);
            StatusCode::BAD_GATEWAY
        }
    };
    error_response(status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn validation_maps_to_bad_request() {
        let (status, body) = pricing_error(PricingError::Validation("bad input".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "bad input");
    }

    #[test]
    fn duplicate_rule_maps_to_conflict() {
        let (status, _) = pricing_error(PricingError::DuplicateRule);
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn no_route_maps_to_not_found() {
        let (status, _) = fare_error(FareError::NoRouteConfigured);
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failure_maps_to_bad_gateway() {
        let err = LedgerError::Store(StoreError::Network("connection refused".into()));
        let (status, _) = ledger_error(err);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
