use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{error_response, fare_error, ledger_error, ApiError};
use crate::api::ErrorResponse;
use crate::store::FareTransactionRow;

use super::TransactionsState;

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub transactions: Vec<FareTransactionRow>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordTransactionRequest {
    /// Registry id of the boarding stop
    pub from_id: String,
    /// Registry id of the alighting stop
    pub to_id: String,
    /// Boarding time (RFC 3339). Defaults to now; the fare is priced at
    /// this time, not at insertion time.
    pub boarding_time: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotalAmountResponse {
    /// Sum of all recorded fare amounts, in shillings
    pub total: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetTransactionsResponse {
    /// Whether every transaction was removed
    pub deleted: bool,
    /// How many transactions the reset targeted
    pub count: usize,
}

/// List all recorded fare transactions, newest first
#[utoipa::path(
    get,
    path = "/api/transactions",
    responses(
        (status = 200, description = "Recorded fare transactions", body = TransactionListResponse),
        (status = 502, description = "Remote store failure", body = ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn list_transactions(
    State(state): State<TransactionsState>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let transactions = state.ledger.list_all().await.map_err(ledger_error)?;
    Ok(Json(TransactionListResponse { transactions }))
}

/// Price a boarding and record the resulting fare
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = RecordTransactionRequest,
    responses(
        (status = 200, description = "The recorded transaction", body = FareTransactionRow),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "No price setting for this route", body = ErrorResponse),
        (status = 502, description = "Remote store failure", body = ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn record_transaction(
    State(state): State<TransactionsState>,
    Json(request): Json<RecordTransactionRequest>,
) -> Result<Json<FareTransactionRow>, ApiError> {
    let boarding_time = match &request.boarding_time {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid boarding_time: {}", e),
                )
            })?,
        None => Utc::now(),
    };

    let quote = state
        .calculator
        .calculate_fare(&request.from_id, &request.to_id, boarding_time)
        .await
        .map_err(fare_error)?;

    let transaction = state
        .ledger
        .record(&request.from_id, &request.to_id, quote.amount, quote.is_peak)
        .await
        .map_err(ledger_error)?;
    Ok(Json(transaction))
}

/// Current total collection
#[utoipa::path(
    get,
    path = "/api/transactions/total",
    responses(
        (status = 200, description = "Sum of all recorded fares", body = TotalAmountResponse),
        (status = 502, description = "Remote store failure", body = ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn total_amount(
    State(state): State<TransactionsState>,
) -> Result<Json<TotalAmountResponse>, ApiError> {
    let total = state.ledger.total_amount().await.map_err(ledger_error)?;
    Ok(Json(TotalAmountResponse { total }))
}

/// Delete all recorded transactions (end-of-shift reset)
#[utoipa::path(
    delete,
    path = "/api/transactions",
    responses(
        (status = 200, description = "Reset result", body = ResetTransactionsResponse),
        (status = 400, description = "No transactions to delete", body = ErrorResponse),
        (status = 502, description = "Remote store failure", body = ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn reset_transactions(
    State(state): State<TransactionsState>,
) -> Result<Json<ResetTransactionsResponse>, ApiError> {
    let ids = state.ledger.list_ids().await.map_err(ledger_error)?;
    let deleted = state.ledger.delete_many(&ids).await.map_err(ledger_error)?;
    Ok(Json(ResetTransactionsResponse {
        deleted,
        count: ids.len(),
    }))
}
