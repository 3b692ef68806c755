pub mod api;
mod config;
mod locations;
mod peak;
mod seats;
mod services;
mod store;

use std::sync::Arc;

use axum::Router;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use store::rest::RestStore;

#[derive(OpenApi)]
#[openapi(
    info(title = "FareTech API", version = "0.2.0"),
    paths(
        api::locations::list_locations,
        api::prices::list_price_settings,
        api::prices::create_price_setting,
        api::prices::delete_price_setting,
        api::transactions::list_transactions,
        api::transactions::record_transaction,
        api::transactions::total_amount,
        api::transactions::reset_transactions,
        api::seats::list_seats,
        api::seats::update_seat,
        api::health::health_check,
    ),
    components(schemas(
        api::ErrorResponse,
        api::locations::LocationListResponse,
        api::prices::PriceSettingListResponse,
        api::prices::CreatePriceSettingRequest,
        api::prices::DeletePriceSettingResponse,
        api::transactions::TransactionListResponse,
        api::transactions::RecordTransactionRequest,
        api::transactions::TotalAmountResponse,
        api::transactions::ResetTransactionsResponse,
        api::seats::SeatListResponse,
        api::seats::UpdateSeatRequest,
        api::health::HealthResponse,
        locations::Location,
        locations::Coordinates,
        services::pricing::PricingRule,
        store::FareTransactionRow,
        seats::SeatStatus,
    )),
    tags(
        (name = "locations", description = "The fixed stop registry"),
        (name = "prices", description = "Per-route price settings"),
        (name = "transactions", description = "Fare transaction ledger"),
        (name = "seats", description = "Seat occupancy state"),
        (name = "health", description = "Service health check")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = Config::load("config.yaml").expect("Failed to load config");
    let timezone = config
        .reference_timezone()
        .expect("Invalid timezone in config");
    tracing::info!(
        %timezone,
        seat_count = config.seat_count,
        locations = locations::all().len(),
        "Loaded configuration"
    );

    // Build CORS layer based on config
    let cors_layer = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode explicitly enabled (all origins allowed) - DO NOT USE IN PRODUCTION");
        CorsLayer::permissive()
    } else if !config.cors_origins.is_empty() {
        tracing::info!(origins = ?config.cors_origins, "CORS: Restricting to configured origins");
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        panic!("CORS configuration error: Either set 'cors_origins' with allowed origins, or set 'cors_permissive: true' for development");
    };

    // Connect to the remote fare store
    let api_key = config
        .store
        .resolve_api_key()
        .expect("No store API key configured");
    let fare_store = Arc::new(
        RestStore::new(&config.store.url, &api_key).expect("Failed to build store client"),
    );
    tracing::info!(url = %config.store.url, "Using remote fare store");

    // Seat state shared between the sensor endpoint and the WebSocket feed
    let seat_store = seats::new_seat_store(config.seat_count);
    let (seat_updates_tx, _) = tokio::sync::broadcast::channel(32);

    // Build the app
    let app = Router::new()
        .route("/", axum::routing::get(root))
        .nest(
            "/api",
            api::router(fare_store, timezone, seat_store, seat_updates_tx),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Start server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind to port 3000");

    tracing::info!("Server running on http://localhost:3000");
    tracing::info!("Swagger UI: http://localhost:3000/swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

async fn root() -> &'static str {
    "FareTech API"
}
