//! Borough Sales REST API
//!
//! HTTP API layer, built with Axum. It is the output sink of the
//! aggregator: every chart of the dashboard reads one endpoint.
//!
//! # Endpoints
//!
//! ## Boroughs
//! - `GET /api/v1/boroughs` - Dropdown options
//! - `GET /api/v1/boroughs/:name/neighborhoods` - Top/bottom neighborhoods
//! - `GET /api/v1/boroughs/:name/trend` - Monthly sale price totals
//! - `GET /api/v1/boroughs/:name/dashboard` - Ranking and trend together
//!
//! ## Heat map
//! - `GET /api/v1/totals` - Sale price totals per borough
//! - `GET /api/v1/choropleth` - Totals, join key and colour range
//! - `GET /api/v1/boundaries` - Borough boundary GeoJSON
//!
//! ## Data table
//! - `GET /api/v1/sales` - Paged sale rows
//! - `GET /api/v1/export` - Sale rows as CSV, JSON or NDJSON
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use borough_sales::aggregate::SalesAggregator;
//! use borough_sales::api::{serve, ApiConfig, AppState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (dataset, boundaries) = load_inputs()?;
//!     let aggregator = Arc::new(SalesAggregator::new(Arc::new(dataset)));
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(aggregator, Arc::new(boundaries), config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Borough routes
        .route("/boroughs", get(routes::boroughs::list_boroughs))
        .route(
            "/boroughs/:name/neighborhoods",
            get(routes::boroughs::get_neighborhoods),
        )
        .route("/boroughs/:name/trend", get(routes::boroughs::get_trend))
        .route(
            "/boroughs/:name/dashboard",
            get(routes::boroughs::get_dashboard),
        )
        // Heat map routes
        .route("/totals", get(routes::totals::get_totals))
        .route("/choropleth", get(routes::totals::get_choropleth))
        .route("/boundaries", get(routes::totals::get_boundaries))
        // Data table routes
        .route("/sales", get(routes::sales::list_sales))
        .route("/export", get(routes::export::export_sales));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS policy: the listed origins, or any origin when none are listed
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Borough sales API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Borough sales API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::SalesAggregator;
    use crate::dataset::{
        Borough, BoroughBoundaries, EnrichedSale, SalesDataset, DEFAULT_FEATURE_ID_KEY,
    };
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn sale(borough: Borough, neighborhood: &str, price: f64, date: (i32, u32, u32)) -> EnrichedSale {
        EnrichedSale::new(
            borough,
            neighborhood,
            price,
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        )
    }

    fn create_test_app_with(config: ApiConfig) -> Router {
        let records = vec![
            sale(Borough::Manhattan, "SOHO", 100.0, (2016, 9, 3)),
            sale(Borough::Manhattan, "SOHO", 200.0, (2016, 10, 11)),
            sale(Borough::Manhattan, "TRIBECA", 50.0, (2016, 10, 20)),
            sale(Borough::Bronx, "MOTT HAVEN", 100.0, (2016, 1, 15)),
            sale(Borough::Bronx, "MOTT HAVEN", 100.0, (2016, 1, 20)),
            sale(Borough::StatenIsland, "ANNADALE", 450.0, (2017, 3, 2)),
        ];
        let dataset = SalesDataset::new(records).source("data/sales.csv");
        let aggregator = Arc::new(SalesAggregator::new(Arc::new(dataset)));

        let boundaries = BoroughBoundaries::from_value(
            json!({
                "type": "FeatureCollection",
                "features": Borough::ALL.iter().map(|b| json!({
                    "type": "Feature",
                    "properties": { "boro_name": b.name() },
                    "geometry": null
                })).collect::<Vec<_>>()
            }),
            DEFAULT_FEATURE_ID_KEY,
        )
        .unwrap();

        build_router(AppState::new(aggregator, Arc::new(boundaries), config))
    }

    fn create_test_app() -> Router {
        create_test_app_with(ApiConfig::default())
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = send_get(create_test_app(), "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let response = send_get(create_test_app(), "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let response = send_get(create_test_app(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["records"], 6);
        assert_eq!(body["source"], "data/sales.csv");
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["boundary_features"], 5);
        assert_eq!(body["boroughs"], json!(["Manhattan", "Bronx", "Staten Island"]));
    }

    #[tokio::test]
    async fn test_list_boroughs() {
        let response = send_get(create_test_app(), "/api/v1/boroughs").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["total"], 5);
        assert_eq!(body["boroughs"][1], json!({ "code": 2, "name": "Bronx" }));
    }

    #[tokio::test]
    async fn test_neighborhoods() {
        let response = send_get(
            create_test_app(),
            "/api/v1/boroughs/Manhattan/neighborhoods?top=1&bottom=1",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["borough"], "Manhattan");
        assert_eq!(body["top"], json!([{ "neighborhood": "SOHO", "count": 2 }]));
        assert_eq!(body["bottom"], json!([{ "neighborhood": "TRIBECA", "count": 1 }]));
        assert_eq!(body["top_title"], "Top 1 Populated Neighborhoods in Manhattan");
    }

    #[tokio::test]
    async fn test_neighborhoods_slice_too_large() {
        let response = send_get(
            create_test_app(),
            "/api/v1/boroughs/Manhattan/neighborhoods?top=500",
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_trend() {
        let response = send_get(create_test_app(), "/api/v1/boroughs/Bronx/trend").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(
            body["months"],
            json!([{
                "borough_code": 2,
                "borough_name": "Bronx",
                "month": "2016-01",
                "sale_price": 200.0
            }])
        );
    }

    #[tokio::test]
    async fn test_trend_name_with_space() {
        let response = send_get(create_test_app(), "/api/v1/boroughs/Staten%20Island/trend").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["title"], "Monthly Sales Price Trend in Staten Island");
    }

    #[tokio::test]
    async fn test_unknown_borough() {
        let response = send_get(create_test_app(), "/api/v1/boroughs/Atlantis/trend").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNKNOWN_BOROUGH");
    }

    #[tokio::test]
    async fn test_dashboard() {
        let response = send_get(create_test_app(), "/api/v1/boroughs/manhattan/dashboard").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["borough"], "Manhattan");
        assert_eq!(body["neighborhoods"]["top"].as_array().unwrap().len(), 2);
        assert_eq!(body["trend"]["months"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_totals() {
        let response = send_get(create_test_app(), "/api/v1/totals").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["grand_total"], 1000.0);
        assert_eq!(body["totals"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_choropleth() {
        let response = send_get(create_test_app(), "/api/v1/choropleth").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["feature_id_key"], "properties.boro_name");
        assert_eq!(body["range"], json!({ "min": 200.0, "max": 450.0 }));
    }

    #[tokio::test]
    async fn test_boundaries() {
        let response = send_get(create_test_app(), "/api/v1/boundaries").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_sales_page() {
        let response = send_get(create_test_app(), "/api/v1/sales?borough=Bronx&limit=1").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["limit"], 1);
        assert_eq!(body["records"][0]["neighborhood"], "MOTT HAVEN");
    }

    #[tokio::test]
    async fn test_sales_limit_too_large() {
        let response = send_get(create_test_app(), "/api/v1/sales?limit=100000").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let response = send_get(create_test_app(), "/api/v1/export?borough=Bronx&format=csv").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_export_disabled() {
        let config = ApiConfig {
            enable_export: false,
            ..Default::default()
        };

        let response = send_get(create_test_app_with(config), "/api/v1/export").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    async fn send_get_from(app: Router, uri: &str, origin: &str) -> Response {
        app.oneshot(
            Request::builder()
                .uri(uri)
                .header(header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_cors_listed_origins() {
        let config = ApiConfig {
            // Invalid entries are dropped, the rest still apply
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "bad\norigin".to_string(),
            ],
            ..Default::default()
        };

        let response = send_get_from(
            create_test_app_with(config.clone()),
            "/api/v1/boroughs",
            "http://localhost:3000",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );

        let response = send_get_from(
            create_test_app_with(config),
            "/api/v1/boroughs",
            "http://evil.example",
        )
        .await;
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_cors_any_origin_by_default() {
        let response =
            send_get_from(create_test_app(), "/api/v1/boroughs", "http://localhost:5173").await;
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
