// HTTP boundary: quote endpoints over a shared, immutable catalog

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::config::{EngineConfig, ServerConfig};
use crate::quote::{QuoteEngine, QuoteError, QuoteRequest, QuoteResponse};
use crate::response::{self, RenderError};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Party of {size} guests exceeds the maximum of {max}")]
    PartyTooLarge { size: u32, max: u32 },

    #[error("Stay of {nights} nights exceeds the maximum of {max}")]
    StayTooLong { nights: u32, max: u32 },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ServerError::Quote(QuoteError::InvalidDate(_)) => (StatusCode::BAD_REQUEST, "invalid_date"),
            ServerError::Quote(QuoteError::InvalidStayRange { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_stay_range")
            }
            ServerError::Quote(QuoteError::ChildAgesMismatch { .. }) => {
                (StatusCode::BAD_REQUEST, "child_ages_mismatch")
            }
            ServerError::InvalidBody(rejection) => (rejection.status(), "invalid_body"),
            ServerError::PartyTooLarge { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "party_too_large"),
            ServerError::StayTooLong { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "stay_too_long"),
            ServerError::Render(_) | ServerError::Internal(_) | ServerError::IoError(_) => {
                error!("quote request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };

        let body = ErrorResponse {
            error_type: error_type.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    engine: Arc<EngineConfig>,
    max_party_size: u32,
    max_stay_nights: u32,
}

impl AppState {
    pub fn new(catalog: Catalog, engine: EngineConfig, server: &ServerConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            engine: Arc::new(engine),
            max_party_size: server.max_party_size,
            max_stay_nights: server.max_stay_nights,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/quote", post(quote_flat))
        .route("/api/quote/structured", post(quote_structured))
        .route("/api/quote/xml", post(quote_xml))
        .with_state(state)
}

pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "quote service listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn quote_flat(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<BTreeMap<String, String>>, ServerError> {
    let Json(request) = payload?;
    let quote = run_quote(state, request).await?;
    Ok(Json(response::flatten(&quote)))
}

async fn quote_structured(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, ServerError> {
    let Json(request) = payload?;
    Ok(Json(run_quote(state, request).await?))
}

async fn quote_xml(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(request) = payload?;
    let quote = run_quote(state, request).await?;
    let xml = response::to_xml(&quote)?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

// The partition search is CPU-bound, so it runs on the blocking pool
async fn run_quote(state: AppState, request: QuoteRequest) -> Result<QuoteResponse, ServerError> {
    let size = request.party_size();
    if size > state.max_party_size {
        return Err(ServerError::PartyTooLarge {
            size,
            max: state.max_party_size,
        });
    }

    let nights = request.stay()?.night_count();
    if nights > state.max_stay_nights {
        return Err(ServerError::StayTooLong {
            nights,
            max: state.max_stay_nights,
        });
    }

    tokio::task::spawn_blocking(move || {
        QuoteEngine::new(&state.catalog, &state.engine).quote(&request)
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))?
    .map_err(ServerError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{sample_dir, CatalogSource, JsonDirectorySource};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let catalog = JsonDirectorySource::new(sample_dir()).load().await.unwrap();
        router(AppState::new(catalog, EngineConfig::default(), &ServerConfig::default()))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_flat_quote() {
        let (status, body) = post_json(
            app().await,
            "/api/quote",
            json!({
                "checkin": "2025-07-01",
                "checkout": "2025-07-04",
                "adults": 2,
                "children": 1,
                "childAges": [5],
                "hotelId": 1
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let fields: BTreeMap<String, String> = serde_json::from_str(&body).unwrap();
        assert_eq!(fields["checkin"], "1 Temmuz Salı");
        assert_eq!(fields["nightsAndDays"], "3 Gece 4 Gün");
        assert_eq!(fields["guests"], "2 Yetişkin 1 Çocuk (5 Yaş)");
        assert_eq!(fields["hotelName_1"], "Sahil Palace");
        assert_eq!(fields["location_1"], "Antalya / Lara");
        assert_eq!(fields["roomTypeAndCount_1_a"], "1 Standard");
        assert_eq!(fields["ratePlan_1_a"], "Her Şey Dahil");
        // 3 x 5000 x 1.0
        assert_eq!(fields["finalPrice_1_a"], "15.000 TL");
        assert!(!fields.contains_key("hotelName_2"));
    }

    #[tokio::test]
    async fn test_structured_quote() {
        let (status, body) = post_json(
            app().await,
            "/api/quote/structured",
            json!({ "checkin": "2025-07-01", "checkout": "2025-07-03", "adults": 2 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["stay"]["checkin"], "2025-07-01");
        assert!(!value["hotels"].as_array().unwrap().is_empty());
        assert_eq!(value["hotels"][0]["offerings"][0]["room_count"], 1);
    }

    #[tokio::test]
    async fn test_xml_quote() {
        let (status, body) = post_json(
            app().await,
            "/api/quote/xml",
            json!({ "checkin": "2025-07-01", "checkout": "2025-07-03", "adults": 2, "hotel_id": 1 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<QuoteRS>"));
        assert!(body.contains("<Hotel id=\"1\" name=\"Sahil Palace\""));
    }

    #[tokio::test]
    async fn test_invalid_stay_range_is_rejected() {
        let (status, body) = post_json(
            app().await,
            "/api/quote",
            json!({ "checkin": "2025-07-04", "checkout": "2025-07-01", "adults": 2 }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error_type"], "invalid_stay_range");
    }

    #[tokio::test]
    async fn test_oversized_party_is_rejected() {
        let (status, body) = post_json(
            app().await,
            "/api/quote",
            json!({ "checkin": "2025-07-01", "checkout": "2025-07-02", "adults": 10, "children": 4, "child_ages": [1, 2, 3, 4] }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error_type"], "party_too_large");
    }

    #[tokio::test]
    async fn test_snake_case_field_names_are_accepted() {
        let (status, body) = post_json(
            app().await,
            "/api/quote",
            json!({
                "checkin": "2025-07-01",
                "checkout": "2025-07-04",
                "adults": 2,
                "children": 1,
                "child_ages": [5],
                "hotel_id": 2
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let fields: BTreeMap<String, String> = serde_json::from_str(&body).unwrap();
        assert_eq!(fields["hotelName_1"], "Çam Koru");
        // 3 x 2400 x 1.2
        assert_eq!(fields["finalPrice_1_a"], "8.640 TL");
        assert!(!fields.contains_key("hotelName_2"));
    }

    #[tokio::test]
    async fn test_overlong_stay_is_rejected() {
        let (status, body) = post_json(
            app().await,
            "/api/quote",
            json!({ "checkin": "-100000-01-01", "checkout": "+100000-01-01", "adults": 2 }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error_type"], "stay_too_long");

        let (status, _) = post_json(
            app().await,
            "/api/quote",
            json!({ "checkin": "2025-01-01", "checkout": "2026-01-02", "adults": 2 }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_json_error() {
        let (status, body) = post_json(
            app().await,
            "/api/quote",
            json!({ "checkin": "2025-07-01", "checkout": "2025-07-04", "adults": -2 }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error_type"], "invalid_body");
        assert!(error["message"].as_str().unwrap().starts_with("Invalid request body"));

        let request = Request::builder()
            .method("POST")
            .uri("/api/quote")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error["error_type"], "invalid_body");
    }
}
