//! HTTP transport shell
//!
//! A thin axum layer over the pipeline: JSON in, JSON out, every failure
//! serialized as the `{"error": message}` envelope with a status code
//! per error category.

use crate::error::ForecastError;
use crate::pipeline::{ForecastRequest, ForecastResponse, Pipeline};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

/// Build the service router
pub fn create_router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/predict_stock", post(predict_stock))
        .with_state(pipeline)
}

/// Bind and serve until shutdown
pub async fn serve(pipeline: Arc<Pipeline>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(pipeline);
    let addr = format!("{host}:{port}");
    tracing::info!("forecast server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

/// `POST /predict_stock` — train per-feature models and forecast
///
/// The body is taken raw and parsed by hand; an unparseable body must
/// produce the same `{"error": ...}` envelope as every other failure,
/// not the framework's plain-text rejection.
async fn predict_stock(
    State(pipeline): State<Arc<Pipeline>>,
    body: String,
) -> Result<Json<ForecastResponse>, ApiError> {
    let request = parse_body(&body)?;
    let response = pipeline.predict(request).await.map_err(|e| {
        warn!("forecast request failed: {}", e);
        e
    })?;
    Ok(Json(response))
}

fn parse_body(raw: &str) -> Result<ForecastRequest, ApiError> {
    let body: Value =
        serde_json::from_str(raw).map_err(|e| invalid(&format!("malformed JSON body: {e}")))?;
    parse_request(&body)
}

/// Pull the request fields out by hand so a body with missing or
/// mistyped fields still gets the standard error envelope.
fn parse_request(body: &Value) -> Result<ForecastRequest, ApiError> {
    let ticker = body
        .get("ticker")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing or non-string field: ticker"))?
        .to_string();

    // Accept a number or a numeric string, as the reference coerced ints
    let days = match body.get("days") {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| invalid("days must be a positive integer"))?,
        Some(Value::String(s)) => s
            .parse::<u64>()
            .map_err(|_| invalid("days must be a positive integer"))?,
        _ => return Err(invalid("missing field: days")),
    };
    let days = days as usize;

    let period = body
        .get("period")
        .and_then(Value::as_str)
        .unwrap_or("max")
        .to_string();

    Ok(ForecastRequest { ticker, days, period })
}

fn invalid(msg: &str) -> ApiError {
    ApiError(ForecastError::InvalidInput(msg.to_string()))
}

/// Wraps [`ForecastError`] for HTTP responses
#[derive(Debug)]
pub struct ApiError(pub ForecastError);

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            ForecastError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ForecastError::NoData(_) => StatusCode::NOT_FOUND,
            ForecastError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ForecastError::Training(_)
            | ForecastError::Http(_)
            | ForecastError::Tensor(_)
            | ForecastError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.0.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}
