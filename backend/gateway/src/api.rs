use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;

use tradeforge_core::TradeError;
use tradeforge_extraction::normalize_extraction;
use tradeforge_notify::{AssessmentSummary, ChatworkNotifier, format_assessment_request};
use tradeforge_pricing::{PriceClient, listing_search};
use tradeforge_recognition::{ImagePayload, Recognizer};
use tradeforge_storage::{AssessmentStore, CustomerInput, DeviceInput};

/// Shared application state for API handlers.
pub struct AppState {
    pub store: AssessmentStore,
    pub recognizer: Option<Recognizer>,
    pub pricing: PriceClient,
    pub notifier: Option<ChatworkNotifier>,
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/ocr", post(run_ocr))
        .route("/api/assessments", post(save_assessment))
        .route("/api/customers", get(list_customers))
        .route("/api/price", post(fetch_price))
        .route("/api/listings", post(listing_prices))
        .route("/api/chatwork", post(post_chatwork))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct OcrRequest {
    image_base64: Option<String>,
}

/// Matches the original intake-form payload: snake_case customer/device
/// records plus an optional pre-built chat summary.
#[derive(Deserialize, Default)]
#[serde(default)]
struct AssessmentRequest {
    customer: CustomerInput,
    device: DeviceInput,
    chatwork_text: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PriceRequest {
    query: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ListingRequest {
    model_prefix: Option<String>,
    carrier: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ChatworkRequest {
    body: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "tradeforge",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Run OCR on a pasted screenshot and normalize the extracted fields.
async fn run_ocr(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OcrRequest>,
) -> (StatusCode, Json<Value>) {
    let image_base64 = req.image_base64.unwrap_or_default();
    if image_base64.trim().is_empty() {
        return bad_request("imageBase64 is required");
    }
    let Some(recognizer) = &state.recognizer else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "ok": false, "error": "no recognition provider configured" })),
        );
    };

    let image = ImagePayload::from_base64(&image_base64);
    match recognizer.recognize(&image).await {
        Ok(raw) => {
            let result = normalize_extraction(&raw);
            let warnings: Vec<String> =
                result.warnings.iter().map(ToString::to_string).collect();
            (
                StatusCode::OK,
                Json(json!({ "ok": true, "data": result.data, "warnings": warnings })),
            )
        }
        Err(TradeError::RateLimited { retry_after_secs }) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "ok": false,
                "error": "RATE_LIMIT",
                "retryAfterSeconds": retry_after_secs,
            })),
        ),
        Err(e) => {
            error!(error = %e, "OCR request failed");
            internal_error(&e.to_string())
        }
    }
}

/// Persist one assessment (customer upsert + device + assessment rows).
async fn save_assessment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssessmentRequest>,
) -> (StatusCode, Json<Value>) {
    // The form may send a pre-built chat summary; build one otherwise so the
    // stored record always carries the text that was (or would be) posted.
    let chatwork_text = req.chatwork_text.clone().unwrap_or_else(|| {
        format_assessment_request(&AssessmentSummary {
            model_name: req.device.model_name.as_deref(),
            capacity: req.device.capacity.as_deref(),
            imei: req.device.imei.as_deref(),
            condition: req.device.condition.as_deref(),
            battery: req.device.battery.as_deref(),
            notes: req.device.notes.as_deref(),
        })
    });

    match state
        .store
        .save_assessment(&req.customer, &req.device, Some(&chatwork_text))
        .await
    {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "customer_id": receipt.customer_id,
                "device_id": receipt.device_id,
                "assessment_id": receipt.assessment_id,
                "assessed_at": receipt.assessed_at,
            })),
        ),
        Err(e) => {
            error!(error = %e, "Failed to save assessment");
            internal_error(&e.to_string())
        }
    }
}

/// Recent intake-form customers, newest first.
async fn list_customers(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match state.store.recent_customers(50).await {
        Ok(customers) => {
            (StatusCode::OK, Json(json!({ "ok": true, "customers": customers })))
        }
        Err(e) => {
            error!(error = %e, "Failed to list customers");
            internal_error(&e.to_string())
        }
    }
}

/// Look up the reference buy-back price for a model query.
async fn fetch_price(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PriceRequest>,
) -> (StatusCode, Json<Value>) {
    let query = req.query.unwrap_or_default();
    if query.trim().is_empty() {
        return bad_request("query is required");
    }
    match state.pricing.fetch_reference_price(&query).await {
        Ok(price) => (StatusCode::OK, Json(json!({ "price": price }))),
        Err(e) => {
            error!(error = %e, "Price lookup failed");
            internal_error(&e.to_string())
        }
    }
}

/// Build the secondary listings-site search link for a model prefix.
async fn listing_prices(Json(req): Json<ListingRequest>) -> (StatusCode, Json<Value>) {
    let model_prefix = req.model_prefix.unwrap_or_default();
    if model_prefix.trim().is_empty() {
        return bad_request("modelPrefix is required");
    }
    let search = listing_search(&model_prefix, req.carrier.as_deref());
    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "geoUrl": search.url,
            "prices": { "unused": search.unused, "used": search.used },
            "carrier": search.carrier,
        })),
    )
}

/// Post a message to the configured Chatwork room.
async fn post_chatwork(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatworkRequest>,
) -> (StatusCode, Json<Value>) {
    let body = req.body.unwrap_or_default();
    if body.trim().is_empty() {
        return bad_request("body is required");
    }
    let Some(notifier) = &state.notifier else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "ok": false, "error": "Chatwork is not configured" })),
        );
    };
    match notifier.post_message(&body).await {
        Ok(reply) => (StatusCode::OK, Json(json!({ "ok": true, "r": reply }))),
        Err(e) => {
            error!(error = %e, "Chatwork post failed");
            internal_error(&e.to_string())
        }
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "ok": false, "error": message })))
}

fn internal_error(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "ok": false, "error": message })),
    )
}
