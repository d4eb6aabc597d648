//! JSON API for the storefront UI and the voice agent bridge.
//!
//! - `GET    /api/products`            catalog, optionally filtered by query keys
//! - `GET    /api/categories`          sorted category slugs
//! - `POST   /api/extract`             run the extractor over `{ "text": ... }`
//! - `GET    /api/session`             current filters, summary and visible products
//! - `POST   /api/session/transcript`  one transcribed chat message
//! - `POST   /api/session/data`        one data-channel packet
//! - `DELETE /api/session/filters`     user-initiated clear
//! - `PATCH  /api/session/filters`     manual filter panel edits

use axum::{
    extract::{rejection::JsonRejection, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use storefront_core::{
    decode_filter_query, ApplicationError, DataPacket, ExtractedFilters, FilterChange, FilterState,
    FilterSummary, InterfaceError, ManualFilterEdit, PacketOutcome, Product, TranscriptMessage,
    TranscriptOutcome,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DataRequest {
    #[serde(default)]
    pub topic: Option<String>,
    pub payload: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub filters: FilterState,
    pub summary: FilterSummary,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct SessionUpdate {
    pub change: FilterChange,
    pub filters: FilterState,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    fn new(error: ApplicationError) -> Self {
        let correlation_id = Uuid::new_v4().to_string();
        warn!(
            event_name = "system.api.request_failed",
            correlation_id = %correlation_id,
            error = %error,
            "api request failed"
        );
        Self(error.into_interface(correlation_id))
    }
}

impl From<ApplicationError> for ApiError {
    fn from(value: ApplicationError) -> Self {
        Self::new(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::new(ApplicationError::InvalidInput(value.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self.0 {
            InterfaceError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
            InterfaceError::ServiceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
            }
            InterfaceError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        let body = ErrorBody {
            error,
            message: self.0.user_message().to_string(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/categories", get(list_categories))
        .route("/api/extract", post(extract))
        .route("/api/session", get(session_view))
        .route("/api/session/transcript", post(post_transcript))
        .route("/api/session/data", post(post_data))
        .route("/api/session/filters", delete(clear_filters).patch(edit_filters))
        .with_state(state)
}

async fn list_products(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Product>>, ApiError> {
    let filters = match query.as_deref() {
        Some(query) => decode_filter_query(query).map_err(ApplicationError::from)?,
        None => FilterState::default(),
    };
    Ok(Json(state.engine.apply(state.catalog.products(), &filters)))
}

async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.categories())
}

async fn extract(
    State(state): State<AppState>,
    body: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractedFilters>, ApiError> {
    let Json(request) = body?;
    if request.text.trim().is_empty() {
        return Err(ApplicationError::InvalidInput("text must not be empty".to_string()).into());
    }
    Ok(Json(state.extractor.extract(&request.text)))
}

async fn session_view(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    let products = session.visible_products(state.catalog.products());
    let summary = FilterSummary::describe(session.filters(), state.catalog.len(), products.len());
    Json(SessionView { filters: session.filters().clone(), summary, products })
}

async fn post_transcript(
    State(state): State<AppState>,
    body: Result<Json<TranscriptMessage>, JsonRejection>,
) -> Result<Json<TranscriptOutcome>, ApiError> {
    let Json(message) = body?;
    let outcome = state.session.lock().await.on_transcript(&message);
    Ok(Json(outcome))
}

async fn post_data(
    State(state): State<AppState>,
    body: Result<Json<DataRequest>, JsonRejection>,
) -> Result<Json<PacketOutcome>, ApiError> {
    let Json(request) = body?;
    let mut packet = DataPacket::from_text(request.payload);
    packet.topic = request.topic;
    let outcome = state.session.lock().await.on_data_packet(&packet);
    Ok(Json(outcome))
}

async fn clear_filters(State(state): State<AppState>) -> Json<SessionUpdate> {
    let mut session = state.session.lock().await;
    let change = session.clear_all();
    info!(event_name = "session.filters.cleared", ?change, "filters cleared by user");
    Json(SessionUpdate { change, filters: session.filters().clone() })
}

/// Applies every edit in order. The reported change is `updated` when any
/// edit altered the state.
async fn edit_filters(
    State(state): State<AppState>,
    body: Result<Json<Vec<ManualFilterEdit>>, JsonRejection>,
) -> Result<Json<SessionUpdate>, ApiError> {
    let Json(edits) = body?;
    let mut session = state.session.lock().await;
    let mut change = FilterChange::Unchanged;
    for edit in edits {
        if session.apply_manual(edit) != FilterChange::Unchanged {
            change = FilterChange::Updated;
        }
    }
    Ok(Json(SessionUpdate { change, filters: session.filters().clone() }))
}
