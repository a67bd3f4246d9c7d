//! In-memory JSON:API backend for the job tracker.
//!
//! Serves the same routes as the real backend (`/api/v1/postings`,
//! `/api/v1/me`, `/api/v1/users/{id}`) with enough behavior to exercise a
//! client end to end: token checks, filtering, sorting, pagination metadata
//! and JSON:API error documents.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

mod postings;
mod profile;

pub use postings::{Posting, PostingAttributes};
pub use profile::{Profile, ProfileAttributes};

pub const JSON_API: &str = "application/vnd.api+json";
pub const APP_TOKEN_HEADER: &str = "x-app-token";

/// Server behavior knobs.
#[derive(Debug, Clone)]
pub struct Settings {
    /// When set, every request must carry this value in `X-App-Token`.
    pub app_token: Option<String>,
    /// Upper bound applied to `page[size]`.
    pub max_page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_token: None,
            max_page_size: 100,
        }
    }
}

#[derive(Debug)]
pub struct Store {
    pub postings: Vec<Posting>,
    pub profile: Profile,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            postings: Vec::new(),
            profile: Profile::demo(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub settings: Arc<Settings>,
}

pub fn app() -> Router {
    app_with(Settings::default())
}

pub fn app_with(settings: Settings) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        settings: Arc::new(settings),
    };
    Router::new()
        .route(
            "/api/v1/postings",
            get(postings::list_postings).post(postings::create_posting),
        )
        .route(
            "/api/v1/postings/{id}",
            get(postings::get_posting).patch(postings::update_posting),
        )
        .route("/api/v1/me", get(profile::get_me))
        .route("/api/v1/users/{id}", patch(profile::update_user))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Settings::default()).await
}

pub async fn run_with(listener: TcpListener, settings: Settings) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(settings)).await
}

async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    if let Some(expected) = &state.settings.app_token {
        let given = headers.get(APP_TOKEN_HEADER).and_then(|v| v.to_str().ok());
        if given != Some(expected.as_str()) {
            tracing::debug!("rejecting request with bad app token");
            return error_response(StatusCode::UNAUTHORIZED, "Unauthorized", "Invalid application token.");
        }
    }
    let has_bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());
    if !has_bearer {
        return error_response(StatusCode::UNAUTHORIZED, "Unauthenticated", "Missing bearer token.");
    }
    next.run(request).await
}

// ---------------------------------------------------------------------------
// JSON:API wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<A> {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub attributes: A,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Document<D, M = serde_json::Value> {
    pub data: D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
}

/// Incoming `{ "data": { "type", "id"?, "attributes" } }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<A> {
    pub data: EnvelopeData<A>,
}

#[derive(Debug, Deserialize)]
pub struct EnvelopeData<A> {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: Option<String>,
    pub attributes: A,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorObject {
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

/// Handler error rendered as a JSON:API error document.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            title,
            detail: detail.into(),
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid", detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "Conflict", detail)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Malformed document", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status, self.title, &self.detail)
    }
}

fn error_response(status: StatusCode, title: &str, detail: &str) -> Response {
    let doc = ErrorDocument {
        errors: vec![ErrorObject {
            title: title.to_string(),
            detail: detail.to_string(),
        }],
    };
    json_api(status, doc)
}

/// `Json` with the JSON:API media type.
pub fn json_api<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_API));
    response
}

/// Check the envelope's `type` and, for updates, that `id` matches the path.
fn check_envelope<A>(data: &EnvelopeData<A>, kind: &str, path_id: Option<&str>) -> Result<(), ApiError> {
    if data.kind != kind {
        return Err(ApiError::conflict(format!(
            "Resource type '{}' does not match endpoint type '{kind}'.",
            data.kind
        )));
    }
    if let Some(path_id) = path_id {
        if data.id.as_deref() != Some(path_id) {
            return Err(ApiError::conflict("Resource id does not match the URL."));
        }
    }
    Ok(())
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
