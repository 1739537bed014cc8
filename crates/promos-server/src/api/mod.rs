mod maintenance;
mod products;
mod promotions;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use promos_ingest::{ParserRegistry, RemoteFileClient};
use serde::Serialize;
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id, RequestId};
use crate::views;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub parsers: Arc<ParserRegistry>,
    pub fetcher: RemoteFileClient,
    /// Show error chains on the error page instead of the generic message.
    pub debug: bool,
}

/// An error rendered as the HTML error page.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    request_id: Option<String>,
    detail: Option<String>,
}

impl PageError {
    /// Logs `error` and builds a 500 page. The error chain is only shown to
    /// the client when `debug` is set.
    pub(super) fn internal(
        request_id: &RequestId,
        debug: bool,
        error: impl Into<anyhow::Error>,
    ) -> Self {
        let error: anyhow::Error = error.into();
        let chain = format!("{error:#}");
        tracing::error!(request_id = %request_id.0, error = %chain, "error occurred");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            request_id: Some(request_id.0.clone()),
            detail: debug.then_some(chain),
        }
    }

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            request_id: None,
            detail: None,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let page = views::error_page(
            self.status,
            self.request_id.as_deref(),
            self.detail.as_deref(),
        );
        (self.status, Html(page.into_string())).into_response()
    }
}

/// JSON error body returned by the upload endpoint.
#[derive(Debug, Serialize)]
pub struct UploadError {
    status: &'static str,
    message: String,
}

impl UploadError {
    pub(super) fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(products::index))
        .route("/clear", get(maintenance::clear_db))
        .route("/promotions", get(promotions::list_promotions))
        .route(
            "/promotions/upload",
            get(promotions::upload_form).post(promotions::upload_promotions),
        )
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn not_found() -> PageError {
    PageError::not_found()
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
