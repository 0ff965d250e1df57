//! API layer -- axum routes, the HTML dashboard, and error mapping.

mod routes;
pub mod state;
mod views;

use self::state::AppState;
use crate::dashboard::DashboardError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error("failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Dashboard(DashboardError::UnknownAlert(_)) => StatusCode::NOT_FOUND,
            ApiError::Render(_) => {
                tracing::error!(error = %self, "page render failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the application router: HTML dashboard at `/`, JSON API under
/// `/api/v1`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(views::page_routes())
        .nest("/api/v1", routes::api_routes())
        .fallback(fallback)
        .with_state(state)
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}
