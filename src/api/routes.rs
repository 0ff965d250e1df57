//! JSON API route definitions.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{routing::get, Json, Router};
use futures::stream::{self, Stream};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use super::state::AppState;
use super::ApiError;
use crate::alerts::AlertId;
use crate::dashboard::DashboardError;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/alerts", get(list_alerts))
        .route("/alerts/{id}", get(get_alert))
        .route(
            "/selection",
            get(get_selection).put(put_selection).delete(clear_selection),
        )
        .route("/metrics", get(metrics))
        .route("/chart", get(chart))
        .route("/events", get(events))
}

fn meta() -> Value {
    json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    })
}

async fn health() -> Json<Value> {
    Json(json!({
        "data": {
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION")
        },
        "meta": meta()
    }))
}

async fn list_alerts(State(state): State<AppState>) -> Json<Value> {
    let alerts = state.dashboard.alerts().await;
    Json(json!({ "data": alerts, "meta": { "total": alerts.len() } }))
}

async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = AlertId::new(id);
    let alert = state
        .dashboard
        .alert(&id)
        .await
        .ok_or(DashboardError::UnknownAlert(id))?;
    Ok(Json(json!({ "data": alert, "meta": meta() })))
}

async fn get_selection(State(state): State<AppState>) -> Json<Value> {
    let selected = state.dashboard.selected().await;
    Json(json!({ "data": selected, "meta": meta() }))
}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    id: AlertId,
}

async fn put_selection(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<Value>, ApiError> {
    let alert = state.dashboard.select(&req.id).await?;
    Ok(Json(json!({ "data": alert, "meta": meta() })))
}

async fn clear_selection(State(state): State<AppState>) -> Json<Value> {
    let selected = state.dashboard.clear_selection().await;
    Json(json!({ "data": selected, "meta": meta() }))
}

async fn metrics(State(state): State<AppState>) -> Json<Value> {
    let metrics = state.dashboard.metrics().await;
    Json(json!({ "data": metrics, "meta": meta() }))
}

async fn chart(State(state): State<AppState>) -> Json<Value> {
    let series = state.dashboard.chart().await;
    Json(json!({ "data": series, "meta": { "total": series.len() } }))
}

/// Live feed of dashboard changes as Server-Sent Events.
async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.dashboard.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(feed_event) => match Event::default()
                    .event(feed_event.kind())
                    .json_data(&feed_event)
                {
                    Ok(event) => return Some((Ok::<_, Infallible>(event), rx)),
                    Err(e) => warn!(error = %e, "failed to encode feed event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscriber lagging, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
