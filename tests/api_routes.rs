//! HTTP surface tests, driven through the router without a socket.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use futures::StreamExt;
use loginsentry::alerts::{seed, AlertId};
use loginsentry::generator::AlertFactory;
use loginsentry::api::{self, state::AppState};
use loginsentry::dashboard::{Dashboard, SharedDashboard};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

fn app() -> (Router, SharedDashboard) {
    let dashboard = SharedDashboard::new(Dashboard::from_seed(seed::embedded(), 53_201));
    let router = api::router(AppState {
        dashboard: dashboard.clone(),
        refresh: Duration::from_secs(5),
    });
    (router, dashboard)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, Method::GET, uri, None).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let (status, json) = get_json(app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert!(json["data"]["version"].is_string());
}

#[tokio::test]
async fn test_list_alerts_in_store_order() {
    let (app, _) = app();
    let (status, json) = get_json(app, "/api/v1/alerts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["total"], 4);
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a1", "a2", "a3", "a4"]);
    assert_eq!(json["data"][0]["riskLevel"], "High");
}

#[tokio::test]
async fn test_get_alert_and_unknown_id() {
    let (app, _) = app();
    let (status, json) = get_json(app.clone(), "/api/v1/alerts/a2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["city"], "Mumbai");

    let (status, json) = get_json(app, "/api/v1/alerts/zzz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("zzz"));
}

#[tokio::test]
async fn test_selection_lifecycle() {
    let (app, dashboard) = app();

    let (_, json) = get_json(app.clone(), "/api/v1/selection").await;
    assert_eq!(json["data"]["id"], "a1");

    let (status, body) = send(
        app.clone(),
        Method::PUT,
        "/api/v1/selection",
        Some(r#"{"id":"a4"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["city"], "Oslo");
    assert_eq!(dashboard.selected().await.unwrap().id.as_str(), "a4");

    let (status, _) = send(
        app.clone(),
        Method::PUT,
        "/api/v1/selection",
        Some(r#"{"id":"missing"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(dashboard.selected().await.unwrap().id.as_str(), "a4");

    let (status, body) = send(app, Method::DELETE, "/api/v1/selection", None).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["id"], "a1");
}

#[tokio::test]
async fn test_metrics_and_chart() {
    let (app, _) = app();

    let (_, json) = get_json(app.clone(), "/api/v1/metrics").await;
    assert_eq!(json["data"]["total_logins"], 53_201);
    assert_eq!(json["data"]["suspicious_count"], 3);
    assert_eq!(json["data"]["accounts_at_risk"], 2);

    let (_, json) = get_json(app, "/api/v1/chart").await;
    assert_eq!(json["meta"]["total"], 3);
    assert_eq!(json["data"][1]["time"], "23:39");
    assert_eq!(json["data"][1]["alerts"], 2);
}

#[tokio::test]
async fn test_dashboard_page_and_click() {
    let (app, dashboard) = app();

    let (status, body) = send(app.clone(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Real-time Alerts"));
    assert!(html.contains("Alert Details: 81.2.69.142"));

    let (status, _) = send(app.clone(), Method::POST, "/select/a3", None).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(dashboard.selected().await.unwrap().id.as_str(), "a3");

    let (status, _) = send(app, Method::POST, "/select/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = app();
    let (status, body) = send(app, Method::GET, "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"not found");
}

#[tokio::test]
async fn test_click_on_id_with_reserved_characters() {
    let mut alerts = seed::embedded();
    alerts[3].id = AlertId::from("eu/oslo-1");
    let dashboard = SharedDashboard::new(Dashboard::from_seed(alerts, 0));
    let app = api::router(AppState {
        dashboard: dashboard.clone(),
        refresh: Duration::from_secs(5),
    });

    let (_, body) = send(app.clone(), Method::GET, "/", None).await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains(r#"action="/select/eu%2Foslo-1""#));

    let (status, _) = send(app, Method::POST, "/select/eu%2Foslo-1", None).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(dashboard.selected().await.unwrap().id.as_str(), "eu/oslo-1");
}

#[tokio::test]
async fn test_events_stream_delivers_appended_alert() {
    let (app, dashboard) = app();
    let request = Request::builder()
        .uri("/api/v1/events")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

    let alert = AlertFactory::new().synthesize(chrono::Utc::now());
    let id = alert.id.to_string();
    dashboard.append(alert).await;

    let mut frames = response.into_body().into_data_stream();
    let frame = tokio::time::timeout(Duration::from_secs(5), frames.next())
        .await
        .expect("no event within timeout")
        .expect("stream ended")
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();

    assert!(text.contains("event: alert_added"), "frame: {}", text);
    let data = text
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .expect("frame has no data line");
    let payload: Value = serde_json::from_str(data).unwrap();
    assert_eq!(payload["type"], "alert_added");
    assert_eq!(payload["alert"]["id"], id.as_str());
    assert_eq!(payload["alert"]["city"], "Tokyo");
}
