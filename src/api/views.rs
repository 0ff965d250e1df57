//! Server-rendered dashboard page.

use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::Router;

use super::state::AppState;
use super::ApiError;
use crate::alerts::metrics::group_thousands;
use crate::alerts::{Alert, AlertId};
use crate::dashboard::DashboardSnapshot;

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/select/{id}", post(select_alert))
}

struct FeedRow {
    id: String,
    ip: String,
    location: String,
    risk: &'static str,
    selected: bool,
}

struct DetailPanel {
    ip: String,
    location: String,
    device: String,
    os: String,
    browser: String,
    rtt: u32,
    timestamp: String,
    reason: String,
    is_attack: bool,
}

impl From<&Alert> for DetailPanel {
    fn from(alert: &Alert) -> Self {
        Self {
            ip: alert.ip.clone(),
            location: alert.location(),
            device: alert.device.clone(),
            os: alert.os.clone(),
            browser: alert.browser.clone(),
            rtt: alert.rtt,
            timestamp: alert.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            reason: alert.reason.clone(),
            is_attack: alert.is_attack,
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage {
    refresh_secs: u64,
    total_logins: String,
    suspicious_count: usize,
    accounts_at_risk: usize,
    rows: Vec<FeedRow>,
    detail: Option<DetailPanel>,
}

impl DashboardPage {
    fn new(snapshot: &DashboardSnapshot, refresh_secs: u64) -> Self {
        let selected_id = snapshot.selected.as_ref().map(|a| &a.id);
        let rows = snapshot
            .alerts
            .iter()
            .map(|a| FeedRow {
                id: a.id.to_string(),
                ip: a.ip.clone(),
                location: a.location(),
                risk: a.risk_level.as_str(),
                selected: selected_id == Some(&a.id),
            })
            .collect();

        Self {
            refresh_secs,
            total_logins: group_thousands(snapshot.metrics.total_logins),
            suspicious_count: snapshot.metrics.suspicious_count,
            accounts_at_risk: snapshot.metrics.accounts_at_risk,
            rows,
            detail: snapshot.selected.as_ref().map(DetailPanel::from),
        }
    }
}

async fn dashboard_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let snapshot = state.dashboard.snapshot().await;
    let refresh_secs = state.refresh.as_secs().max(1);
    let page = DashboardPage::new(&snapshot, refresh_secs);
    Ok(Html(page.render()?))
}

async fn select_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    state.dashboard.select(&AlertId::new(id)).await?;
    Ok(Redirect::to("/"))
}
