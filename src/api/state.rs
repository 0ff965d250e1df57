use std::time::Duration;

use crate::dashboard::SharedDashboard;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: SharedDashboard,
    /// Page auto-refresh cadence; follows the generator period.
    pub refresh: Duration,
}
