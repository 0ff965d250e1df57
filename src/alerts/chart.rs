//! Alerts-over-time series for the chart panel.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::Serialize;

use super::Alert;

/// One point of the series: alerts whose timestamp falls in the minute
/// starting at `time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// `HH:MM` (UTC) label for the x axis.
    pub time: String,
    pub alerts: usize,
    #[serde(skip)]
    pub minute: DateTime<Utc>,
}

/// Bucket alerts by minute, oldest bucket first. Empty minutes are omitted.
pub fn alerts_per_minute<'a, I>(alerts: I) -> Vec<ChartPoint>
where
    I: IntoIterator<Item = &'a Alert>,
{
    let mut buckets: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
    for alert in alerts {
        let minute = alert
            .timestamp
            .duration_trunc(Duration::minutes(1))
            .unwrap_or(alert.timestamp);
        *buckets.entry(minute).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|(minute, alerts)| ChartPoint {
            time: minute.format("%H:%M").to_string(),
            alerts,
            minute,
        })
        .collect()
}
