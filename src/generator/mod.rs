//! Synthetic alert generator -- fabricates one fixed-content alert per
//! tick and appends it to the shared dashboard.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::alerts::{Alert, AlertId, RiskLevel};
use crate::dashboard::SharedDashboard;

/// Tick period used when configuration does not override it.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(5_000);

/// Builds generated alerts. Only `id` and `timestamp` vary between calls.
#[derive(Debug, Default)]
pub struct AlertFactory {
    last_millis: Option<i64>,
}

impl AlertFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fabricate the alert for a tick at `now`.
    ///
    /// Ids are `a<unix millis>`; two calls landing on the same millisecond
    /// (or a clock stepping backwards) get the next free value instead.
    pub fn synthesize(&mut self, now: DateTime<Utc>) -> Alert {
        let mut millis = now.timestamp_millis();
        if let Some(last) = self.last_millis {
            if millis <= last {
                millis = last + 1;
            }
        }
        self.last_millis = Some(millis);

        Alert {
            id: AlertId::new(format!("a{}", millis)),
            ip: "203.0.113.25".to_string(),
            timestamp: now,
            country: "Japan".to_string(),
            city: "Tokyo".to_string(),
            device: "Mobile".to_string(),
            os: "iOS 17".to_string(),
            browser: "Safari 17.0".to_string(),
            rtt: 150,
            risk_level: RiskLevel::Medium,
            is_attack: false,
            reason: "Suspicious login from a new device for this user account.".to_string(),
        }
    }
}

/// Running generator task. Dropping the handle stops further ticks,
/// including one already waiting on the dashboard lock;
/// [`GeneratorHandle::shutdown`] also waits for the task to exit.
#[derive(Debug)]
pub struct GeneratorHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<u64>>,
}

impl GeneratorHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the task and wait for it. Returns the number of ticks it
    /// produced.
    pub async fn shutdown(mut self) -> u64 {
        self.cancel.cancel();
        let Some(task) = self.task.take() else {
            return 0;
        };
        match task.await {
            Ok(ticks) => ticks,
            Err(e) => {
                warn!(error = %e, "generator task did not exit cleanly");
                0
            }
        }
    }
}

impl Drop for GeneratorHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel.cancel();
        }
    }
}

/// Start ticking every `period`, the first tick one full period from now.
///
/// `period` must be non-zero.
pub fn spawn(dashboard: SharedDashboard, period: Duration) -> GeneratorHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        info!(period_ms = period.as_millis() as u64, "alert generator started");

        let mut factory = AlertFactory::new();
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    let alert = factory.synthesize(Utc::now());
                    debug!(alert = %alert.id, tick = ticks + 1, "generated alert");
                    // A tick queued on the lock must not land after release.
                    if dashboard.append_if(alert, || !token.is_cancelled()).await {
                        ticks += 1;
                    }
                }
            }
        }

        info!(ticks, "alert generator stopped");
        ticks
    });

    GeneratorHandle {
        cancel,
        task: Some(task),
    }
}
