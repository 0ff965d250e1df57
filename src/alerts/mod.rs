//! Alert records and the pure logic built on them: the ordered store,
//! the default-selection policy, and the metric/chart projections.

pub mod chart;
pub mod metrics;
pub mod seed;
pub mod selection;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::store::AlertStore;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("seed file is not a valid alert list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate alert id in seed: {0}")]
    DuplicateId(AlertId),
}

/// Stable identity of an alert within one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for AlertId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Severity classification of a login event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One simulated login event with its risk classification.
///
/// Field names serialize in camelCase (`riskLevel`, `isAttack`) so seed
/// files and API payloads keep the dashboard's data shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    pub ip: String,
    pub timestamp: DateTime<Utc>,
    pub country: String,
    pub city: String,
    pub device: String,
    pub os: String,
    pub browser: String,
    /// Round-trip time in milliseconds.
    pub rtt: u32,
    pub risk_level: RiskLevel,
    pub is_attack: bool,
    pub reason: String,
}

impl Alert {
    /// "City, Country" as shown in the feed and detail panel.
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    pub fn is_suspicious(&self) -> bool {
        self.risk_level != RiskLevel::Low
    }
}
