//! The initial alert sequence a session starts from.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use super::{Alert, SeedError};

// Embedded default seed, in store order (newest first).
const DEFAULT_SEED_JSON: &str = include_str!("seed_alerts.json");

/// The compiled-in seed set.
pub fn embedded() -> Vec<Alert> {
    // Compile-time input; `test_embedded_seed_shape` parses it on every test run.
    parse(DEFAULT_SEED_JSON).expect("embedded seed alerts are invalid")
}

/// Parse a JSON array of alerts, rejecting repeated ids.
pub fn parse(json: &str) -> Result<Vec<Alert>, SeedError> {
    let alerts: Vec<Alert> = serde_json::from_str(json)?;

    let mut seen = HashSet::with_capacity(alerts.len());
    for alert in &alerts {
        if !seen.insert(&alert.id) {
            return Err(SeedError::DuplicateId(alert.id.clone()));
        }
    }

    Ok(alerts)
}

/// Read a seed file from disk.
pub fn load_file(path: &Path) -> Result<Vec<Alert>, SeedError> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Load the seed from `path` if given, falling back to the embedded set
/// when the file is missing or invalid.
pub fn load(path: Option<&Path>) -> Vec<Alert> {
    let Some(path) = path else {
        return embedded();
    };

    match load_file(path) {
        Ok(alerts) => {
            info!(path = %path.display(), count = alerts.len(), "loaded seed alerts");
            alerts
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "seed file unusable, using embedded seed");
            embedded()
        }
    }
}
