use serde::Serialize;

use super::AlertStore;

/// Total-logins figure shown before any generated alert arrives.
pub const DEFAULT_TOTAL_LOGINS_BASELINE: u64 = 53_201;

/// The three headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyMetrics {
    /// Baseline plus every alert appended since the seed.
    pub total_logins: u64,
    /// Alerts whose risk level is not `Low`.
    pub suspicious_count: usize,
    /// Alerts classified as attacks.
    pub accounts_at_risk: usize,
}

impl KeyMetrics {
    pub fn compute(store: &AlertStore, seed_len: usize, baseline: u64) -> Self {
        let growth = store.len().saturating_sub(seed_len) as u64;
        Self {
            total_logins: baseline + growth,
            suspicious_count: store.iter().filter(|a| a.is_suspicious()).count(),
            accounts_at_risk: store.iter().filter(|a| a.is_attack).count(),
        }
    }
}

/// Render `n` with comma thousands separators, e.g. `53,201`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
