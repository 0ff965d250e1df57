//! Default-selection policy for the detail panel.

use super::{Alert, AlertId, RiskLevel};

/// Choose which alert is active.
///
/// An existing selection is returned unchanged. Otherwise the first
/// `High` alert in store order wins, then the first alert of any level,
/// and an empty sequence yields `None`.
pub fn choose_default<'a, I>(alerts: I, current: Option<&AlertId>) -> Option<AlertId>
where
    I: IntoIterator<Item = &'a Alert>,
{
    if let Some(current) = current {
        return Some(current.clone());
    }

    let mut first: Option<&AlertId> = None;
    for alert in alerts {
        if alert.risk_level == RiskLevel::High {
            return Some(alert.id.clone());
        }
        if first.is_none() {
            first = Some(&alert.id);
        }
    }
    first.cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::seed;

    fn with_levels(levels: &[RiskLevel]) -> Vec<Alert> {
        let template = seed::embedded().remove(0);
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| Alert {
                id: AlertId::new(format!("x{}", i)),
                risk_level: *level,
                ..template.clone()
            })
            .collect()
    }

    #[test]
    fn test_first_high_wins() {
        let alerts = with_levels(&[RiskLevel::Low, RiskLevel::High, RiskLevel::High]);
        assert_eq!(choose_default(&alerts, None), Some(AlertId::from("x1")));
    }

    #[test]
    fn test_falls_back_to_first_record() {
        let alerts = with_levels(&[RiskLevel::Medium, RiskLevel::Low]);
        assert_eq!(choose_default(&alerts, None), Some(AlertId::from("x0")));
    }

    #[test]
    fn test_empty_yields_none() {
        let alerts: Vec<Alert> = Vec::new();
        assert_eq!(choose_default(&alerts, None), None);
    }

    #[test]
    fn test_existing_selection_is_kept() {
        let alerts = with_levels(&[RiskLevel::High]);
        let current = AlertId::from("elsewhere");
        assert_eq!(
            choose_default(&alerts, Some(&current)),
            Some(current.clone())
        );
        // Repeat calls do not drift.
        assert_eq!(choose_default(&alerts, Some(&current)), Some(current));
    }
}
