use std::collections::VecDeque;

use super::{Alert, AlertId};

/// Ordered in-memory alert collection, newest first.
///
/// The only mutation is [`AlertStore::prepend`]; records are never edited
/// or removed once inserted.
#[derive(Debug, Default, Clone)]
pub struct AlertStore {
    alerts: VecDeque<Alert>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store whose order is exactly `alerts` (index 0 is newest).
    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        Self {
            alerts: alerts.into(),
        }
    }

    /// Insert `alert` at the head, keeping every existing record in place.
    pub fn prepend(&mut self, alert: Alert) {
        self.alerts.push_front(alert);
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn first(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    pub fn get(&self, id: &AlertId) -> Option<&Alert> {
        self.alerts.iter().find(|a| &a.id == id)
    }

    pub fn contains(&self, id: &AlertId) -> bool {
        self.get(id).is_some()
    }

    pub fn to_vec(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a AlertStore {
    type Item = &'a Alert;
    type IntoIter = std::collections::vec_deque::Iter<'a, Alert>;

    fn into_iter(self) -> Self::IntoIter {
        self.alerts.iter()
    }
}
