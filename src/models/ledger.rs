//! Hour ledger.
//!
//! Running totals of assigned hours per worker, together with the
//! shifts each worker currently holds. Only [`Roster`](super::Roster)
//! mutates a ledger, always in the same step as the schedule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tolerance for hour comparisons after repeated add/subtract.
pub(crate) const HOURS_EPSILON: f64 = 1e-9;

/// Worker ID → assigned hours and held shifts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    hours: BTreeMap<String, f64>,
    held: BTreeMap<String, Vec<String>>,
}

impl Ledger {
    /// Creates a ledger with every worker at zero hours.
    pub fn with_workers<'a>(worker_ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ledger = Self::default();
        for id in worker_ids {
            ledger.hours.insert(id.to_string(), 0.0);
            ledger.held.insert(id.to_string(), Vec::new());
        }
        ledger
    }

    /// Hours assigned to a worker (0 if unknown).
    pub fn hours(&self, worker_id: &str) -> f64 {
        self.hours.get(worker_id).copied().unwrap_or(0.0)
    }

    /// Shifts currently held by a worker.
    pub fn shifts_of(&self, worker_id: &str) -> &[String] {
        self.held.get(worker_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over `(worker_id, hours)` in worker ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.hours.iter().map(|(id, h)| (id.as_str(), *h))
    }

    /// Number of workers tracked.
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    /// Whether no workers are tracked.
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// Sum of hours across all workers.
    pub fn total_hours(&self) -> f64 {
        self.hours.values().sum()
    }

    /// Mean hours across all tracked workers (0 when empty).
    pub fn mean_hours(&self) -> f64 {
        if self.hours.is_empty() {
            0.0
        } else {
            self.total_hours() / self.hours.len() as f64
        }
    }

    /// Population standard deviation of hours across all workers.
    pub fn hours_std_dev(&self) -> f64 {
        population_std_dev(self.hours.values().copied())
    }

    pub(crate) fn credit(&mut self, worker_id: &str, shift_id: &str, hours: f64) {
        *self.hours.entry(worker_id.to_string()).or_insert(0.0) += hours;
        self.held
            .entry(worker_id.to_string())
            .or_default()
            .push(shift_id.to_string());
    }

    pub(crate) fn debit(&mut self, worker_id: &str, shift_id: &str, hours: f64) {
        if let Some(h) = self.hours.get_mut(worker_id) {
            *h -= hours;
            if h.abs() < HOURS_EPSILON {
                *h = 0.0;
            }
        }
        if let Some(list) = self.held.get_mut(worker_id) {
            if let Some(pos) = list.iter().position(|s| s == shift_id) {
                list.remove(pos);
            }
        }
    }
}

/// Population standard deviation (0 for an empty sample).
pub(crate) fn population_std_dev(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = values.clone().count();
    if n == 0 {
        return 0.0;
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    variance.sqrt()
}
