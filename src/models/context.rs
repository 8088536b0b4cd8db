//! Scheduling context.
//!
//! Owns the workers, shifts, and preference table of one scheduling
//! run, together with ID indices built once at construction. Every
//! engine component receives the context explicitly; there is no
//! process-wide lookup state.

use std::collections::HashMap;

use super::{Preference, PreferenceTable, Shift, Worker};
use crate::error::{EngineError, EngineResult};
use crate::validation::validate_input;

/// All input data for a scheduling run.
///
/// Workers are kept sorted by ID, so every iteration over them (and
/// therefore every eligibility list) is reproducible for identical
/// inputs. Shifts keep their input order.
///
/// Worker hour bounds are the only mutable state. They change only
/// through [`apply_fairness`](crate::fairness::apply_fairness) and the
/// budget reducer.
#[derive(Debug, Clone)]
pub struct SchedulingContext {
    workers: Vec<Worker>,
    shifts: Vec<Shift>,
    preferences: PreferenceTable,
    worker_index: HashMap<String, usize>,
    shift_index: HashMap<String, usize>,
    fairness_applied: bool,
}

impl SchedulingContext {
    /// Builds a context after validating the input.
    ///
    /// # Errors
    /// [`EngineError::InvalidInput`] with every detected problem.
    pub fn new(
        mut workers: Vec<Worker>,
        shifts: Vec<Shift>,
        preferences: PreferenceTable,
    ) -> EngineResult<Self> {
        validate_input(&workers, &shifts, &preferences).map_err(EngineError::InvalidInput)?;

        workers.sort_by(|a, b| a.id.cmp(&b.id));
        let worker_index = workers
            .iter()
            .enumerate()
            .map(|(i, w)| (w.id.clone(), i))
            .collect();
        let shift_index = shifts
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();

        Ok(Self {
            workers,
            shifts,
            preferences,
            worker_index,
            shift_index,
            fairness_applied: false,
        })
    }

    /// Workers in ID order.
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Shifts in input order.
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// The preference table.
    pub fn preferences(&self) -> &PreferenceTable {
        &self.preferences
    }

    /// Looks up a worker by ID.
    ///
    /// # Errors
    /// [`EngineError::UnknownWorker`] listing the known IDs.
    pub fn worker(&self, id: &str) -> EngineResult<&Worker> {
        self.worker_index
            .get(id)
            .map(|&i| &self.workers[i])
            .ok_or_else(|| EngineError::UnknownWorker {
                id: id.to_string(),
                known: self.workers.iter().map(|w| w.id.clone()).collect(),
            })
    }

    /// Looks up a shift by ID.
    ///
    /// # Errors
    /// [`EngineError::UnknownShift`] listing the known IDs.
    pub fn shift(&self, id: &str) -> EngineResult<&Shift> {
        self.shift_index
            .get(id)
            .map(|&i| &self.shifts[i])
            .ok_or_else(|| EngineError::UnknownShift {
                id: id.to_string(),
                known: self.shifts.iter().map(|s| s.id.clone()).collect(),
            })
    }

    /// Preference of a worker for a shift (`Unavailable` if absent).
    #[inline]
    pub fn preference(&self, worker_id: &str, shift_id: &str) -> Preference {
        self.preferences.get(worker_id, shift_id)
    }

    /// Number of workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Whether fairness equalization already ran on this context.
    pub fn fairness_applied(&self) -> bool {
        self.fairness_applied
    }

    pub(crate) fn mark_fairness_applied(&mut self) {
        self.fairness_applied = true;
    }

    /// Overwrites a worker's hour bounds.
    pub(crate) fn set_hour_bounds(&mut self, worker_id: &str, min_hours: f64, max_hours: f64) -> EngineResult<()> {
        let idx = match self.worker_index.get(worker_id) {
            Some(&i) => i,
            None => return self.worker(worker_id).map(|_| ()),
        };
        let worker = &mut self.workers[idx];
        worker.min_hours = min_hours;
        worker.max_hours = max_hours;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, SkillRank, TimeOfDay};

    fn sample_context() -> SchedulingContext {
        let workers = vec![
            Worker::new("W2", SkillRank::OfficeHours),
            Worker::new("W1", SkillRank::LabLead),
        ];
        let shifts = vec![Shift::office_hours(
            "S1",
            Day::Monday,
            TimeOfDay::hm(9, 0),
            TimeOfDay::hm(10, 0),
            1,
        )];
        let prefs = PreferenceTable::new().with("W1", "S1", Preference::Preferred);
        SchedulingContext::new(workers, shifts, prefs).unwrap()
    }

    #[test]
    fn test_workers_sorted_by_id() {
        let ctx = sample_context();
        let ids: Vec<&str> = ctx.workers().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["W1", "W2"]);
    }

    #[test]
    fn test_lookups() {
        let ctx = sample_context();
        assert_eq!(ctx.worker("W2").unwrap().skill, SkillRank::OfficeHours);
        assert_eq!(ctx.shift("S1").unwrap().day, Day::Monday);
        assert_eq!(ctx.preference("W1", "S1"), Preference::Preferred);
        assert_eq!(ctx.preference("W2", "S1"), Preference::Unavailable);
    }

    #[test]
    fn test_unknown_lookup_is_error() {
        let ctx = sample_context();
        match ctx.worker("W9") {
            Err(EngineError::UnknownWorker { id, known }) => {
                assert_eq!(id, "W9");
                assert_eq!(known, vec!["W1".to_string(), "W2".to_string()]);
            }
            other => panic!("expected UnknownWorker, got {other:?}"),
        }
        assert!(matches!(ctx.shift("S9"), Err(EngineError::UnknownShift { .. })));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let workers = vec![
            Worker::new("W1", SkillRank::OfficeHours),
            Worker::new("W1", SkillRank::OfficeHours),
        ];
        let result = SchedulingContext::new(workers, vec![], PreferenceTable::new());
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_set_hour_bounds() {
        let mut ctx = sample_context();
        ctx.set_hour_bounds("W1", 3.0, 6.0).unwrap();
        let w = ctx.worker("W1").unwrap();
        assert!((w.min_hours - 3.0).abs() < 1e-10);
        assert!((w.max_hours - 6.0).abs() < 1e-10);
        assert!(ctx.set_hour_bounds("W9", 0.0, 1.0).is_err());
    }
}
