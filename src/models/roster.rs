//! Roster: a schedule and its hour ledger, mutated in lock-step.

use serde::{Deserialize, Serialize};

use super::{Ledger, Role, Schedule, SchedulingContext, Violation};
use crate::error::{EngineError, EngineResult};

/// A [`Schedule`] together with the [`Ledger`] of hours it implies.
///
/// Every mutation goes through `assign` / `unassign`, so a worker's
/// ledgered hours always equal the summed durations of the shifts the
/// schedule gives them. `Clone` produces an independent deep snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    schedule: Schedule,
    ledger: Ledger,
}

impl Roster {
    /// Creates an empty roster with one record per shift and every
    /// worker at zero hours.
    pub fn new(ctx: &SchedulingContext) -> Self {
        let mut schedule = Schedule::new();
        for shift in ctx.shifts() {
            schedule.insert_record(shift.id.clone());
        }
        let ledger = Ledger::with_workers(ctx.workers().iter().map(|w| w.id.as_str()));
        Self { schedule, ledger }
    }

    /// The schedule.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// The hour ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Places `worker_id` on `shift_id` in `role` and credits the hours.
    ///
    /// Eligibility is not checked here; see [`crate::eligibility`].
    ///
    /// # Errors
    /// - Unknown worker or shift.
    /// - [`EngineError::DuplicateAssignment`] if the worker already
    ///   holds any role on the shift.
    pub fn assign(
        &mut self,
        ctx: &SchedulingContext,
        worker_id: &str,
        shift_id: &str,
        role: Role,
    ) -> EngineResult<()> {
        ctx.worker(worker_id)?;
        let shift = ctx.shift(shift_id)?;
        let record = self.record_mut(ctx, shift_id)?;
        if record.contains(worker_id) {
            return Err(EngineError::DuplicateAssignment {
                worker: worker_id.to_string(),
                shift: shift_id.to_string(),
            });
        }
        record.push(role, worker_id.to_string());
        self.ledger
            .credit(worker_id, shift_id, shift.duration_hours());
        Ok(())
    }

    /// Removes `worker_id` from `role` on `shift_id` and debits the hours.
    ///
    /// # Errors
    /// - Unknown worker or shift.
    /// - [`EngineError::NotAssigned`] if the worker does not hold `role`
    ///   on the shift.
    pub fn unassign(
        &mut self,
        ctx: &SchedulingContext,
        worker_id: &str,
        shift_id: &str,
        role: Role,
    ) -> EngineResult<()> {
        ctx.worker(worker_id)?;
        let shift = ctx.shift(shift_id)?;
        let record = self.record_mut(ctx, shift_id)?;
        if !record.remove(role, worker_id) {
            return Err(EngineError::NotAssigned {
                worker: worker_id.to_string(),
                shift: shift_id.to_string(),
                role,
            });
        }
        self.ledger
            .debit(worker_id, shift_id, shift.duration_hours());
        Ok(())
    }

    /// Removes every worker from a shift, returning who held which role.
    pub fn clear_shift(
        &mut self,
        ctx: &SchedulingContext,
        shift_id: &str,
    ) -> EngineResult<Vec<(String, Role)>> {
        let removed: Vec<(String, Role)> = self
            .record_mut(ctx, shift_id)?
            .assigned()
            .map(|(w, role)| (w.to_string(), role))
            .collect();
        for (worker_id, role) in &removed {
            self.unassign(ctx, worker_id, shift_id, *role)?;
        }
        Ok(removed)
    }

    /// Flags a shift as understaffed.
    pub fn mark_shortfall(
        &mut self,
        ctx: &SchedulingContext,
        shift_id: &str,
        message: impl Into<String>,
    ) -> EngineResult<()> {
        self.record_mut(ctx, shift_id)?.mark_shortfall(message.into());
        Ok(())
    }

    /// Appends a schedule-level violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.schedule.add_violation(violation);
    }

    fn record_mut(
        &mut self,
        ctx: &SchedulingContext,
        shift_id: &str,
    ) -> EngineResult<&mut super::ShiftAssignment> {
        match self.schedule.record_mut(shift_id) {
            Some(record) => Ok(record),
            None => Err(EngineError::UnknownShift {
                id: shift_id.to_string(),
                known: ctx.shifts().iter().map(|s| s.id.clone()).collect(),
            }),
        }
    }
}
