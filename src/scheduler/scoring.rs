//! Candidate scoring, schedule scoring, and labor cost.
//!
//! # Candidate score
//!
//! ```text
//! score = preference + balance_boost + experience_adjustment + companion_bonus
//! ```
//!
//! | Term | Value |
//! |------|-------|
//! | preference | 0 / 1 / 2 |
//! | balance_boost | `2 × max(0, min − hours) / min` (0 when `min = 0`) |
//! | experience_adjustment | `−0.1` if inexperienced and the shift already holds a novice |
//! | companion_bonus | `0.1 ×` companions on the shift |
//!
//! The schedule score weights each assignment's candidate score by its
//! role (lead 1.0, lab-TA 0.8, OH 0.6).

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{Ledger, Roster, SchedulingContext, Worker};

/// Multiplier on the relative hour deficit.
pub const BALANCE_WEIGHT: f64 = 2.0;
/// Penalty for pairing novices on one shift.
pub const INEXPERIENCE_PENALTY: f64 = 0.1;
/// Bonus per companion already on the shift.
pub const COMPANION_BONUS: f64 = 0.1;

/// Hourly pay rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayRates {
    /// Rate for regular workers.
    pub regular: f64,
    /// Rate for senior workers.
    pub senior: f64,
}

impl Default for PayRates {
    fn default() -> Self {
        Self {
            regular: 17.43,
            senior: 19.60,
        }
    }
}

impl PayRates {
    pub fn with_regular(mut self, rate: f64) -> Self {
        self.regular = rate;
        self
    }

    pub fn with_senior(mut self, rate: f64) -> Self {
        self.senior = rate;
        self
    }

    /// Hourly rate for a worker.
    #[inline]
    pub fn rate_for(&self, worker: &Worker) -> f64 {
        if worker.senior {
            self.senior
        } else {
            self.regular
        }
    }

    /// Rate averaged over the workforce, weighted by senior/regular
    /// head count. Falls back to the regular rate with no workers.
    pub fn blended_rate(&self, workers: &[Worker]) -> f64 {
        if workers.is_empty() {
            return self.regular;
        }
        let seniors = workers.iter().filter(|w| w.senior).count() as f64;
        let regulars = workers.len() as f64 - seniors;
        (seniors * self.senior + regulars * self.regular) / workers.len() as f64
    }

    /// Validates the rates.
    pub fn validate(&self) -> Result<(), String> {
        for (name, rate) in [("regular", self.regular), ("senior", self.senior)] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(format!("{name} pay rate must be positive, got {rate}"));
            }
        }
        Ok(())
    }
}

/// Desirability of `worker_id` on `shift_id` given the roster so far.
///
/// Every worker already on the shift counts toward the experience term,
/// `worker_id` included, so a novice scored in place is always penalized.
/// Only other workers count as companions.
pub fn candidate_score(
    ctx: &SchedulingContext,
    roster: &Roster,
    worker_id: &str,
    shift_id: &str,
) -> EngineResult<f64> {
    let worker = ctx.worker(worker_id)?;
    ctx.shift(shift_id)?;

    let preference = f64::from(ctx.preference(worker_id, shift_id).score());

    let hours = roster.ledger().hours(worker_id);
    let balance_boost = if worker.min_hours > 0.0 {
        BALANCE_WEIGHT * (worker.min_hours - hours).max(0.0) / worker.min_hours
    } else {
        0.0
    };

    let mut novice_on_shift = false;
    let mut companions = 0usize;
    if let Some(record) = roster.schedule().record(shift_id) {
        for (assigned_id, _) in record.assigned() {
            if !ctx.worker(assigned_id)?.experienced {
                novice_on_shift = true;
            }
            if assigned_id != worker_id && worker.is_companion(assigned_id) {
                companions += 1;
            }
        }
    }
    let experience_adjustment = if !worker.experienced && novice_on_shift {
        -INEXPERIENCE_PENALTY
    } else {
        0.0
    };

    Ok(preference + balance_boost + experience_adjustment + COMPANION_BONUS * companions as f64)
}

/// Role-weighted sum of candidate scores over every assignment.
pub fn schedule_score(ctx: &SchedulingContext, roster: &Roster) -> EngineResult<f64> {
    let mut total = 0.0;
    for (shift_id, record) in roster.schedule().iter() {
        for (worker_id, role) in record.assigned() {
            total += role.weight() * candidate_score(ctx, roster, worker_id, shift_id)?;
        }
    }
    Ok(total)
}

/// Labor cost: Σ hours × rate over every worker in the context.
pub fn total_cost(ctx: &SchedulingContext, ledger: &Ledger, rates: &PayRates) -> f64 {
    ctx.workers()
        .iter()
        .map(|w| ledger.hours(&w.id) * rates.rate_for(w))
        .sum()
}
