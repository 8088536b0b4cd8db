//! Roster quality metrics (KPIs).
//!
//! Computes summary indicators from a finished roster and its context.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Score | Role-weighted candidate score sum |
//! | Cost | Σ hours × pay rate |
//! | Coverage | filled seats / required seats |
//! | Hour spread | Population std dev of ledgered hours |
//! | Below floor | Workers with hours < `min_hours` |

use crate::error::EngineResult;
use crate::models::{Roster, SchedulingContext, HOURS_EPSILON};

use super::scoring::{schedule_score, total_cost, PayRates};

/// Roster performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Schedule score.
    pub score: f64,
    /// Labor cost.
    pub cost: f64,
    /// Seats requested across all shifts.
    pub required_seats: usize,
    /// Seats filled across all shifts.
    pub filled_seats: usize,
    /// Fraction of requested seats filled (0.0..1.0; 1.0 when none requested).
    pub coverage_rate: f64,
    /// Shifts flagged as understaffed.
    pub infeasible_shifts: Vec<String>,
    /// Shifts requesting seats with nobody assigned.
    pub empty_shifts: Vec<String>,
    /// Mean ledgered hours per worker.
    pub mean_hours: f64,
    /// Population std dev of ledgered hours.
    pub hours_std_dev: f64,
    /// Workers below their `min_hours`, in ID order.
    pub workers_below_min: Vec<String>,
}

impl ScheduleKpi {
    /// Computes KPIs for a roster.
    pub fn calculate(
        ctx: &SchedulingContext,
        roster: &Roster,
        rates: &PayRates,
    ) -> EngineResult<Self> {
        let schedule = roster.schedule();
        let ledger = roster.ledger();

        let mut required_seats = 0usize;
        let mut filled_seats = 0usize;
        let mut infeasible_shifts = Vec::new();
        let mut empty_shifts = Vec::new();

        for shift in ctx.shifts() {
            let required = shift.staffing.total() as usize;
            required_seats += required;
            let Some(record) = schedule.record(&shift.id) else {
                continue;
            };
            filled_seats += record.filled_count();
            if record.is_infeasible() {
                infeasible_shifts.push(shift.id.clone());
            }
            if required > 0 && !record.is_filled() {
                empty_shifts.push(shift.id.clone());
            }
        }

        let coverage_rate = if required_seats == 0 {
            1.0
        } else {
            filled_seats as f64 / required_seats as f64
        };

        let workers_below_min = ctx
            .workers()
            .iter()
            .filter(|w| ledger.hours(&w.id) < w.min_hours - HOURS_EPSILON)
            .map(|w| w.id.clone())
            .collect();

        Ok(Self {
            score: schedule_score(ctx, roster)?,
            cost: total_cost(ctx, ledger, rates),
            required_seats,
            filled_seats,
            coverage_rate,
            infeasible_shifts,
            empty_shifts,
            mean_hours: ledger.mean_hours(),
            hours_std_dev: ledger.hours_std_dev(),
            workers_below_min,
        })
    }

    /// Whether the roster meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_coverage: f64, max_cost: f64) -> bool {
        self.coverage_rate >= min_coverage && self.cost <= max_cost
    }
}
