//! Budget-constrained shift removal.
//!
//! # Algorithm
//!
//! 1. Lower every worker's `min_hours` (never raise) to
//!    `floor_ratio × (budget / blended_rate) / worker_count`.
//! 2. While cost exceeds the budget: collect filled, fully staffed shifts
//!    whose removal keeps every assigned worker at or above their floor.
//! 3. Remove the least important one, ordered by (priority, hour spread
//!    after removal, ID). Whole shifts only.
//! 4. Stop when within budget, when nothing is removable, or at the
//!    removal cap.
//!
//! Stopping over budget is not an error: the outcome carries a
//! [`ReductionStatus`] and the schedule gets a matching [`Violation`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use super::scoring::{total_cost, PayRates};
use crate::error::{EngineError, EngineResult};
use crate::models::{population_std_dev, Roster, SchedulingContext, Shift, Violation, HOURS_EPSILON};

/// Budget reducer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducerConfig {
    /// Floor as a fraction of the affordable per-worker share.
    pub floor_ratio: f64,
    /// Maximum shifts removed in one run.
    pub max_removals: usize,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            floor_ratio: 0.9,
            max_removals: 100,
        }
    }
}

impl ReducerConfig {
    pub fn with_floor_ratio(mut self, ratio: f64) -> Self {
        self.floor_ratio = ratio;
        self
    }

    pub fn with_max_removals(mut self, n: usize) -> Self {
        self.max_removals = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.floor_ratio.is_finite() || self.floor_ratio < 0.0 {
            return Err(format!("floor_ratio must be non-negative, got {}", self.floor_ratio));
        }
        Ok(())
    }
}

/// How a reduction run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReductionStatus {
    /// Cost is at or below the budget.
    WithinBudget,
    /// Over budget, but every remaining shift is protected by a floor.
    Unreachable,
    /// Over budget after the maximum number of removals.
    IterationCapReached,
}

impl ReductionStatus {
    /// Whether the budget was met.
    pub fn is_success(self) -> bool {
        self == ReductionStatus::WithinBudget
    }
}

/// Result of a reduction run.
#[derive(Debug, Clone)]
pub struct ReductionOutcome {
    /// The reduced roster.
    pub roster: Roster,
    /// How the run ended.
    pub status: ReductionStatus,
    /// Removed shift IDs, in removal order.
    pub removed_shifts: Vec<String>,
    /// Cost before any removal.
    pub initial_cost: f64,
    /// Cost after the last removal.
    pub final_cost: f64,
    /// Hour floor applied to every worker.
    pub floor: f64,
}

/// Removes whole shifts until the roster fits a budget.
#[derive(Debug, Clone, Default)]
pub struct BudgetReducer {
    config: ReducerConfig,
    rates: PayRates,
}

impl BudgetReducer {
    /// Creates a reducer with default pay rates.
    pub fn new(config: ReducerConfig) -> Self {
        Self {
            config,
            rates: PayRates::default(),
        }
    }

    /// Sets the pay rates used for cost.
    pub fn with_rates(mut self, rates: PayRates) -> Self {
        self.rates = rates;
        self
    }

    /// Hour floor affordable at `budget`, split evenly over the workforce.
    pub fn affordable_floor(&self, ctx: &SchedulingContext, budget: f64) -> f64 {
        if ctx.worker_count() == 0 {
            return 0.0;
        }
        let affordable_hours = budget / self.rates.blended_rate(ctx.workers());
        self.config.floor_ratio * affordable_hours / ctx.worker_count() as f64
    }

    /// Lowers floors, then removes shifts until `budget` is met or no
    /// further removal is allowed. The input roster is left untouched.
    ///
    /// # Errors
    /// - [`EngineError::InvalidConfig`] for a negative or non-finite
    ///   budget or a bad config.
    /// - Unknown IDs in the roster.
    pub fn reduce(
        &self,
        ctx: &mut SchedulingContext,
        roster: &Roster,
        budget: f64,
    ) -> EngineResult<ReductionOutcome> {
        self.config.validate().map_err(EngineError::InvalidConfig)?;
        self.rates.validate().map_err(EngineError::InvalidConfig)?;
        if !budget.is_finite() || budget < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "budget must be a non-negative number, got {budget}"
            )));
        }

        let floor = self.affordable_floor(ctx, budget);
        self.lower_floors(ctx, floor)?;
        let ctx: &SchedulingContext = ctx;

        let mut roster = roster.clone();
        let initial_cost = total_cost(ctx, roster.ledger(), &self.rates);
        let mut removed_shifts = Vec::new();

        let status = loop {
            let cost = total_cost(ctx, roster.ledger(), &self.rates);
            if cost <= budget + HOURS_EPSILON {
                break ReductionStatus::WithinBudget;
            }
            if removed_shifts.len() >= self.config.max_removals {
                break ReductionStatus::IterationCapReached;
            }

            let Some(shift) = self.pick_removal(ctx, &roster)? else {
                break ReductionStatus::Unreachable;
            };
            roster.clear_shift(ctx, &shift.id)?;
            debug!(
                shift = %shift.id,
                priority = shift.priority(),
                cost_before = cost,
                "removed shift"
            );
            removed_shifts.push(shift.id.clone());
        };

        let final_cost = total_cost(ctx, roster.ledger(), &self.rates);
        let violation = match status {
            ReductionStatus::WithinBudget => None,
            ReductionStatus::Unreachable => {
                warn!(final_cost, budget, "budget unreachable: no removable shift left");
                Some(Violation::budget_unreachable(format!(
                    "cost {final_cost:.2} exceeds budget {budget:.2}; no remaining shift is removable"
                )))
            }
            ReductionStatus::IterationCapReached => {
                warn!(
                    final_cost,
                    budget,
                    removals = removed_shifts.len(),
                    "reduction stopped at removal cap"
                );
                Some(Violation::reduction_cap_reached(format!(
                    "cost {final_cost:.2} exceeds budget {budget:.2} after {} removals",
                    removed_shifts.len()
                )))
            }
        };
        if let Some(v) = violation {
            // a re-run on the same state reports the same condition once
            if !roster.schedule().violations().contains(&v) {
                roster.add_violation(v);
            }
        }

        info!(
            ?status,
            initial_cost,
            final_cost,
            removed = removed_shifts.len(),
            "budget reduction finished"
        );

        Ok(ReductionOutcome {
            roster,
            status,
            removed_shifts,
            initial_cost,
            final_cost,
            floor,
        })
    }

    fn lower_floors(&self, ctx: &mut SchedulingContext, floor: f64) -> EngineResult<()> {
        let lowered: Vec<(String, f64)> = ctx
            .workers()
            .iter()
            .filter(|w| floor < w.min_hours)
            .map(|w| (w.id.clone(), w.max_hours))
            .collect();
        for (worker_id, max_hours) in lowered {
            debug!(worker = %worker_id, new_min = floor, "lowered hour floor");
            ctx.set_hour_bounds(&worker_id, floor, max_hours)?;
        }
        Ok(())
    }

    /// Least important removable shift, if any.
    fn pick_removal<'a>(
        &self,
        ctx: &'a SchedulingContext,
        roster: &Roster,
    ) -> EngineResult<Option<&'a Shift>> {
        let mut best: Option<(u32, f64, &'a Shift)> = None;
        for shift in ctx.shifts() {
            if !self.is_removable(ctx, roster, shift)? {
                continue;
            }
            let candidate = (shift.priority(), spread_after_removal(roster, shift), shift);
            let better = match &best {
                None => true,
                Some(current) => removal_order(&candidate, current) == Ordering::Less,
            };
            if better {
                best = Some(candidate);
            }
        }
        Ok(best.map(|(_, _, shift)| shift))
    }

    fn is_removable(&self, ctx: &SchedulingContext, roster: &Roster, shift: &Shift) -> EngineResult<bool> {
        let Some(record) = roster.schedule().record(&shift.id) else {
            return Ok(false);
        };
        if !record.is_filled() || record.is_infeasible() {
            return Ok(false);
        }
        let duration = shift.duration_hours();
        for (worker_id, _) in record.assigned() {
            let worker = ctx.worker(worker_id)?;
            if roster.ledger().hours(worker_id) - duration < worker.min_hours - HOURS_EPSILON {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn removal_order(a: &(u32, f64, &Shift), b: &(u32, f64, &Shift)) -> Ordering {
    a.0.cmp(&b.0)
        .then(a.1.total_cmp(&b.1))
        .then_with(|| a.2.id.cmp(&b.2.id))
}

/// Population std dev of ledgered hours if `shift` were cleared.
fn spread_after_removal(roster: &Roster, shift: &Shift) -> f64 {
    let duration = shift.duration_hours();
    let record = roster.schedule().record(&shift.id);
    let hours: Vec<f64> = roster
        .ledger()
        .iter()
        .map(|(worker_id, h)| {
            if record.is_some_and(|r| r.contains(worker_id)) {
                h - duration
            } else {
                h
            }
        })
        .collect();
    population_std_dev(hours.iter().copied())
}
