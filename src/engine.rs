//! End-to-end roster pipeline.
//!
//! Fairness → greedy → annealing → (optional) budget reduction, driven by
//! one [`EngineConfig`]. Performs no I/O; callers load the context and
//! persist the output.

use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::fairness::{apply_fairness, FairnessConfig, FairnessReport};
use crate::models::{Roster, SchedulingContext};
use crate::scheduler::scoring::{schedule_score, total_cost};
use crate::scheduler::{
    AnnealingConfig, AnnealingRunner, AnnealingStats, BudgetReducer, GreedyInitializer,
    PayRates, ReducerConfig, ReductionStatus,
};

/// Pipeline configuration.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use u_roster::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{"budget": 1500.0}"#).unwrap();
/// assert_eq!(config.budget, Some(1500.0));
/// assert_eq!(config.annealing.iterations, 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fairness settings; `None` skips equalization.
    pub fairness: Option<FairnessConfig>,
    /// Annealing settings.
    pub annealing: AnnealingConfig,
    /// Reducer settings (used only with a budget).
    pub reducer: ReducerConfig,
    /// Pay rates for cost.
    pub rates: PayRates,
    /// Target budget; `None` skips reduction.
    pub budget: Option<f64>,
    /// Record greedy shortfalls as schedule violations too.
    pub shortfall_violations: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fairness: Some(FairnessConfig::default()),
            annealing: AnnealingConfig::default(),
            reducer: ReducerConfig::default(),
            rates: PayRates::default(),
            budget: None,
            shortfall_violations: false,
        }
    }
}

impl EngineConfig {
    pub fn with_fairness(mut self, fairness: Option<FairnessConfig>) -> Self {
        self.fairness = fairness;
        self
    }

    pub fn with_annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.annealing = annealing;
        self
    }

    pub fn with_reducer(mut self, reducer: ReducerConfig) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn with_rates(mut self, rates: PayRates) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_shortfall_violations(mut self, record: bool) -> Self {
        self.shortfall_violations = record;
        self
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(fairness) = &self.fairness {
            fairness.validate()?;
        }
        self.annealing.validate()?;
        self.reducer.validate()?;
        self.rates.validate()?;
        if let Some(budget) = self.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(format!("budget must be a non-negative number, got {budget}"));
            }
        }
        Ok(())
    }
}

/// Budget reduction summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionSummary {
    pub status: ReductionStatus,
    pub removed_shifts: Vec<String>,
    pub initial_cost: f64,
    pub final_cost: f64,
    pub floor: f64,
}

/// Pipeline output.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Final roster.
    pub roster: Roster,
    /// Schedule score of `roster`.
    pub score: f64,
    /// Labor cost of `roster`.
    pub cost: f64,
    /// Score of the greedy roster.
    pub greedy_score: f64,
    /// Annealing counters.
    pub annealing: AnnealingStats,
    /// Fairness changes, when equalization ran.
    pub fairness: Option<FairnessReport>,
    /// Reduction summary, when a budget was set.
    pub reduction: Option<ReductionSummary>,
}

/// Runs the full pipeline.
#[derive(Debug, Clone, Default)]
pub struct ScheduleEngine {
    config: EngineConfig,
}

impl ScheduleEngine {
    /// Creates an engine.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the pipeline on `ctx`. Worker hour bounds in `ctx` reflect
    /// fairness and reduction afterwards.
    ///
    /// # Errors
    /// Invalid configuration, a context that already had fairness
    /// applied (when fairness is enabled), or unknown IDs.
    pub fn run(&self, ctx: &mut SchedulingContext) -> EngineResult<EngineOutput> {
        self.run_with_cancel(ctx, None)
    }

    /// Runs with a cancellation flag observed by the annealing stage.
    pub fn run_with_cancel(
        &self,
        ctx: &mut SchedulingContext,
        cancel: Option<Arc<AtomicBool>>,
    ) -> EngineResult<EngineOutput> {
        self.config.validate().map_err(EngineError::InvalidConfig)?;

        let fairness = match &self.config.fairness {
            Some(fairness_config) => Some(apply_fairness(ctx, fairness_config)?),
            None => None,
        };

        let greedy = GreedyInitializer::new()
            .with_violations(self.config.shortfall_violations)
            .build(ctx)?;
        let annealed =
            AnnealingRunner::run_with_cancel(ctx, greedy, &self.config.annealing, cancel)?;
        let greedy_score = annealed.initial_score;

        let (roster, reduction) = match self.config.budget {
            Some(budget) => {
                let outcome = BudgetReducer::new(self.config.reducer.clone())
                    .with_rates(self.config.rates)
                    .reduce(ctx, &annealed.best, budget)?;
                let summary = ReductionSummary {
                    status: outcome.status,
                    removed_shifts: outcome.removed_shifts,
                    initial_cost: outcome.initial_cost,
                    final_cost: outcome.final_cost,
                    floor: outcome.floor,
                };
                (outcome.roster, Some(summary))
            }
            None => (annealed.best, None),
        };

        let score = schedule_score(ctx, &roster)?;
        let cost = total_cost(ctx, roster.ledger(), &self.config.rates);

        info!(
            greedy_score,
            score,
            cost,
            assignments = roster.schedule().assignment_count(),
            "engine run finished"
        );

        Ok(EngineOutput {
            roster,
            score,
            cost,
            greedy_score,
            annealing: annealed.stats,
            fairness,
            reduction,
        })
    }
}
