//! Roster construction, optimization, and evaluation.
//!
//! # Pipeline
//!
//! 1. [`GreedyInitializer`] builds a first roster, scarcest roles first.
//! 2. [`AnnealingRunner`] refines it by random evict-and-replace swaps.
//! 3. [`BudgetReducer`] optionally trims whole shifts to fit a budget.
//!
//! [`scoring`] provides the candidate score, the schedule score and
//! labor cost; [`ScheduleKpi`] summarizes a finished roster.
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

mod annealing;
mod greedy;
mod kpi;
mod reducer;
pub mod scoring;

pub use annealing::{AnnealingConfig, AnnealingResult, AnnealingRunner, AnnealingStats};
pub use greedy::GreedyInitializer;
pub use kpi::ScheduleKpi;
pub use reducer::{BudgetReducer, ReducerConfig, ReductionOutcome, ReductionStatus};
pub use scoring::PayRates;
