//! Shift staffing engine.
//!
//! Assigns a pool of workers to time-boxed shifts under hard eligibility
//! rules, while optimizing preference satisfaction, workload fairness,
//! and labor cost.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Worker`, `Shift`, `PreferenceTable`,
//!   `Schedule`, `Ledger`, `Roster`, `SchedulingContext`
//! - **`validation`**: Input integrity checks (duplicate IDs, staffing
//!   shape, time ranges, unknown references)
//! - **`eligibility`**: Hard rules deciding who may take which seat
//! - **`fairness`**: Pulls hour ranges toward an even share of demand
//! - **`scheduler`**: Greedy construction, simulated annealing, budget
//!   reduction, scoring, and KPIs
//! - **`engine`**: The full pipeline behind one config
//!
//! # Example
//!
//! ```
//! use u_roster::models::{Day, Preference, PreferenceTable, SchedulingContext, Shift, SkillRank, TimeOfDay, Worker};
//! use u_roster::scheduler::AnnealingConfig;
//! use u_roster::{EngineConfig, ScheduleEngine};
//!
//! let workers = vec![
//!     Worker::new("W1", SkillRank::LabLead),
//!     Worker::new("W2", SkillRank::OfficeHours),
//! ];
//! let shifts = vec![
//!     Shift::lab("L1", Day::Tuesday, TimeOfDay::hm(13, 0), TimeOfDay::hm(15, 0), 0, 1),
//!     Shift::office_hours("O1", Day::Monday, TimeOfDay::hm(9, 0), TimeOfDay::hm(10, 0), 1),
//! ];
//! let prefs = PreferenceTable::new()
//!     .with("W1", "L1", Preference::Preferred)
//!     .with("W2", "O1", Preference::Available);
//! let mut ctx = SchedulingContext::new(workers, shifts, prefs).unwrap();
//!
//! let config = EngineConfig::default()
//!     .with_annealing(AnnealingConfig::default().with_iterations(100).with_seed(1));
//! let output = ScheduleEngine::new(config).run(&mut ctx).unwrap();
//! assert_eq!(output.roster.schedule().assignment_count(), 2);
//! ```
//!
//! # Logging
//!
//! Progress and shortfalls are emitted through `tracing`. The crate
//! installs no subscriber.
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

pub mod eligibility;
pub mod engine;
pub mod error;
pub mod fairness;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use engine::{EngineConfig, EngineOutput, ReductionSummary, ScheduleEngine};
pub use error::{EngineError, EngineResult};
pub use fairness::{apply_fairness, FairnessConfig, FairnessPolicy, FairnessReport};
