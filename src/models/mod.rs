//! Staffing domain models.
//!
//! Provides the core data types for representing a staffing problem
//! (workers, shifts, preferences) and its solution (a schedule kept in
//! lock-step with an hour ledger).
//!
//! # Domain Mappings
//!
//! | u-roster | Teaching | Clinic | Retail |
//! |----------|----------|--------|--------|
//! | Worker | TA / Fellow | Nurse | Associate |
//! | Shift | Office hours / Lab | Ward shift | Store shift |
//! | Role | OH-TA / Lab-TA / Lead | Nurse / Charge nurse | Clerk / Supervisor |
//! | Roster | Term schedule | Weekly rota | Weekly rota |

mod context;
mod ledger;
mod preference;
mod roster;
mod schedule;
mod shift;
mod worker;

pub use context::SchedulingContext;
pub use ledger::Ledger;
pub use preference::{Preference, PreferenceTable};
pub use roster::Roster;
pub use schedule::{Role, Schedule, ShiftAssignment, Violation, ViolationType};
pub use shift::{Day, ParseTimeError, Shift, Staffing, TimeOfDay};
pub use worker::{SkillRank, Worker};

pub(crate) use ledger::{population_std_dev, HOURS_EPSILON};
