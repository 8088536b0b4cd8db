//! Eligibility rules.
//!
//! Pure predicates deciding whether a worker may take a role on a
//! shift given the roster built so far. Nothing here mutates state.
//!
//! # Rules (checked in order)
//!
//! | # | Rule | Fails when |
//! |---|------|------------|
//! | 1 | Availability | preference is `Unavailable` |
//! | 2 | Load balance | ledgered hours exceed the mean by more than 1 h |
//! | 3 | Skill | rank below the role minimum |
//! | 4 | Hour cap | shift duration would push hours past `max_hours` |
//! | 5 | Overlap | an already-held shift overlaps on the same day |
//! | 6 | One lab | the role is lab work and the worker holds a lab role |

use crate::error::EngineResult;
use crate::models::{Role, Roster, SchedulingContext, Shift, Worker, HOURS_EPSILON};

/// Hours above the mean at which a worker counts as overloaded.
pub const OVERLOAD_MARGIN_HOURS: f64 = 1.0;

/// Whether the worker's hours exceed the live mean by more than
/// [`OVERLOAD_MARGIN_HOURS`].
pub fn is_overloaded(roster: &Roster, worker_id: &str) -> bool {
    let ledger = roster.ledger();
    ledger.hours(worker_id) > ledger.mean_hours() + OVERLOAD_MARGIN_HOURS
}

/// Whether `shift` overlaps any shift the worker already holds.
pub fn has_time_conflict(
    ctx: &SchedulingContext,
    roster: &Roster,
    worker_id: &str,
    shift: &Shift,
) -> EngineResult<bool> {
    for held_id in roster.ledger().shifts_of(worker_id) {
        if ctx.shift(held_id)?.overlaps(shift) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether the worker holds a lead or lab-TA role anywhere.
pub fn holds_lab_role(roster: &Roster, worker_id: &str) -> bool {
    roster.schedule().iter().any(|(_, record)| {
        record
            .role_of(worker_id)
            .is_some_and(Role::is_lab_role)
    })
}

/// Whether taking `shift` would push the worker past `max_hours`.
pub fn would_exceed_max_hours(roster: &Roster, worker: &Worker, shift: &Shift) -> bool {
    roster.ledger().hours(&worker.id) + shift.duration_hours() > worker.max_hours + HOURS_EPSILON
}

/// Checks every eligibility rule for one (worker, shift, role).
///
/// # Errors
/// Unknown worker or shift IDs.
pub fn is_eligible(
    ctx: &SchedulingContext,
    roster: &Roster,
    worker_id: &str,
    shift_id: &str,
    role: Role,
) -> EngineResult<bool> {
    let worker = ctx.worker(worker_id)?;
    let shift = ctx.shift(shift_id)?;

    if !ctx.preference(worker_id, shift_id).is_available() {
        return Ok(false);
    }
    if is_overloaded(roster, worker_id) {
        return Ok(false);
    }
    if !worker.has_rank(role.required_rank()) {
        return Ok(false);
    }
    if would_exceed_max_hours(roster, worker, shift) {
        return Ok(false);
    }
    if has_time_conflict(ctx, roster, worker_id, shift)? {
        return Ok(false);
    }
    if role.is_lab_role() && holds_lab_role(roster, worker_id) {
        return Ok(false);
    }
    Ok(true)
}

/// IDs of all workers eligible for `role` on `shift_id`, in ID order.
///
/// # Errors
/// Unknown shift ID.
pub fn eligible_workers(
    ctx: &SchedulingContext,
    roster: &Roster,
    shift_id: &str,
    role: Role,
) -> EngineResult<Vec<String>> {
    ctx.shift(shift_id)?;
    let mut eligible = Vec::new();
    for worker in ctx.workers() {
        if is_eligible(ctx, roster, &worker.id, shift_id, role)? {
            eligible.push(worker.id.clone());
        }
    }
    Ok(eligible)
}
