//! Greedy construction of the initial roster.
//!
//! # Algorithm
//!
//! 1. Order lab shifts by how many lead-rank workers are available for
//!    them (scarcest first), and office-hours shifts by (day, start).
//! 2. Fill every lab's lead seats, then every lab's lab-TA seats, then
//!    every office-hours shift's seats. Leads are placed system-wide
//!    first so an early lab cannot use up workers a later lab needs as
//!    its lead.
//! 3. Per (shift, role): rank eligible workers by candidate score
//!    (stable, so ties keep ID order) and take the top N open seats.
//!    A shortfall flags the shift and the run continues.
//!
//! # Complexity
//! O(s × w × c) where s=shifts, w=workers, c=cost of one eligibility check.

use tracing::{debug, warn};

use super::scoring::candidate_score;
use crate::eligibility::eligible_workers;
use crate::error::EngineResult;
use crate::models::{Role, Roster, SchedulingContext, Shift, SkillRank, Violation};

/// Builds the initial roster, most constrained roles first.
///
/// # Example
///
/// ```
/// use u_roster::models::{Day, Preference, PreferenceTable, SchedulingContext, Shift, SkillRank, TimeOfDay, Worker};
/// use u_roster::scheduler::GreedyInitializer;
///
/// let workers = vec![
///     Worker::new("W1", SkillRank::OfficeHours),
///     Worker::new("W2", SkillRank::OfficeHours),
/// ];
/// let shifts = vec![Shift::office_hours(
///     "S1", Day::Monday, TimeOfDay::hm(9, 0), TimeOfDay::hm(11, 0), 2,
/// )];
/// let prefs = PreferenceTable::new()
///     .with("W1", "S1", Preference::Preferred)
///     .with("W2", "S1", Preference::Preferred);
/// let ctx = SchedulingContext::new(workers, shifts, prefs).unwrap();
///
/// let roster = GreedyInitializer::new().build(&ctx).unwrap();
/// assert_eq!(roster.schedule().assignment_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyInitializer {
    record_violations: bool,
}

impl GreedyInitializer {
    /// Creates an initializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also records each shortfall as a schedule-level [`Violation`].
    pub fn with_violations(mut self, record: bool) -> Self {
        self.record_violations = record;
        self
    }

    /// Builds a roster from an empty one.
    pub fn build(&self, ctx: &SchedulingContext) -> EngineResult<Roster> {
        let mut roster = Roster::new(ctx);

        let (mut labs, mut office_hours): (Vec<&Shift>, Vec<&Shift>) =
            ctx.shifts().iter().partition(|s| s.is_lab);
        labs.sort_by_cached_key(|s| (lead_supply(ctx, s), s.id.clone()));
        office_hours.sort_by(|a, b| (a.day, a.start, &a.id).cmp(&(b.day, b.start, &b.id)));

        for shift in &labs {
            self.fill_role(ctx, &mut roster, shift, Role::Lead)?;
        }
        for shift in &labs {
            self.fill_role(ctx, &mut roster, shift, Role::LabTa)?;
        }
        for shift in &office_hours {
            self.fill_role(ctx, &mut roster, shift, Role::OhTa)?;
        }

        debug!(
            assignments = roster.schedule().assignment_count(),
            infeasible = roster.schedule().infeasible_shifts().len(),
            "greedy roster built"
        );
        Ok(roster)
    }

    fn fill_role(
        &self,
        ctx: &SchedulingContext,
        roster: &mut Roster,
        shift: &Shift,
        role: Role,
    ) -> EngineResult<()> {
        let needed = shift.staffing.seats(role) as usize;
        if needed == 0 {
            return Ok(());
        }

        let mut ranked = Vec::new();
        for worker_id in eligible_workers(ctx, roster, &shift.id, role)? {
            let score = candidate_score(ctx, roster, &worker_id, &shift.id)?;
            ranked.push((worker_id, score));
        }
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let filled = ranked.len().min(needed);
        for (worker_id, _) in ranked.into_iter().take(needed) {
            roster.assign(ctx, &worker_id, &shift.id, role)?;
        }

        if filled < needed {
            let message = format!("filled {filled}/{needed} {role} seats");
            warn!(shift = %shift.id, %role, filled, needed, "shift understaffed");
            if self.record_violations {
                roster.add_violation(Violation::role_shortfall(
                    shift.id.clone(),
                    message.clone(),
                ));
            }
            roster.mark_shortfall(ctx, &shift.id, message)?;
        }
        Ok(())
    }
}

/// Lead-rank workers who have not marked the shift unavailable.
fn lead_supply(ctx: &SchedulingContext, shift: &Shift) -> usize {
    ctx.workers()
        .iter()
        .filter(|w| w.has_rank(SkillRank::LabLead))
        .filter(|w| ctx.preference(&w.id, &shift.id).is_available())
        .count()
}
