//! Schedule (solution) model.
//!
//! A schedule maps every shift to the workers filling each of its roles.
//! Shifts that could not be fully staffed carry a shortfall flag and a
//! message; schedule-wide conditions (e.g. an unreachable budget) are
//! recorded as violations. Both are data, not errors: a partially
//! staffed schedule is still a useful result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::SkillRank;

/// A role on a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Leads a lab. Requires [`SkillRank::LabLead`].
    Lead,
    /// Assists in a lab. Requires [`SkillRank::LabAssistant`].
    LabTa,
    /// Staffs office hours. Requires [`SkillRank::OfficeHours`].
    OhTa,
}

impl Role {
    /// All roles, scarcest first.
    pub const ALL: [Role; 3] = [Role::Lead, Role::LabTa, Role::OhTa];

    /// Minimum skill rank to fill this role.
    pub fn required_rank(self) -> SkillRank {
        match self {
            Role::Lead => SkillRank::LabLead,
            Role::LabTa => SkillRank::LabAssistant,
            Role::OhTa => SkillRank::OfficeHours,
        }
    }

    /// Weight of the role in the schedule score.
    pub fn weight(self) -> f64 {
        match self {
            Role::Lead => 1.0,
            Role::LabTa => 0.8,
            Role::OhTa => 0.6,
        }
    }

    /// Whether the role counts toward the one-lab-per-worker rule.
    #[inline]
    pub fn is_lab_role(self) -> bool {
        matches!(self, Role::Lead | Role::LabTa)
    }

    /// Short key ("lead", "lab_ta", "oh_ta").
    pub fn key(self) -> &'static str {
        match self {
            Role::Lead => "lead",
            Role::LabTa => "lab_ta",
            Role::OhTa => "oh_ta",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Workers assigned to one shift, by role.
///
/// A worker appears at most once across the three role lists. The
/// lists keep insertion order so random picks over them are
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    leads: Vec<String>,
    lab_tas: Vec<String>,
    oh_tas: Vec<String>,
    infeasible: bool,
    shortfall: Option<String>,
}

impl ShiftAssignment {
    /// Workers filling `role`.
    pub fn workers(&self, role: Role) -> &[String] {
        match role {
            Role::Lead => &self.leads,
            Role::LabTa => &self.lab_tas,
            Role::OhTa => &self.oh_tas,
        }
    }

    /// All assigned workers with their roles (leads, lab-TAs, OH-TAs).
    pub fn assigned(&self) -> impl Iterator<Item = (&str, Role)> + '_ {
        Role::ALL.into_iter().flat_map(move |role| {
            self.workers(role)
                .iter()
                .map(move |w| (w.as_str(), role))
        })
    }

    /// Role held by `worker_id` on this shift, if any.
    pub fn role_of(&self, worker_id: &str) -> Option<Role> {
        self.assigned()
            .find(|(w, _)| *w == worker_id)
            .map(|(_, role)| role)
    }

    /// Whether `worker_id` holds any role on this shift.
    pub fn contains(&self, worker_id: &str) -> bool {
        self.role_of(worker_id).is_some()
    }

    /// Number of filled seats.
    pub fn filled_count(&self) -> usize {
        self.leads.len() + self.lab_tas.len() + self.oh_tas.len()
    }

    /// Whether at least one seat is filled.
    pub fn is_filled(&self) -> bool {
        self.filled_count() > 0
    }

    /// Roles with at least one assigned worker.
    pub fn nonempty_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|&r| !self.workers(r).is_empty())
            .collect()
    }

    /// Whether the shift could not be fully staffed.
    pub fn is_infeasible(&self) -> bool {
        self.infeasible
    }

    /// Why the shift is understaffed, if it is.
    pub fn shortfall(&self) -> Option<&str> {
        self.shortfall.as_deref()
    }

    fn workers_mut(&mut self, role: Role) -> &mut Vec<String> {
        match role {
            Role::Lead => &mut self.leads,
            Role::LabTa => &mut self.lab_tas,
            Role::OhTa => &mut self.oh_tas,
        }
    }

    pub(crate) fn push(&mut self, role: Role, worker_id: String) {
        self.workers_mut(role).push(worker_id);
    }

    pub(crate) fn remove(&mut self, role: Role, worker_id: &str) -> bool {
        let list = self.workers_mut(role);
        match list.iter().position(|w| w == worker_id) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn mark_shortfall(&mut self, message: String) {
        self.infeasible = true;
        self.shortfall = Some(match self.shortfall.take() {
            Some(prev) => format!("{prev}; {message}"),
            None => message,
        });
    }
}

/// A schedule-level condition worth surfacing to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (shift, worker, or empty for schedule-wide).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A shift role could not be fully staffed.
    RoleShortfall,
    /// Budget reduction stopped with cost still above target.
    BudgetUnreachable,
    /// Budget reduction hit its removal cap.
    ReductionCapReached,
}

impl Violation {
    /// Creates a role shortfall violation.
    pub fn role_shortfall(shift_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::RoleShortfall,
            entity_id: shift_id.into(),
            message: message.into(),
            severity: 70,
        }
    }

    /// Creates an unreachable-budget violation.
    pub fn budget_unreachable(message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::BudgetUnreachable,
            entity_id: String::new(),
            message: message.into(),
            severity: 60,
        }
    }

    /// Creates a reduction-cap violation.
    pub fn reduction_cap_reached(message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::ReductionCapReached,
            entity_id: String::new(),
            message: message.into(),
            severity: 50,
        }
    }
}

/// Shift ID → assignment record, plus schedule-level violations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    records: BTreeMap<String, ShiftAssignment>,
    violations: Vec<Violation>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assignment record for a shift.
    pub fn record(&self, shift_id: &str) -> Option<&ShiftAssignment> {
        self.records.get(shift_id)
    }

    /// Iterates over `(shift_id, record)` in shift ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShiftAssignment)> + '_ {
        self.records.iter().map(|(id, rec)| (id.as_str(), rec))
    }

    /// Number of shift records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the schedule has no shift records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total filled seats across all shifts.
    pub fn assignment_count(&self) -> usize {
        self.records.values().map(ShiftAssignment::filled_count).sum()
    }

    /// Shifts held by a worker, with the role on each.
    pub fn assignments_for_worker(&self, worker_id: &str) -> Vec<(&str, Role)> {
        self.records
            .iter()
            .filter_map(|(id, rec)| rec.role_of(worker_id).map(|role| (id.as_str(), role)))
            .collect()
    }

    /// IDs of shifts flagged as understaffed.
    pub fn infeasible_shifts(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|(_, rec)| rec.is_infeasible())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Schedule-level violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Adds a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether no shift is understaffed and no violation was recorded.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty() && self.records.values().all(|r| !r.is_infeasible())
    }

    pub(crate) fn insert_record(&mut self, shift_id: String) {
        self.records.entry(shift_id).or_default();
    }

    pub(crate) fn record_mut(&mut self, shift_id: &str) -> Option<&mut ShiftAssignment> {
        self.records.get_mut(shift_id)
    }
}
