//! Input validation for staffing problems.
//!
//! Checks structural integrity of workers, shifts, and preferences
//! before scheduling. Detects:
//! - Duplicate IDs
//! - Shifts that mix office-hours and lab seats, or whose lab flag
//!   disagrees with the seats requested
//! - Empty or inverted time ranges
//! - Negative, non-finite, or inverted hour bounds
//! - Preference and companion references to unknown IDs

use crate::models::{PreferenceTable, Shift, Worker};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A shift's staffing triple is malformed.
    InvalidStaffing,
    /// A shift's time range is empty, inverted, or past midnight.
    InvalidTimeRange,
    /// A worker's hour bounds are negative, non-finite, or inverted.
    InvalidHourBounds,
    /// A preference or companion entry references an unknown ID.
    UnknownReference,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a staffing problem.
///
/// Checks:
/// 1. No duplicate worker IDs
/// 2. No duplicate shift IDs
/// 3. Hour bounds are finite, non-negative, and `min <= max`
/// 4. Shift times lie within one day and `start < end`
/// 5. Staffing never mixes OH and lab seats, and matches the lab flag
/// 6. Companion IDs reference existing workers
/// 7. Preference entries reference existing workers and shifts
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    workers: &[Worker],
    shifts: &[Shift],
    preferences: &PreferenceTable,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut worker_ids = HashSet::new();
    for w in workers {
        if !worker_ids.insert(w.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate worker ID: {}", w.id),
            ));
        }

        let finite = w.min_hours.is_finite() && w.max_hours.is_finite();
        if !finite || w.min_hours < 0.0 || w.min_hours > w.max_hours {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidHourBounds,
                format!(
                    "Worker '{}' has invalid hour bounds [{}, {}]",
                    w.id, w.min_hours, w.max_hours
                ),
            ));
        }
    }

    let mut shift_ids = HashSet::new();
    for s in shifts {
        if !shift_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shift ID: {}", s.id),
            ));
        }

        if !s.start.is_valid() || !s.end.is_valid() || s.start >= s.end {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!("Shift '{}' has invalid time range {}-{}", s.id, s.start, s.end),
            ));
        }

        if !s.staffing.is_well_formed() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidStaffing,
                format!("Shift '{}' requests both office-hours and lab seats", s.id),
            ));
        } else if s.is_lab && s.staffing.oh > 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidStaffing,
                format!("Lab shift '{}' requests office-hours seats", s.id),
            ));
        } else if !s.is_lab && (s.staffing.lab_ta > 0 || s.staffing.lead > 0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidStaffing,
                format!("Office-hours shift '{}' requests lab seats", s.id),
            ));
        }
    }

    for w in workers {
        for c in &w.companions {
            if !worker_ids.contains(c.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReference,
                    format!("Worker '{}' lists unknown companion '{}'", w.id, c),
                ));
            }
        }
    }

    let mut pref_errors: Vec<ValidationError> = preferences
        .iter()
        .filter_map(|(w, s, _)| {
            if !worker_ids.contains(w) {
                Some(format!("Preference references unknown worker '{w}'"))
            } else if !shift_ids.contains(s) {
                Some(format!("Preference of '{w}' references unknown shift '{s}'"))
            } else {
                None
            }
        })
        .map(|msg| ValidationError::new(ValidationErrorKind::UnknownReference, msg))
        .collect();
    // Table iteration order is unspecified.
    pref_errors.sort_by(|a, b| a.message.cmp(&b.message));
    errors.extend(pref_errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Preference, SkillRank, Staffing, TimeOfDay};

    fn sample_workers() -> Vec<Worker> {
        vec![
            Worker::new("W1", SkillRank::LabLead).with_companion("W2"),
            Worker::new("W2", SkillRank::OfficeHours),
        ]
    }

    fn sample_shifts() -> Vec<Shift> {
        vec![
            Shift::office_hours("S1", Day::Monday, TimeOfDay::hm(9, 0), TimeOfDay::hm(11, 0), 2),
            Shift::lab("S2", Day::Tuesday, TimeOfDay::hm(13, 0), TimeOfDay::hm(15, 0), 1, 1),
        ]
    }

    fn sample_prefs() -> PreferenceTable {
        PreferenceTable::new()
            .with("W1", "S1", Preference::Preferred)
            .with("W2", "S2", Preference::Available)
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_workers(), &sample_shifts(), &sample_prefs()).is_ok());
    }

    #[test]
    fn test_duplicate_worker_id() {
        let workers = vec![
            Worker::new("W1", SkillRank::OfficeHours),
            Worker::new("W1", SkillRank::LabLead),
        ];
        let errors = validate_input(&workers, &sample_shifts(), &PreferenceTable::new()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("worker")));
    }

    #[test]
    fn test_duplicate_shift_id() {
        let mut shifts = sample_shifts();
        shifts.push(shifts[0].clone());
        let errors = validate_input(&sample_workers(), &shifts, &sample_prefs()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("shift")));
    }

    #[test]
    fn test_inverted_hours() {
        let workers = vec![Worker::new("W1", SkillRank::OfficeHours).with_hours(10.0, 5.0)];
        let errors = validate_input(&workers, &[], &PreferenceTable::new()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidHourBounds);
    }

    #[test]
    fn test_nan_hours() {
        let workers = vec![Worker::new("W1", SkillRank::OfficeHours).with_hours(f64::NAN, 5.0)];
        let errors = validate_input(&workers, &[], &PreferenceTable::new()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidHourBounds);
    }

    #[test]
    fn test_inverted_time_range() {
        let shifts = vec![Shift::office_hours(
            "S1",
            Day::Monday,
            TimeOfDay::hm(11, 0),
            TimeOfDay::hm(9, 0),
            1,
        )];
        let errors = validate_input(&[], &shifts, &PreferenceTable::new()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidTimeRange);
    }

    #[test]
    fn test_mixed_staffing() {
        let mut shift = sample_shifts().remove(1);
        shift.staffing = Staffing {
            oh: 1,
            lab_ta: 1,
            lead: 0,
        };
        let errors = validate_input(&[], &[shift], &PreferenceTable::new()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidStaffing);
    }

    #[test]
    fn test_lab_flag_mismatch() {
        let mut shift = sample_shifts().remove(0);
        shift.is_lab = true;
        let errors = validate_input(&[], &[shift], &PreferenceTable::new()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidStaffing);
    }

    #[test]
    fn test_unknown_companion() {
        let workers = vec![Worker::new("W1", SkillRank::OfficeHours).with_companion("ghost")];
        let errors = validate_input(&workers, &[], &PreferenceTable::new()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownReference);
        assert!(errors[0].message.contains("ghost"));
    }

    #[test]
    fn test_unknown_preference_references() {
        let prefs = sample_prefs()
            .with("ghost", "S1", Preference::Available)
            .with("W1", "nowhere", Preference::Available);
        let errors = validate_input(&sample_workers(), &sample_shifts(), &prefs).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::UnknownReference));
    }

    #[test]
    fn test_multiple_errors() {
        let workers = vec![
            Worker::new("W1", SkillRank::OfficeHours).with_hours(-1.0, 5.0),
            Worker::new("W1", SkillRank::OfficeHours),
        ];
        let errors = validate_input(&workers, &[], &PreferenceTable::new()).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
