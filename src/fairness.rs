//! Fairness equalization of worker hour ranges.
//!
//! Before any assignment, each worker's `[min_hours, max_hours]` range is
//! pulled toward an even share of the total staffing demand. This is the
//! single place worker records change before scheduling; it takes the
//! context mutably and refuses to run twice on the same context.
//!
//! # Fair share
//!
//! ```text
//! fair_share = Σ_shifts duration(shift) × seats(shift) / worker_count
//! ```
//!
//! | Policy | min_hours | max_hours |
//! |--------|-----------|-----------|
//! | `FloorOnly` | raised to `min(floor_ratio × share, available)` | unchanged |
//! | `FloorAndCeiling` | as above | lowered to `max(ceiling_ratio × share, min + margin)` |
//!
//! `available` is the summed duration of the shifts a worker has not
//! marked unavailable. Floors are kept fractional.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{SchedulingContext, HOURS_EPSILON};

/// Which bounds the equalizer may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FairnessPolicy {
    /// Only raise `min_hours`.
    FloorOnly,
    /// Raise `min_hours` and lower `max_hours`.
    #[default]
    FloorAndCeiling,
}

/// Fairness equalizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessConfig {
    /// Which bounds to adjust.
    pub policy: FairnessPolicy,
    /// Floor as a fraction of the fair share.
    pub floor_ratio: f64,
    /// Ceiling as a fraction of the fair share.
    pub ceiling_ratio: f64,
    /// Minimum gap kept between the new floor and the lowered ceiling.
    pub ceiling_margin: f64,
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            policy: FairnessPolicy::default(),
            floor_ratio: 0.9,
            ceiling_ratio: 1.1,
            ceiling_margin: 1.5,
        }
    }
}

impl FairnessConfig {
    pub fn with_policy(mut self, policy: FairnessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_floor_ratio(mut self, ratio: f64) -> Self {
        self.floor_ratio = ratio;
        self
    }

    pub fn with_ceiling_ratio(mut self, ratio: f64) -> Self {
        self.ceiling_ratio = ratio;
        self
    }

    pub fn with_ceiling_margin(mut self, margin: f64) -> Self {
        self.ceiling_margin = margin;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.floor_ratio.is_finite() || self.floor_ratio < 0.0 {
            return Err(format!("floor_ratio must be non-negative, got {}", self.floor_ratio));
        }
        if !self.ceiling_ratio.is_finite() || self.ceiling_ratio < 0.0 {
            return Err(format!(
                "ceiling_ratio must be non-negative, got {}",
                self.ceiling_ratio
            ));
        }
        if !self.ceiling_margin.is_finite() || self.ceiling_margin < 0.0 {
            return Err(format!(
                "ceiling_margin must be non-negative, got {}",
                self.ceiling_margin
            ));
        }
        Ok(())
    }
}

/// One worker's bound change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourAdjustment {
    pub worker_id: String,
    pub old_min: f64,
    pub new_min: f64,
    pub old_max: f64,
    pub new_max: f64,
}

/// What the equalizer did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessReport {
    /// Per-worker fair share of demand hours.
    pub fair_share: f64,
    /// Workers whose bounds changed, in ID order.
    pub adjustments: Vec<HourAdjustment>,
}

/// Total demand hours divided evenly over the workers (0 with no workers).
pub fn fair_share(ctx: &SchedulingContext) -> f64 {
    if ctx.worker_count() == 0 {
        return 0.0;
    }
    let demand: f64 = ctx
        .shifts()
        .iter()
        .map(|s| s.duration_hours() * f64::from(s.staffing.total()))
        .sum();
    demand / ctx.worker_count() as f64
}

/// Summed duration of the shifts the worker has not marked unavailable.
pub fn available_hours(ctx: &SchedulingContext, worker_id: &str) -> f64 {
    ctx.shifts()
        .iter()
        .filter(|s| ctx.preference(worker_id, &s.id).is_available())
        .map(|s| s.duration_hours())
        .sum()
}

/// Pulls every worker's hour range toward the fair share.
///
/// A raised floor never exceeds the worker's current `max_hours`, and a
/// lowered ceiling never drops below the new floor. When the floor target
/// reaches the ceiling, the range collapses to `min_hours == max_hours`.
///
/// # Errors
/// - [`EngineError::InvalidConfig`] for a bad config.
/// - [`EngineError::FairnessAlreadyApplied`] on a second call.
pub fn apply_fairness(
    ctx: &mut SchedulingContext,
    config: &FairnessConfig,
) -> EngineResult<FairnessReport> {
    config.validate().map_err(EngineError::InvalidConfig)?;
    if ctx.fairness_applied() {
        return Err(EngineError::FairnessAlreadyApplied);
    }

    let share = fair_share(ctx);
    let floor_target = config.floor_ratio * share;
    let ceiling_target = config.ceiling_ratio * share;

    let planned: Vec<HourAdjustment> = ctx
        .workers()
        .iter()
        .filter_map(|w| {
            let adjusted_floor = floor_target.min(available_hours(ctx, &w.id));
            let new_min = w.min_hours.max(adjusted_floor).min(w.max_hours);
            let new_max = match config.policy {
                FairnessPolicy::FloorOnly => w.max_hours,
                FairnessPolicy::FloorAndCeiling => {
                    let adjusted_ceiling = ceiling_target.max(new_min + config.ceiling_margin);
                    w.max_hours.min(adjusted_ceiling)
                }
            };
            let changed = (new_min - w.min_hours).abs() > HOURS_EPSILON
                || (new_max - w.max_hours).abs() > HOURS_EPSILON;
            changed.then(|| HourAdjustment {
                worker_id: w.id.clone(),
                old_min: w.min_hours,
                new_min,
                old_max: w.max_hours,
                new_max,
            })
        })
        .collect();

    for adj in &planned {
        debug!(
            worker = %adj.worker_id,
            old_min = adj.old_min,
            new_min = adj.new_min,
            old_max = adj.old_max,
            new_max = adj.new_max,
            "adjusted hour range"
        );
        ctx.set_hour_bounds(&adj.worker_id, adj.new_min, adj.new_max)?;
    }
    ctx.mark_fairness_applied();

    info!(
        fair_share = share,
        adjusted = planned.len(),
        policy = ?config.policy,
        "fairness equalization applied"
    );

    Ok(FairnessReport {
        fair_share: share,
        adjustments: planned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Preference, PreferenceTable, Shift, SkillRank, TimeOfDay, Worker};

    /// Two workers, two 2-seat shifts of 3h and 2h → share = (6 + 4) / 2 = 5.
    fn sample_context(prefs: PreferenceTable) -> SchedulingContext {
        let workers = vec![
            Worker::new("W1", SkillRank::OfficeHours).with_hours(0.0, 20.0),
            Worker::new("W2", SkillRank::OfficeHours).with_hours(1.0, 5.0),
        ];
        let shifts = vec![
            Shift::office_hours("S1", Day::Monday, TimeOfDay::hm(9, 0), TimeOfDay::hm(12, 0), 2),
            Shift::office_hours("S2", Day::Tuesday, TimeOfDay::hm(9, 0), TimeOfDay::hm(11, 0), 2),
        ];
        SchedulingContext::new(workers, shifts, prefs).unwrap()
    }

    fn all_available() -> PreferenceTable {
        PreferenceTable::new()
            .with("W1", "S1", Preference::Available)
            .with("W1", "S2", Preference::Available)
            .with("W2", "S1", Preference::Available)
            .with("W2", "S2", Preference::Available)
    }

    #[test]
    fn test_fair_share() {
        let ctx = sample_context(all_available());
        assert!((fair_share(&ctx) - 5.0).abs() < 1e-10);
        assert!((available_hours(&ctx, "W1") - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_floor_only_raises_min() {
        let mut ctx = sample_context(all_available());
        let config = FairnessConfig::default().with_policy(FairnessPolicy::FloorOnly);
        let report = apply_fairness(&mut ctx, &config).unwrap();

        let w1 = ctx.worker("W1").unwrap();
        assert!((w1.min_hours - 4.5).abs() < 1e-10);
        assert!((w1.max_hours - 20.0).abs() < 1e-10);
        assert_eq!(report.adjustments.len(), 2);
    }

    #[test]
    fn test_floor_capped_by_availability() {
        // W1 only available for the 2h shift
        let prefs = PreferenceTable::new()
            .with("W1", "S2", Preference::Preferred)
            .with("W2", "S1", Preference::Available);
        let mut ctx = sample_context(prefs);
        apply_fairness(&mut ctx, &FairnessConfig::default()).unwrap();
        assert!((ctx.worker("W1").unwrap().min_hours - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_ceiling_lowers_max() {
        let mut ctx = sample_context(all_available());
        apply_fairness(&mut ctx, &FairnessConfig::default()).unwrap();

        // max(1.1 × 5, 4.5 + 1.5) = 6.0
        let w1 = ctx.worker("W1").unwrap();
        assert!((w1.max_hours - 6.0).abs() < 1e-10);
        // W2's max of 5 is never raised
        let w2 = ctx.worker("W2").unwrap();
        assert!((w2.max_hours - 5.0).abs() < 1e-10);
        assert!(w2.min_hours <= w2.max_hours);
    }

    #[test]
    fn test_floor_clamped_to_ceiling() {
        let workers = vec![
            Worker::new("W1", SkillRank::OfficeHours).with_hours(0.0, 20.0),
            Worker::new("W2", SkillRank::OfficeHours).with_hours(1.0, 3.0),
        ];
        let shifts = vec![
            Shift::office_hours("S1", Day::Monday, TimeOfDay::hm(9, 0), TimeOfDay::hm(12, 0), 2),
            Shift::office_hours("S2", Day::Tuesday, TimeOfDay::hm(9, 0), TimeOfDay::hm(11, 0), 2),
        ];
        let mut ctx = SchedulingContext::new(workers, shifts, all_available()).unwrap();
        let report = apply_fairness(&mut ctx, &FairnessConfig::default()).unwrap();

        // floor target 0.9 × 5 = 4.5 is above W2's max of 3
        let w2 = ctx.worker("W2").unwrap();
        assert!((w2.min_hours - 3.0).abs() < 1e-10);
        assert!((w2.max_hours - 3.0).abs() < 1e-10);

        let adj = report.adjustments.iter().find(|a| a.worker_id == "W2").unwrap();
        assert!((adj.old_min - 1.0).abs() < 1e-10);
        assert!((adj.new_min - adj.new_max).abs() < 1e-10);

        // same clamp under floor-only
        let workers = vec![Worker::new("W2", SkillRank::OfficeHours).with_hours(1.0, 3.0)];
        let shifts = vec![Shift::office_hours(
            "S1",
            Day::Monday,
            TimeOfDay::hm(9, 0),
            TimeOfDay::hm(17, 0),
            1,
        )];
        let prefs = PreferenceTable::new().with("W2", "S1", Preference::Available);
        let mut ctx = SchedulingContext::new(workers, shifts, prefs).unwrap();
        let config = FairnessConfig::default().with_policy(FairnessPolicy::FloorOnly);
        apply_fairness(&mut ctx, &config).unwrap();
        let w2 = ctx.worker("W2").unwrap();
        assert!((w2.min_hours - 3.0).abs() < 1e-10);
        assert!((w2.max_hours - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_never_lowers_min() {
        let workers = vec![Worker::new("W1", SkillRank::OfficeHours).with_hours(10.0, 20.0)];
        let shifts = vec![Shift::office_hours(
            "S1",
            Day::Monday,
            TimeOfDay::hm(9, 0),
            TimeOfDay::hm(10, 0),
            1,
        )];
        let prefs = PreferenceTable::new().with("W1", "S1", Preference::Available);
        let mut ctx = SchedulingContext::new(workers, shifts, prefs).unwrap();
        apply_fairness(&mut ctx, &FairnessConfig::default()).unwrap();
        assert!((ctx.worker("W1").unwrap().min_hours - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_second_run_refused() {
        let mut ctx = sample_context(all_available());
        apply_fairness(&mut ctx, &FairnessConfig::default()).unwrap();
        assert_eq!(
            apply_fairness(&mut ctx, &FairnessConfig::default()),
            Err(EngineError::FairnessAlreadyApplied)
        );
    }

    #[test]
    fn test_no_workers_is_noop() {
        let mut ctx = SchedulingContext::new(vec![], vec![], PreferenceTable::new()).unwrap();
        let report = apply_fairness(&mut ctx, &FairnessConfig::default()).unwrap();
        assert_eq!(report.fair_share, 0.0);
        assert!(report.adjustments.is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let mut ctx = sample_context(all_available());
        let config = FairnessConfig::default().with_floor_ratio(-1.0);
        assert!(matches!(
            apply_fairness(&mut ctx, &config),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(!ctx.fairness_applied());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: FairnessConfig = serde_json::from_str(r#"{"floor_ratio": 0.8}"#).unwrap();
        assert!((config.floor_ratio - 0.8).abs() < 1e-10);
        assert!((config.ceiling_margin - 1.5).abs() < 1e-10);
        assert_eq!(config.policy, FairnessPolicy::FloorAndCeiling);
    }
}
