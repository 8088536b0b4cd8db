//! Annealing execution loop.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::config::AnnealingConfig;
use crate::eligibility::eligible_workers;
use crate::error::{EngineError, EngineResult};
use crate::models::{Roster, SchedulingContext, Shift};
use crate::scheduler::scoring::schedule_score;

/// Best score is sampled into the history every this many iterations.
const HISTORY_INTERVAL: usize = 100;

/// Counters describing one annealing run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnealingStats {
    /// Iterations started.
    pub iterations: usize,

    /// Swaps accepted (including improvements).
    pub accepted_moves: usize,

    /// Swaps with a strictly positive delta.
    pub improving_moves: usize,

    /// Iterations where no replacement was eligible.
    pub idle_moves: usize,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Whether the cancel flag stopped the run.
    pub cancelled: bool,

    /// Whether the time limit stopped the run.
    pub timed_out: bool,

    /// Best score sampled at regular intervals.
    pub score_history: Vec<f64>,
}

impl AnnealingStats {
    /// Whether the run ended before its iteration budget.
    pub fn cut_short(&self) -> bool {
        self.cancelled || self.timed_out
    }
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealingResult {
    /// Best roster seen (an owned snapshot).
    pub best: Roster,

    /// Score of `best`.
    pub best_score: f64,

    /// Score of the starting roster.
    pub initial_score: f64,

    /// Run counters.
    pub stats: AnnealingStats,
}

/// Executes simulated annealing over a roster.
///
/// Each iteration evicts one worker from a filled shift (shifts weighted
/// by priority), installs a random eligible replacement, and keeps the
/// swap under the Metropolis criterion. The returned roster is the best
/// snapshot, not the final state.
pub struct AnnealingRunner;

impl AnnealingRunner {
    /// Runs the optimizer with an RNG seeded from the config.
    pub fn run(
        ctx: &SchedulingContext,
        initial: Roster,
        config: &AnnealingConfig,
    ) -> EngineResult<AnnealingResult> {
        Self::run_with_cancel(ctx, initial, config, None)
    }

    /// Runs with an optional cancellation flag.
    pub fn run_with_cancel(
        ctx: &SchedulingContext,
        initial: Roster,
        config: &AnnealingConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> EngineResult<AnnealingResult> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::search(ctx, initial, config, &mut rng, cancel.as_deref())
    }

    /// Runs with a caller-supplied random source. `config.seed` is ignored.
    pub fn run_with_rng<R: Rng + ?Sized>(
        ctx: &SchedulingContext,
        initial: Roster,
        config: &AnnealingConfig,
        rng: &mut R,
    ) -> EngineResult<AnnealingResult> {
        Self::search(ctx, initial, config, rng, None)
    }

    fn search<R: Rng + ?Sized>(
        ctx: &SchedulingContext,
        initial: Roster,
        config: &AnnealingConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> EngineResult<AnnealingResult> {
        config.validate().map_err(EngineError::InvalidConfig)?;

        let mut current = initial;
        let mut current_score = schedule_score(ctx, &current)?;
        let initial_score = current_score;
        let mut best = current.clone();
        let mut best_score = current_score;

        let mut temperature = config.initial_temperature;
        let mut stats = AnnealingStats {
            score_history: vec![best_score],
            ..AnnealingStats::default()
        };
        let started = Instant::now();

        while stats.iterations < config.iterations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                stats.cancelled = true;
                break;
            }
            if config
                .time_limit
                .is_some_and(|limit| started.elapsed() >= limit)
            {
                stats.timed_out = true;
                break;
            }

            let Some(shift) = Self::pick_shift(ctx, &current, rng) else {
                debug!("no filled shift to perturb");
                break;
            };
            let shift_id = shift.id.as_str();

            stats.iterations += 1;

            let Some((evicted, role)) = current.schedule().record(shift_id).and_then(|record| {
                let role = *record.nonempty_roles().choose(rng)?;
                let worker = record.workers(role).choose(rng)?.clone();
                Some((worker, role))
            }) else {
                break;
            };

            current.unassign(ctx, &evicted, shift_id, role)?;

            let candidates: Vec<String> = match current.schedule().record(shift_id) {
                Some(record) => eligible_workers(ctx, &current, shift_id, role)?
                    .into_iter()
                    .filter(|w| !record.contains(w))
                    .collect(),
                None => Vec::new(),
            };

            let Some(incoming) = candidates.choose(rng).cloned() else {
                current.assign(ctx, &evicted, shift_id, role)?;
                stats.idle_moves += 1;
                temperature *= config.cooling_rate;
                Self::sample_history(&mut stats, best_score);
                continue;
            };

            current.assign(ctx, &incoming, shift_id, role)?;
            let new_score = schedule_score(ctx, &current)?;
            let delta = new_score - current_score;

            // Metropolis acceptance criterion (maximizing)
            let accept = if delta > 0.0 {
                stats.improving_moves += 1;
                true
            } else {
                rng.random::<f64>() < (delta / temperature).exp()
            };

            if accept {
                current_score = new_score;
                stats.accepted_moves += 1;
                if current_score > best_score {
                    best = current.clone();
                    best_score = current_score;
                }
            } else {
                current.unassign(ctx, &incoming, shift_id, role)?;
                current.assign(ctx, &evicted, shift_id, role)?;
            }

            temperature *= config.cooling_rate;
            Self::sample_history(&mut stats, best_score);
        }

        if stats
            .score_history
            .last()
            .is_none_or(|&last| (last - best_score).abs() > 1e-12)
        {
            stats.score_history.push(best_score);
        }
        stats.final_temperature = temperature;

        info!(
            iterations = stats.iterations,
            accepted = stats.accepted_moves,
            improving = stats.improving_moves,
            idle = stats.idle_moves,
            initial_score,
            best_score,
            cancelled = stats.cancelled,
            timed_out = stats.timed_out,
            "annealing finished"
        );

        Ok(AnnealingResult {
            best,
            best_score,
            initial_score,
            stats,
        })
    }

    /// Draws a shift with at least one seat filled, weighted by priority.
    fn pick_shift<'a, R: Rng + ?Sized>(
        ctx: &'a SchedulingContext,
        roster: &Roster,
        rng: &mut R,
    ) -> Option<&'a Shift> {
        let filled: Vec<&Shift> = ctx
            .shifts()
            .iter()
            .filter(|s| {
                roster
                    .schedule()
                    .record(&s.id)
                    .is_some_and(|r| r.is_filled())
            })
            .collect();
        filled.choose_weighted(rng, |s| s.priority()).ok().copied()
    }

    fn sample_history(stats: &mut AnnealingStats, best_score: f64) {
        if stats.iterations.is_multiple_of(HISTORY_INTERVAL) {
            stats.score_history.push(best_score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Preference, PreferenceTable, Role, SkillRank, TimeOfDay, Worker};
    use crate::scheduler::GreedyInitializer;

    /// Four OH workers, three 1-seat shifts, mixed preferences.
    fn sample_context() -> SchedulingContext {
        let workers: Vec<Worker> = (1..=4)
            .map(|i| Worker::new(format!("W{i}"), SkillRank::OfficeHours).with_hours(0.0, 6.0))
            .collect();
        let shifts = vec![
            Shift::office_hours("S1", Day::Monday, TimeOfDay::hm(9, 0), TimeOfDay::hm(11, 0), 1),
            Shift::office_hours("S2", Day::Tuesday, TimeOfDay::hm(13, 0), TimeOfDay::hm(15, 0), 1),
            Shift::office_hours("S3", Day::Wednesday, TimeOfDay::hm(17, 0), TimeOfDay::hm(19, 0), 1),
        ];
        let mut prefs = PreferenceTable::new();
        for w in &workers {
            for s in &shifts {
                prefs.set(w.id.clone(), s.id.clone(), Preference::Available);
            }
        }
        prefs.set("W4", "S1", Preference::Preferred);
        prefs.set("W3", "S3", Preference::Preferred);
        SchedulingContext::new(workers, shifts, prefs).unwrap()
    }

    #[test]
    fn test_pick_shift_favors_priority() {
        let workers = vec![
            Worker::new("LEAD", SkillRank::LabLead),
            Worker::new("OH", SkillRank::OfficeHours),
        ];
        let shifts = vec![
            // Wednesday 3 + evening 3 + lab 2 = 8
            Shift::lab("HIGH", Day::Wednesday, TimeOfDay::hm(17, 0), TimeOfDay::hm(19, 0), 0, 1),
            // Saturday 1 + morning 1 = 2
            Shift::office_hours("LOW", Day::Saturday, TimeOfDay::hm(9, 0), TimeOfDay::hm(11, 0), 1),
            Shift::office_hours("EMPTY", Day::Tuesday, TimeOfDay::hm(13, 0), TimeOfDay::hm(15, 0), 1),
        ];
        let prefs = PreferenceTable::new()
            .with("LEAD", "HIGH", Preference::Available)
            .with("OH", "LOW", Preference::Available);
        let ctx = SchedulingContext::new(workers, shifts, prefs).unwrap();
        let mut roster = Roster::new(&ctx);
        roster.assign(&ctx, "LEAD", "HIGH", Role::Lead).unwrap();
        roster.assign(&ctx, "OH", "LOW", Role::OhTa).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let draws = 4000;
        let mut high = 0usize;
        for _ in 0..draws {
            let shift = AnnealingRunner::pick_shift(&ctx, &roster, &mut rng).unwrap();
            assert_ne!(shift.id, "EMPTY");
            if shift.id == "HIGH" {
                high += 1;
            }
        }
        // expected share 8 / 10
        let share = high as f64 / draws as f64;
        assert!((0.75..0.85).contains(&share), "high-priority share {share}");
    }

    #[test]
    fn test_pick_shift_none_when_empty() {
        let ctx = sample_context();
        let roster = Roster::new(&ctx);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(AnnealingRunner::pick_shift(&ctx, &roster, &mut rng).is_none());
    }

    #[test]
    fn test_best_not_worse_than_initial() {
        let ctx = sample_context();
        let initial = GreedyInitializer::new().build(&ctx).unwrap();
        let config = AnnealingConfig::default().with_iterations(500).with_seed(42);

        let result = AnnealingRunner::run(&ctx, initial, &config).unwrap();
        assert!(result.best_score >= result.initial_score);
        assert_eq!(result.stats.iterations, 500);
        assert!(!result.stats.cut_short());
        let rescored = schedule_score(&ctx, &result.best).unwrap();
        assert!((rescored - result.best_score).abs() < 1e-9);
    }

    #[test]
    fn test_finds_preferred_assignment() {
        let ctx = sample_context();
        let initial = GreedyInitializer::new().build(&ctx).unwrap();
        let config = AnnealingConfig::default().with_iterations(2_000).with_seed(1);

        let result = AnnealingRunner::run(&ctx, initial, &config).unwrap();
        let s1 = result.best.schedule().record("S1").unwrap();
        let s3 = result.best.schedule().record("S3").unwrap();
        assert_eq!(s1.workers(Role::OhTa), ["W4".to_string()]);
        assert_eq!(s3.workers(Role::OhTa), ["W3".to_string()]);
    }

    #[test]
    fn test_seed_reproducible() {
        let ctx = sample_context();
        let initial = GreedyInitializer::new().build(&ctx).unwrap();
        let config = AnnealingConfig::default().with_iterations(300).with_seed(9);

        let a = AnnealingRunner::run(&ctx, initial.clone(), &config).unwrap();
        let b = AnnealingRunner::run(&ctx, initial, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_injected_rng() {
        let ctx = sample_context();
        let initial = GreedyInitializer::new().build(&ctx).unwrap();
        let config = AnnealingConfig::default().with_iterations(200);

        let mut rng_a = StdRng::seed_from_u64(5);
        let mut rng_b = StdRng::seed_from_u64(5);
        let a = AnnealingRunner::run_with_rng(&ctx, initial.clone(), &config, &mut rng_a).unwrap();
        let b = AnnealingRunner::run_with_rng(&ctx, initial, &config, &mut rng_b).unwrap();
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_cancelled_before_start() {
        let ctx = sample_context();
        let initial = GreedyInitializer::new().build(&ctx).unwrap();
        let config = AnnealingConfig::default().with_seed(3);
        let flag = Arc::new(AtomicBool::new(true));

        let result = AnnealingRunner::run_with_cancel(&ctx, initial.clone(), &config, Some(flag)).unwrap();
        assert!(result.stats.cancelled);
        assert_eq!(result.stats.iterations, 0);
        assert_eq!(result.best, initial);
    }

    #[test]
    fn test_empty_roster_stops() {
        let ctx = SchedulingContext::new(
            vec![Worker::new("W1", SkillRank::OfficeHours)],
            vec![Shift::office_hours(
                "S1",
                Day::Monday,
                TimeOfDay::hm(9, 0),
                TimeOfDay::hm(10, 0),
                1,
            )],
            PreferenceTable::new(),
        )
        .unwrap();
        let initial = GreedyInitializer::new().build(&ctx).unwrap();
        let result =
            AnnealingRunner::run(&ctx, initial, &AnnealingConfig::default().with_seed(0)).unwrap();
        assert_eq!(result.stats.iterations, 0);
        assert_eq!(result.best_score, 0.0);
    }

    #[test]
    fn test_invalid_config() {
        let ctx = sample_context();
        let initial = GreedyInitializer::new().build(&ctx).unwrap();
        let config = AnnealingConfig::default().with_cooling_rate(1.5);
        assert!(matches!(
            AnnealingRunner::run(&ctx, initial, &config),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
