//! Worker model.
//!
//! Workers are the people placed on shifts. Each worker has a skill
//! rank that gates which roles they may fill, an allowed range of
//! hours per scheduling period, and a pay tier.

use serde::{Deserialize, Serialize};

/// A worker that can be assigned to shifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the worker has prior experience in the role.
    pub experienced: bool,
    /// Highest role the worker is qualified for.
    pub skill: SkillRank,
    /// Minimum hours per scheduling period.
    pub min_hours: f64,
    /// Maximum hours per scheduling period.
    pub max_hours: f64,
    /// Senior workers are paid at the higher rate.
    pub senior: bool,
    /// Workers this worker likes to share shifts with (soft affinity).
    #[serde(default)]
    pub companions: Vec<String>,
}

/// Ordinal skill level.
///
/// Each rank implies every rank below it: a lab lead may also work as a
/// lab TA or in office hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillRank {
    /// May staff office hours only.
    OfficeHours,
    /// May also assist in labs.
    LabAssistant,
    /// May also lead labs.
    LabLead,
}

impl SkillRank {
    /// Numeric level (1..=3).
    pub fn level(self) -> u8 {
        match self {
            SkillRank::OfficeHours => 1,
            SkillRank::LabAssistant => 2,
            SkillRank::LabLead => 3,
        }
    }

    /// Converts a numeric level (1..=3) into a rank.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(SkillRank::OfficeHours),
            2 => Some(SkillRank::LabAssistant),
            3 => Some(SkillRank::LabLead),
            _ => None,
        }
    }
}

impl Worker {
    /// Creates an experienced, regular-rate worker with a 0..40 hour range.
    pub fn new(id: impl Into<String>, skill: SkillRank) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            experienced: true,
            skill,
            min_hours: 0.0,
            max_hours: 40.0,
            senior: false,
            companions: Vec::new(),
        }
    }

    /// Sets the worker name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the allowed hour range.
    pub fn with_hours(mut self, min_hours: f64, max_hours: f64) -> Self {
        self.min_hours = min_hours;
        self.max_hours = max_hours;
        self
    }

    /// Sets the experience flag.
    pub fn with_experience(mut self, experienced: bool) -> Self {
        self.experienced = experienced;
        self
    }

    /// Marks the worker as senior (higher pay rate).
    pub fn with_senior(mut self, senior: bool) -> Self {
        self.senior = senior;
        self
    }

    /// Adds a companion worker ID.
    pub fn with_companion(mut self, companion_id: impl Into<String>) -> Self {
        self.companions.push(companion_id.into());
        self
    }

    /// Whether the worker's rank is at least `rank`.
    #[inline]
    pub fn has_rank(&self, rank: SkillRank) -> bool {
        self.skill >= rank
    }

    /// Whether `other_id` is one of this worker's companions.
    pub fn is_companion(&self, other_id: &str) -> bool {
        self.companions.iter().any(|c| c == other_id)
    }
}
