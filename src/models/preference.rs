//! Worker × shift preferences.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How much a worker wants a shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Preference {
    /// Cannot work the shift. Excludes the worker from it entirely.
    #[default]
    Unavailable,
    /// Can work the shift.
    Available,
    /// Wants the shift.
    Preferred,
}

impl Preference {
    /// Numeric score: 0, 1 or 2.
    #[inline]
    pub fn score(self) -> u8 {
        match self {
            Preference::Unavailable => 0,
            Preference::Available => 1,
            Preference::Preferred => 2,
        }
    }

    /// Converts a numeric score into a preference.
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            0 => Some(Preference::Unavailable),
            1 => Some(Preference::Available),
            2 => Some(Preference::Preferred),
            _ => None,
        }
    }

    /// Whether the worker may be placed on the shift at all.
    #[inline]
    pub fn is_available(self) -> bool {
        self != Preference::Unavailable
    }
}

/// Sparse preference table keyed by worker ID, then shift ID.
///
/// Missing entries read as [`Preference::Unavailable`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceTable {
    entries: HashMap<String, HashMap<String, Preference>>,
}

impl PreferenceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a preference, replacing any previous entry.
    pub fn set(
        &mut self,
        worker_id: impl Into<String>,
        shift_id: impl Into<String>,
        preference: Preference,
    ) {
        self.entries
            .entry(worker_id.into())
            .or_default()
            .insert(shift_id.into(), preference);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(
        mut self,
        worker_id: impl Into<String>,
        shift_id: impl Into<String>,
        preference: Preference,
    ) -> Self {
        self.set(worker_id, shift_id, preference);
        self
    }

    /// Looks up a preference. Absent entries are `Unavailable`.
    pub fn get(&self, worker_id: &str, shift_id: &str) -> Preference {
        self.entries
            .get(worker_id)
            .and_then(|row| row.get(shift_id))
            .copied()
            .unwrap_or_default()
    }

    /// Iterates over all explicit entries as `(worker_id, shift_id, preference)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Preference)> + '_ {
        self.entries.iter().flat_map(|(w, row)| {
            row.iter()
                .map(move |(s, p)| (w.as_str(), s.as_str(), *p))
        })
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    /// Whether the table has no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
