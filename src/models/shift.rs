//! Shift model.
//!
//! A shift is a fixed weekly time slot with a staffing requirement per
//! role. Office-hours shifts need OH seats only; lab shifts need lab-TA
//! and/or lead seats only.
//!
//! # Time Model
//! Times of day are minutes since midnight. A shift occupies the
//! half-open interval `[start, end)` on its day, so back-to-back shifts
//! do not conflict.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::Role;

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days, Monday first.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Importance of the day: mid-week 3, Monday/Friday 2, weekend 1.
    pub fn priority(self) -> u32 {
        match self {
            Day::Tuesday | Day::Wednesday | Day::Thursday => 3,
            Day::Monday | Day::Friday => 2,
            Day::Saturday | Day::Sunday => 1,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        };
        f.write_str(name)
    }
}

/// A time of day, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    minutes: u16,
}

/// Error returned when parsing an `HH:MM` string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day '{0}', expected HH:MM")]
pub struct ParseTimeError(pub String);

impl TimeOfDay {
    /// Minutes in a day.
    pub const DAY_MINUTES: u16 = 24 * 60;

    /// Creates a time from hours and minutes.
    ///
    /// Values are not range-checked here; `validate_input` rejects
    /// times at or past midnight.
    pub const fn hm(hour: u16, minute: u16) -> Self {
        Self {
            minutes: hour * 60 + minute,
        }
    }

    /// Creates a time from minutes since midnight.
    pub const fn from_minutes(minutes: u16) -> Self {
        Self { minutes }
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u16 {
        self.minutes
    }

    /// Hour component (0..24).
    #[inline]
    pub fn hour(self) -> u16 {
        self.minutes / 60
    }

    /// Whether the value lies within a single day.
    pub fn is_valid(self) -> bool {
        self.minutes < Self::DAY_MINUTES
    }

    /// Time-of-day tier: evening (from 17:00) 3, afternoon (from 12:00) 2,
    /// morning 1.
    pub fn tier(self) -> u32 {
        match self.hour() {
            h if h >= 17 => 3,
            h if h >= 12 => 2,
            _ => 1,
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeError(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
        let hour: u16 = h.parse().map_err(|_| err())?;
        let minute: u16 = m.parse().map_err(|_| err())?;
        if hour >= 24 || minute >= 60 {
            return Err(err());
        }
        Ok(Self::hm(hour, minute))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

/// Seats required per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staffing {
    /// Office-hours seats.
    pub oh: u32,
    /// Lab-TA seats.
    pub lab_ta: u32,
    /// Lab-lead seats.
    pub lead: u32,
}

impl Staffing {
    /// Office-hours staffing.
    pub fn office_hours(seats: u32) -> Self {
        Self {
            oh: seats,
            lab_ta: 0,
            lead: 0,
        }
    }

    /// Lab staffing.
    pub fn lab(lab_ta: u32, lead: u32) -> Self {
        Self {
            oh: 0,
            lab_ta,
            lead,
        }
    }

    /// Seats required for a role.
    pub fn seats(&self, role: Role) -> u32 {
        match role {
            Role::Lead => self.lead,
            Role::LabTa => self.lab_ta,
            Role::OhTa => self.oh,
        }
    }

    /// Total seats across all roles.
    pub fn total(&self) -> u32 {
        self.oh + self.lab_ta + self.lead
    }

    /// Office-hours and lab seats are never both requested.
    pub fn is_well_formed(&self) -> bool {
        !(self.oh > 0 && (self.lab_ta > 0 || self.lead > 0))
    }
}

/// A weekly shift to be staffed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    /// Unique shift identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Day of the week.
    pub day: Day,
    /// Start time (inclusive).
    pub start: TimeOfDay,
    /// End time (exclusive).
    pub end: TimeOfDay,
    /// Whether this is a lab shift.
    pub is_lab: bool,
    /// Seats required per role.
    pub staffing: Staffing,
}

impl Shift {
    /// Creates an office-hours shift.
    pub fn office_hours(
        id: impl Into<String>,
        day: Day,
        start: TimeOfDay,
        end: TimeOfDay,
        seats: u32,
    ) -> Self {
        let id = id.into();
        Self {
            name: format!("{day} {start}"),
            id,
            day,
            start,
            end,
            is_lab: false,
            staffing: Staffing::office_hours(seats),
        }
    }

    /// Creates a lab shift.
    pub fn lab(
        id: impl Into<String>,
        day: Day,
        start: TimeOfDay,
        end: TimeOfDay,
        lab_tas: u32,
        leads: u32,
    ) -> Self {
        let id = id.into();
        Self {
            name: format!("{day} {start} lab"),
            id,
            day,
            start,
            end,
            is_lab: true,
            staffing: Staffing::lab(lab_tas, leads),
        }
    }

    /// Sets the shift name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Duration in hours.
    #[inline]
    pub fn duration_hours(&self) -> f64 {
        (f64::from(self.end.minutes()) - f64::from(self.start.minutes())) / 60.0
    }

    /// Whether two shifts share a day and their intervals intersect.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }

    /// Importance score: day priority + time tier + 2 for labs.
    ///
    /// Higher-priority shifts receive more optimizer attention and are
    /// removed last under budget pressure.
    pub fn priority(&self) -> u32 {
        let lab_bonus = if self.is_lab { 2 } else { 0 };
        self.day.priority() + self.start.tier() + lab_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_parse_and_display() {
        let t: TimeOfDay = "09:30".parse().unwrap();
        assert_eq!(t, TimeOfDay::hm(9, 30));
        assert_eq!(t.to_string(), "09:30");
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("9h30".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_time_tier() {
        assert_eq!(TimeOfDay::hm(9, 0).tier(), 1);
        assert_eq!(TimeOfDay::hm(11, 59).tier(), 1);
        assert_eq!(TimeOfDay::hm(12, 0).tier(), 2);
        assert_eq!(TimeOfDay::hm(16, 59).tier(), 2);
        assert_eq!(TimeOfDay::hm(17, 0).tier(), 3);
    }

    #[test]
    fn test_duration() {
        let s = Shift::office_hours("S1", Day::Monday, TimeOfDay::hm(9, 0), TimeOfDay::hm(10, 30), 1);
        assert!((s.duration_hours() - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_overlap_half_open() {
        let a = Shift::office_hours("A", Day::Monday, TimeOfDay::hm(9, 0), TimeOfDay::hm(11, 0), 1);
        let b = Shift::office_hours("B", Day::Monday, TimeOfDay::hm(10, 0), TimeOfDay::hm(12, 0), 1);
        let c = Shift::office_hours("C", Day::Monday, TimeOfDay::hm(11, 0), TimeOfDay::hm(12, 0), 1);
        let d = Shift::office_hours("D", Day::Tuesday, TimeOfDay::hm(9, 0), TimeOfDay::hm(11, 0), 1);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // back-to-back
        assert!(!a.overlaps(&d)); // different day
    }

    #[test]
    fn test_priority() {
        // Wednesday (3) + evening (3) + lab (2)
        let lab = Shift::lab("L", Day::Wednesday, TimeOfDay::hm(18, 0), TimeOfDay::hm(20, 0), 2, 1);
        assert_eq!(lab.priority(), 8);

        // Saturday (1) + morning (1)
        let oh = Shift::office_hours("O", Day::Saturday, TimeOfDay::hm(10, 0), TimeOfDay::hm(11, 0), 1);
        assert_eq!(oh.priority(), 2);
    }

    #[test]
    fn test_staffing() {
        let lab = Staffing::lab(2, 1);
        assert_eq!(lab.total(), 3);
        assert_eq!(lab.seats(Role::Lead), 1);
        assert_eq!(lab.seats(Role::OhTa), 0);
        assert!(lab.is_well_formed());

        let mixed = Staffing {
            oh: 1,
            lab_ta: 1,
            lead: 0,
        };
        assert!(!mixed.is_well_formed());
    }
}
