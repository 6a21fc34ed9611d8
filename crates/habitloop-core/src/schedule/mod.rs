//! Frequency schedule: pure due-date arithmetic.
//!
//! [`Frequency`] maps a calendar date to a due/not-due verdict for the
//! fixed patterns, and exposes the Monday-start [`WeekWindow`] used to
//! evaluate weekly quotas. Everything here is pure and stateless: the
//! same (frequency, date) pair always yields the same answer, which is
//! what lets the streak and completion calculators be simple folds.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How often a task is due.
///
/// Closed sum type; every consumer matches exhaustively so adding a
/// variant is a compile error until each component handles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Due every day.
    Daily,
    /// Due Monday through Friday.
    Weekdays,
    /// Due Saturday and Sunday.
    Weekends,
    /// Due on a fixed set of ISO weekday numbers (Mon=1 .. Sun=7).
    ///
    /// An empty set is degenerate: permanently not-due, never an error.
    SpecificDays(BTreeSet<u8>),
    /// Due `n` times per Monday-start week, on no particular day.
    ///
    /// Not a per-day predicate; credit is evaluated against the count of
    /// logs inside the week window. A zero target is degenerate and
    /// permanently unmet.
    WeeklyTarget(u32),
}

impl Frequency {
    /// Whether a task with this frequency is due on `date`.
    ///
    /// `WeeklyTarget` has no single due date and always answers false;
    /// callers handle quota variants through [`weekly_window`].
    pub fn is_due(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().number_from_monday() as u8;
        match self {
            Frequency::Daily => true,
            Frequency::Weekdays => weekday <= 5,
            Frequency::Weekends => weekday >= 6,
            Frequency::SpecificDays(days) => days.contains(&weekday),
            Frequency::WeeklyTarget(_) => false,
        }
    }

    /// Whether this frequency is evaluated per week rather than per day.
    pub fn is_weekly(&self) -> bool {
        matches!(self, Frequency::WeeklyTarget(_))
    }

    /// Iterate the due dates in `[from, to]` (empty when `from > to`).
    ///
    /// Quota variants yield nothing.
    pub fn due_dates(&self, from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> + '_ {
        from.iter_days()
            .take_while(move |d| *d <= to)
            .filter(move |d| self.is_due(*d))
    }

    /// Number of due dates in `[from, to]`.
    pub fn due_count(&self, from: NaiveDate, to: NaiveDate) -> u64 {
        self.due_dates(from, to).count() as u64
    }

    /// Parse a compact frequency spec as accepted by the CLI:
    /// `daily`, `weekdays`, `weekends`, `days:1,3,5`, `weekly:3`.
    pub fn parse(spec: &str) -> Result<Self, ValidationError> {
        match spec.trim() {
            "daily" => Ok(Frequency::Daily),
            "weekdays" => Ok(Frequency::Weekdays),
            "weekends" => Ok(Frequency::Weekends),
            other => {
                if let Some(list) = other.strip_prefix("days:") {
                    let mut days = BTreeSet::new();
                    for part in list.split(',').filter(|p| !p.trim().is_empty()) {
                        let n: u8 = part.trim().parse().map_err(|_| {
                            ValidationError::UnknownFrequency(spec.to_string())
                        })?;
                        if !(1..=7).contains(&n) {
                            return Err(ValidationError::InvalidValue {
                                field: "days".into(),
                                message: format!("weekday number {n} outside 1-7"),
                            });
                        }
                        days.insert(n);
                    }
                    Ok(Frequency::SpecificDays(days))
                } else if let Some(count) = other.strip_prefix("weekly:") {
                    let n: u32 = count.trim().parse().map_err(|_| {
                        ValidationError::UnknownFrequency(spec.to_string())
                    })?;
                    Ok(Frequency::WeeklyTarget(n))
                } else {
                    Err(ValidationError::UnknownFrequency(spec.to_string()))
                }
            }
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekdays => write!(f, "weekdays"),
            Frequency::Weekends => write!(f, "weekends"),
            Frequency::SpecificDays(days) => {
                let list: Vec<String> = days.iter().map(|d| d.to_string()).collect();
                write!(f, "days:{}", list.join(","))
            }
            Frequency::WeeklyTarget(n) => write!(f, "weekly:{n}"),
        }
    }
}

/// A Monday-start week window, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    /// Monday of the week
    pub start: NaiveDate,
    /// Sunday of the week
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The window exactly one week earlier.
    pub fn previous(&self) -> WeekWindow {
        WeekWindow {
            start: self.start - Duration::days(7),
            end: self.end - Duration::days(7),
        }
    }

    /// The window exactly one week later.
    pub fn next(&self) -> WeekWindow {
        WeekWindow {
            start: self.start + Duration::days(7),
            end: self.end + Duration::days(7),
        }
    }
}

/// The Monday-start week window containing `date`.
pub fn weekly_window(date: NaiveDate) -> WeekWindow {
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    WeekWindow {
        start,
        end: start + Duration::days(6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_is_always_due() {
        let mut day = date(2024, 12, 28);
        for _ in 0..14 {
            assert!(Frequency::Daily.is_due(day));
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn weekdays_and_weekends_partition_the_week() {
        // 2025-01-06 is a Monday
        let monday = date(2025, 1, 6);
        for offset in 0..7 {
            let day = monday + Duration::days(offset);
            let on_weekday = Frequency::Weekdays.is_due(day);
            let on_weekend = Frequency::Weekends.is_due(day);
            assert_ne!(on_weekday, on_weekend);
            assert_eq!(on_weekday, offset < 5);
        }
    }

    #[test]
    fn specific_days_matches_only_listed_weekdays() {
        let freq = Frequency::SpecificDays([1, 3, 5].into_iter().collect());
        assert!(freq.is_due(date(2025, 1, 6))); // Monday
        assert!(!freq.is_due(date(2025, 1, 7))); // Tuesday
        assert!(freq.is_due(date(2025, 1, 8))); // Wednesday
        assert!(freq.is_due(date(2025, 1, 10))); // Friday
        assert!(!freq.is_due(date(2025, 1, 12))); // Sunday
    }

    #[test]
    fn empty_specific_days_is_never_due() {
        let freq = Frequency::SpecificDays(BTreeSet::new());
        let mut day = date(2025, 1, 1);
        for _ in 0..30 {
            assert!(!freq.is_due(day));
            day = day.succ_opt().unwrap();
        }
        assert_eq!(freq.due_count(date(2025, 1, 1), date(2025, 12, 31)), 0);
    }

    #[test]
    fn weekly_target_has_no_due_dates() {
        let freq = Frequency::WeeklyTarget(3);
        assert!(!freq.is_due(date(2025, 1, 6)));
        assert_eq!(freq.due_count(date(2025, 1, 1), date(2025, 12, 31)), 0);
    }

    #[test]
    fn week_window_starts_monday_and_spans_seven_days() {
        // Wednesday in the middle of a week
        let w = weekly_window(date(2025, 1, 8));
        assert_eq!(w.start, date(2025, 1, 6));
        assert_eq!(w.end, date(2025, 1, 12));
        assert!(w.contains(date(2025, 1, 6)));
        assert!(w.contains(date(2025, 1, 12)));
        assert!(!w.contains(date(2025, 1, 13)));
    }

    #[test]
    fn week_window_crosses_year_boundary() {
        // 2024-12-31 is a Tuesday; its week runs Dec 30 - Jan 5
        let w = weekly_window(date(2024, 12, 31));
        assert_eq!(w.start, date(2024, 12, 30));
        assert_eq!(w.end, date(2025, 1, 5));
        assert_eq!(weekly_window(date(2025, 1, 5)), w);
    }

    #[test]
    fn due_count_over_full_weeks() {
        // Four full weeks starting Monday 2025-01-06
        let from = date(2025, 1, 6);
        let to = date(2025, 2, 2);
        assert_eq!(Frequency::Daily.due_count(from, to), 28);
        assert_eq!(Frequency::Weekdays.due_count(from, to), 20);
        assert_eq!(Frequency::Weekends.due_count(from, to), 8);
        let mwf = Frequency::SpecificDays([1, 3, 5].into_iter().collect());
        assert_eq!(mwf.due_count(from, to), 12);
    }

    #[test]
    fn due_count_empty_when_range_inverted() {
        assert_eq!(Frequency::Daily.due_count(date(2025, 2, 1), date(2025, 1, 1)), 0);
    }

    #[test]
    fn parse_and_display_round_trip() {
        for spec in ["daily", "weekdays", "weekends", "days:1,3,5", "weekly:3"] {
            let freq = Frequency::parse(spec).unwrap();
            assert_eq!(freq.to_string(), spec);
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Frequency::parse("fortnightly").is_err());
        assert!(Frequency::parse("days:0,8").is_err());
        assert!(Frequency::parse("weekly:x").is_err());
    }

    #[test]
    fn parse_accepts_empty_day_list() {
        let freq = Frequency::parse("days:").unwrap();
        assert_eq!(freq, Frequency::SpecificDays(BTreeSet::new()));
    }
}
