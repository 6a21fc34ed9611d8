//! Domain types for habit tracking.
//!
//! A [`System`] groups recurring tasks that belong to one practice (e.g.
//! "Morning routine"). Each [`Task`] carries a [`Frequency`] describing
//! when it is due, and owns an ordered-by-date set of [`Log`] records.
//! Ownership flows strictly downward (System -> Task -> Log); the reverse
//! edges are plain string ids resolved through the storage layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::schedule::Frequency;

/// Direction of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitType {
    /// Habit to build up (exercise, reading).
    Positive,
    /// Habit to reduce or avoid (smoking, doomscrolling).
    Negative,
}

impl Default for HabitType {
    fn default() -> Self {
        HabitType::Positive
    }
}

/// Provenance of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    /// Logged by the user.
    Manual,
    /// Ingested from an external tracker.
    External,
    /// Produced by the synthetic history generator.
    Synthetic,
}

impl Default for LogSource {
    fn default() -> Self {
        LogSource::Manual
    }
}

/// A group of related recurring tasks.
///
/// The creation date is the lower bound for every due-date computation of
/// the tasks it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct System {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form category tag ("health", "work", ...)
    pub category: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Creation date in the user's calendar (day granularity)
    pub created_on: NaiveDate,
}

impl System {
    /// Create a new system with a fresh id, created "now" on `today`.
    pub fn new(name: impl Into<String>, category: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category: category.into(),
            created_at: Utc::now(),
            created_on: today,
        }
    }
}

/// A single recurring task inside a system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Owning system id (non-owning back-reference)
    pub system_id: String,
    /// Display name
    pub name: String,
    /// When the task is due
    pub frequency: Frequency,
    /// Build-up or reduce habit
    #[serde(default)]
    pub habit_type: HabitType,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Creation date in the user's calendar; due dates start here
    pub created_on: NaiveDate,
    /// Optional cue time of day, "HH:mm" (display only)
    #[serde(default)]
    pub cue_time: Option<String>,
}

impl Task {
    /// Create a new task with a fresh id, created "now" on `today`.
    pub fn new(
        system_id: impl Into<String>,
        name: impl Into<String>,
        frequency: Frequency,
        habit_type: HabitType,
        today: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            system_id: system_id.into(),
            name: name.into(),
            frequency,
            habit_type,
            created_at: Utc::now(),
            created_on: today,
            cue_time: None,
        }
    }
}

/// One logged completion for a task on a calendar date.
///
/// At most one authoritative log exists per task per date; the storage
/// layer enforces this with a unique constraint and ignores duplicates.
/// Logs are immutable once created, except for deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    /// Unique identifier
    pub id: String,
    /// Task this log belongs to (back-reference)
    pub task_id: String,
    /// Calendar date of the completion (no time component)
    pub date: NaiveDate,
    /// Optional free-text note
    #[serde(default)]
    pub note: Option<String>,
    /// Optional satisfaction rating, 1-5
    #[serde(default)]
    pub rating: Option<u8>,
    /// Optional minutes spent (meaningful for negative habits)
    #[serde(default)]
    pub minutes: Option<u32>,
    /// Where the log came from
    #[serde(default)]
    pub source: LogSource,
    /// Optional value carried over from an external tracker
    #[serde(default)]
    pub external_value: Option<f64>,
}

impl Log {
    /// Create a manual log for a task on a date.
    pub fn new(task_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            date,
            note: None,
            rating: None,
            minutes: None,
            source: LogSource::Manual,
            external_value: None,
        }
    }

    /// Attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Attach a satisfaction rating, clamped to 1-5.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating.clamp(1, 5));
        self
    }

    /// Attach minutes spent.
    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.minutes = Some(minutes);
        self
    }

    /// Mark the provenance of the log.
    pub fn with_source(mut self, source: LogSource) -> Self {
        self.source = source;
        self
    }
}
