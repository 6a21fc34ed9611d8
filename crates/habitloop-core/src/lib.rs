//! # Habitloop Core Library
//!
//! This library provides the core business logic for the Habitloop habit
//! tracker. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary over the same core library.
//!
//! ## Architecture
//!
//! - **Schedule**: pure due-date arithmetic for recurring task
//!   frequencies, including Monday-start weekly quota windows
//! - **Stats**: streaks under the "never miss twice" grace rule,
//!   completion rates, and system-level consistency, computed as pure
//!   folds over materialized snapshots
//! - **Achievements**: a fixed catalog, an idempotent evaluation
//!   reducer, and an XP ledger
//! - **Storage**: SQLite-based habit storage and TOML-based configuration
//! - **Simulation**: deterministic synthetic history generation for
//!   stress testing
//!
//! ## Key Components
//!
//! - [`Frequency`]: when a task is due
//! - [`StreakCalculator`]: current-streak computation
//! - [`CompletionAggregator`]: completion rate and consistency
//! - [`evaluate`]: achievement evaluation pass
//! - [`Database`]: habit and achievement persistence

pub mod achievements;
pub mod error;
pub mod habit;
pub mod schedule;
pub mod simulation;
pub mod stats;
pub mod storage;

pub use achievements::{
    catalog, evaluate, Achievement, AchievementCategory, AchievementDef, Evaluation, Ledger,
};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use habit::{HabitType, Log, LogSource, System, Task};
pub use schedule::{weekly_window, Frequency, WeekWindow};
pub use simulation::HistoryGenerator;
pub use stats::{
    compute_stats, CompletionAggregator, EngineStats, StreakCalculator, StreakPolicy,
    SystemSnapshot, TaskHistory,
};
pub use storage::{Config, Database};
