//! Statistics over logged habit completions.
//!
//! Pure read-side computations: streaks under the "never miss twice"
//! grace rule, lifetime completion rates, weekly quota progress, and
//! system-level consistency. Nothing in this module mutates state; every
//! function is a fold over a snapshot the caller supplies.

mod completion;
mod streak;

pub use completion::CompletionAggregator;
pub use streak::{StreakCalculator, StreakPolicy};

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::{Log, System, Task};
use crate::schedule::{weekly_window, Frequency};

/// A task together with its full log history, ordered by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskHistory {
    pub task: Task,
    pub logs: Vec<Log>,
}

/// A system together with the histories of the tasks it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub system: System,
    pub tasks: Vec<TaskHistory>,
}

/// Aggregated statistics consumed by the achievement evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Number of systems
    pub system_count: u32,
    /// Number of tasks across all systems
    pub task_count: u32,
    /// Lifetime logged completions (distinct task/date pairs)
    pub total_completions: u64,
    /// Best current streak across all tasks
    pub best_streak: u32,
    /// Best system consistency, rounded percent 0-100
    pub best_consistency_pct: u32,
    /// Lifetime count of satisfied weekly quotas across quota tasks
    pub weeks_quota_met: u32,
}

/// Fold a full snapshot into the statistics the evaluator reads.
pub fn compute_stats(snapshots: &[SystemSnapshot], as_of: NaiveDate) -> EngineStats {
    let streaks = StreakCalculator::new();
    let completion = CompletionAggregator::lifetime();

    let mut stats = EngineStats {
        system_count: snapshots.len() as u32,
        ..EngineStats::default()
    };

    for snapshot in snapshots {
        for history in &snapshot.tasks {
            stats.task_count += 1;
            stats.total_completions += distinct_log_dates(&history.logs).len() as u64;
            let streak = streaks.current_streak(&history.task, &history.logs, as_of);
            stats.best_streak = stats.best_streak.max(streak);
            if let Frequency::WeeklyTarget(_) = history.task.frequency {
                stats.weeks_quota_met +=
                    completion::met_week_count(&history.task, &history.logs, as_of);
            }
        }
        let consistency = completion.system_consistency(&snapshot.tasks, as_of);
        let pct = (consistency * 100.0).round() as u32;
        stats.best_consistency_pct = stats.best_consistency_pct.max(pct.min(100));
    }

    stats
}

/// Distinct log dates; the storage layer guarantees at most one log per
/// date, but the fold must not double count if handed raw duplicates.
pub(crate) fn distinct_log_dates(logs: &[Log]) -> HashSet<NaiveDate> {
    logs.iter().map(|l| l.date).collect()
}

/// Bucket distinct log dates in `[from, to]` by their week-window start.
pub(crate) fn week_log_counts(
    logs: &[Log],
    from: NaiveDate,
    to: NaiveDate,
) -> HashMap<NaiveDate, u32> {
    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for date in distinct_log_dates(logs) {
        if date >= from && date <= to {
            *counts.entry(weekly_window(date).start).or_insert(0) += 1;
        }
    }
    counts
}
