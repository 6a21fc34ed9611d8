//! Current-streak computation under the "never miss twice" rule.
//!
//! A single isolated missed due-date never breaks a streak; two missed
//! due-dates in a row do. The grace is local and repeatable: an
//! alternating hit/miss history keeps every hit. Weekly-quota tasks are
//! evaluated at week granularity with the same rule, one hit or miss per
//! week.

use chrono::NaiveDate;

use crate::habit::{Log, Task};
use crate::schedule::{weekly_window, Frequency};
use crate::stats::{distinct_log_dates, week_log_counts};

/// Tunable streak policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakPolicy {
    /// Consecutive misses tolerated before the streak ends.
    ///
    /// The default of 1 is the "never miss twice" rule; 0 means any miss
    /// breaks the streak.
    pub max_consecutive_misses: u32,
}

impl Default for StreakPolicy {
    fn default() -> Self {
        Self { max_consecutive_misses: 1 }
    }
}

/// Walks a task's due-date sequence backward from "today" and counts hits.
#[derive(Debug, Clone, Default)]
pub struct StreakCalculator {
    policy: StreakPolicy,
}

impl StreakCalculator {
    /// Calculator with the default never-miss-twice policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator with a custom policy.
    pub fn with_policy(policy: StreakPolicy) -> Self {
        Self { policy }
    }

    /// Current streak for `task` as of `as_of`, given its log history.
    ///
    /// Single backward pass, O(due-dates since creation). The due-date
    /// equal to `as_of` is never counted as a miss while unlogged: the
    /// day has not elapsed yet, so an intact streak is not zeroed by a
    /// task that simply has not been logged today. Degenerate inputs
    /// (empty day set, zero quota, `as_of` before creation) yield 0.
    pub fn current_streak(&self, task: &Task, logs: &[Log], as_of: NaiveDate) -> u32 {
        if as_of < task.created_on {
            return 0;
        }
        match &task.frequency {
            Frequency::WeeklyTarget(target) => self.weekly_streak(task, logs, as_of, *target),
            _ => self.fixed_pattern_streak(task, logs, as_of),
        }
    }

    fn fixed_pattern_streak(&self, task: &Task, logs: &[Log], as_of: NaiveDate) -> u32 {
        let logged: std::collections::HashSet<NaiveDate> = distinct_log_dates(logs)
            .into_iter()
            .filter(|d| *d >= task.created_on && *d <= as_of)
            .collect();

        let mut streak = 0u32;
        let mut misses = 0u32;
        let mut day = as_of;
        loop {
            if task.frequency.is_due(day) {
                if logged.contains(&day) {
                    streak += 1;
                    misses = 0;
                } else if day < as_of {
                    misses += 1;
                    if misses > self.policy.max_consecutive_misses {
                        break;
                    }
                }
                // Unlogged due-date equal to as_of: still open, neither
                // hit nor miss.
            }
            if day == task.created_on {
                break;
            }
            day = match day.pred_opt() {
                Some(prev) => prev,
                None => break,
            };
        }
        streak
    }

    fn weekly_streak(&self, task: &Task, logs: &[Log], as_of: NaiveDate, target: u32) -> u32 {
        if target == 0 {
            return 0;
        }
        let counts = week_log_counts(logs, task.created_on, as_of);
        let first_week = weekly_window(task.created_on);

        let mut streak = 0u32;
        let mut misses = 0u32;
        let mut window = weekly_window(as_of);
        loop {
            let met = counts.get(&window.start).copied().unwrap_or(0) >= target;
            if met {
                streak += 1;
                misses = 0;
            } else if window.end < as_of {
                // Only fully-elapsed weeks can be misses.
                misses += 1;
                if misses > self.policy.max_consecutive_misses {
                    break;
                }
            }
            if window.start <= first_week.start {
                break;
            }
            window = window.previous();
        }
        streak
    }
}
