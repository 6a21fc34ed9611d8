//! Completion rates, weekly quota progress, and system consistency.

use chrono::{Duration, NaiveDate};

use crate::habit::{Log, Task};
use crate::schedule::{weekly_window, Frequency};
use crate::stats::{distinct_log_dates, week_log_counts, TaskHistory};

/// Read-side aggregator over a task's log history.
///
/// The trailing window only affects [`system_consistency`]; per-task
/// completion rates are always lifetime, matching what the rest of the
/// engine (and the achievement evaluator) reads.
///
/// [`system_consistency`]: CompletionAggregator::system_consistency
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionAggregator {
    trailing_window_days: Option<u32>,
}

impl CompletionAggregator {
    /// Aggregator computing consistency over the full task lifetime.
    pub fn lifetime() -> Self {
        Self { trailing_window_days: None }
    }

    /// Aggregator restricting consistency to the trailing `days` days.
    ///
    /// A zero window is treated as lifetime.
    pub fn with_trailing_window(days: u32) -> Self {
        Self {
            trailing_window_days: if days == 0 { None } else { Some(days) },
        }
    }

    /// Lifetime completion rate in [0, 1].
    ///
    /// Fixed patterns: distinct logged due-dates over due-dates since
    /// creation. Logs on dates that were never due are ignored, so the
    /// rate is invariant under them; filling a previously-missed due date
    /// strictly increases it. Weekly quotas: met weeks over countable
    /// weeks, where the in-progress week only counts once met. 0.0 when
    /// there is nothing to count.
    pub fn completion_rate(&self, task: &Task, logs: &[Log], as_of: NaiveDate) -> f64 {
        rate_between(task, logs, NaiveDate::MIN, as_of).unwrap_or(0.0)
    }

    /// Completions inside the current Monday-start week, up to `as_of`.
    ///
    /// Fixed patterns count only logs on due dates; quota tasks count
    /// every log in the window.
    pub fn completions_this_week(&self, task: &Task, logs: &[Log], as_of: NaiveDate) -> u32 {
        let window = weekly_window(as_of);
        distinct_log_dates(logs)
            .into_iter()
            .filter(|d| window.contains(*d) && *d <= as_of && *d >= task.created_on)
            .filter(|d| match &task.frequency {
                Frequency::WeeklyTarget(_) => true,
                fixed => fixed.is_due(*d),
            })
            .count() as u32
    }

    /// Mean per-task completion rate across a system's tasks, restricted
    /// to the aggregator's trailing window.
    ///
    /// A system with zero tasks scores 0.0 rather than dividing by zero.
    /// Tasks with no due-dates inside the window are excluded from the
    /// mean; if every task is excluded the result is 0.0.
    pub fn system_consistency(&self, tasks: &[TaskHistory], as_of: NaiveDate) -> f64 {
        let from = match self.trailing_window_days {
            Some(days) => as_of - Duration::days(days as i64 - 1),
            None => NaiveDate::MIN,
        };
        let rates: Vec<f64> = tasks
            .iter()
            .filter_map(|h| rate_between(&h.task, &h.logs, from, as_of))
            .collect();
        if rates.is_empty() {
            0.0
        } else {
            rates.iter().sum::<f64>() / rates.len() as f64
        }
    }
}

/// Completion rate over `[from, as_of]` clipped to the task's lifetime.
///
/// `None` means the task has nothing to be measured on in the range (no
/// due dates, no countable weeks) and should be excluded from means.
fn rate_between(task: &Task, logs: &[Log], from: NaiveDate, as_of: NaiveDate) -> Option<f64> {
    let start = from.max(task.created_on);
    if as_of < start {
        return None;
    }
    match &task.frequency {
        Frequency::WeeklyTarget(target) => {
            if *target == 0 {
                // Degenerate quota: permanently unmet.
                return Some(0.0);
            }
            let counts = week_log_counts(logs, start, as_of);
            let last_week = weekly_window(as_of);
            let mut window = weekly_window(start);
            let mut met = 0u32;
            let mut countable = 0u32;
            loop {
                let week_met = counts.get(&window.start).copied().unwrap_or(0) >= *target;
                if week_met {
                    met += 1;
                    countable += 1;
                } else if window.end < as_of {
                    countable += 1;
                }
                if window.start >= last_week.start {
                    break;
                }
                window = window.next();
            }
            if countable == 0 {
                None
            } else {
                Some(met as f64 / countable as f64)
            }
        }
        fixed => {
            let due = fixed.due_count(start, as_of);
            if due == 0 {
                return None;
            }
            let logged = distinct_log_dates(logs);
            let hits = fixed
                .due_dates(start, as_of)
                .filter(|d| logged.contains(d))
                .count() as u64;
            Some(hits as f64 / due as f64)
        }
    }
}

/// Lifetime count of satisfied weekly quotas for a quota task.
///
/// Zero for fixed-pattern tasks and degenerate quotas.
pub(crate) fn met_week_count(task: &Task, logs: &[Log], as_of: NaiveDate) -> u32 {
    let target = match &task.frequency {
        Frequency::WeeklyTarget(n) if *n > 0 => *n,
        _ => return 0,
    };
    if as_of < task.created_on {
        return 0;
    }
    week_log_counts(logs, task.created_on, as_of)
        .values()
        .filter(|count| **count >= target)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::HabitType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(frequency: Frequency, created_on: NaiveDate) -> Task {
        Task::new("sys", "t", frequency, HabitType::Positive, created_on)
    }

    fn logs_on(task: &Task, dates: &[NaiveDate]) -> Vec<Log> {
        dates.iter().map(|d| Log::new(task.id.clone(), *d)).collect()
    }

    #[test]
    fn rate_is_hits_over_due_dates() {
        let created = date(2025, 1, 6);
        let as_of = date(2025, 1, 15); // 10 daily due dates
        let t = task(Frequency::Daily, created);
        let logs = logs_on(
            &t,
            &[date(2025, 1, 6), date(2025, 1, 7), date(2025, 1, 8), date(2025, 1, 9), date(2025, 1, 10)],
        );
        let rate = CompletionAggregator::lifetime().completion_rate(&t, &logs, as_of);
        assert!((rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn filling_a_missed_due_date_increases_rate() {
        let created = date(2025, 1, 6);
        let as_of = date(2025, 1, 15);
        let t = task(Frequency::Daily, created);
        let mut logs = logs_on(&t, &[date(2025, 1, 6), date(2025, 1, 7)]);
        let agg = CompletionAggregator::lifetime();
        let before = agg.completion_rate(&t, &logs, as_of);
        logs.push(Log::new(t.id.clone(), date(2025, 1, 9)));
        let after = agg.completion_rate(&t, &logs, as_of);
        assert!(after > before);
    }

    #[test]
    fn logs_on_non_due_dates_do_not_move_the_rate() {
        let created = date(2025, 1, 6); // Monday
        let as_of = date(2025, 1, 19);
        let t = task(Frequency::Weekdays, created);
        let mut logs = logs_on(&t, &[date(2025, 1, 6), date(2025, 1, 7), date(2025, 1, 8)]);
        let agg = CompletionAggregator::lifetime();
        let before = agg.completion_rate(&t, &logs, as_of);
        // Saturday log: never due for a weekday task
        logs.push(Log::new(t.id.clone(), date(2025, 1, 11)));
        let after = agg.completion_rate(&t, &logs, as_of);
        assert_eq!(before, after);
    }

    #[test]
    fn perfect_history_rate_is_one() {
        let created = date(2025, 1, 6);
        let as_of = date(2025, 1, 12);
        let t = task(Frequency::Daily, created);
        let all: Vec<NaiveDate> = (0..7).map(|i| created + Duration::days(i)).collect();
        let logs = logs_on(&t, &all);
        let rate = CompletionAggregator::lifetime().completion_rate(&t, &logs, as_of);
        assert_eq!(rate, 1.0);
    }

    #[test]
    fn rate_before_creation_is_zero() {
        let t = task(Frequency::Daily, date(2025, 1, 6));
        let rate = CompletionAggregator::lifetime().completion_rate(&t, &[], date(2025, 1, 1));
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn weekly_quota_three_logs_satisfy_target_three() {
        let created = date(2025, 1, 6);
        let t = task(Frequency::WeeklyTarget(3), created);
        let logs = logs_on(&t, &[date(2025, 1, 6), date(2025, 1, 9), date(2025, 1, 12)]);
        assert_eq!(met_week_count(&t, &logs, date(2025, 1, 12)), 1);

        let two = logs_on(&t, &[date(2025, 1, 6), date(2025, 1, 9)]);
        assert_eq!(met_week_count(&t, &two, date(2025, 1, 12)), 0);
    }

    #[test]
    fn weekly_rate_ignores_in_progress_week_until_met() {
        let created = date(2025, 1, 6);
        let t = task(Frequency::WeeklyTarget(2), created);
        // Week 1 met; week 2 has one log so far
        let logs = logs_on(&t, &[date(2025, 1, 6), date(2025, 1, 8), date(2025, 1, 14)]);
        let agg = CompletionAggregator::lifetime();
        // Wednesday of week 2: only week 1 countable
        let rate = agg.completion_rate(&t, &logs, date(2025, 1, 15));
        assert_eq!(rate, 1.0);
        // Second log lands; week 2 becomes countable and met
        let mut logs = logs;
        logs.push(Log::new(t.id.clone(), date(2025, 1, 15)));
        let rate = agg.completion_rate(&t, &logs, date(2025, 1, 15));
        assert_eq!(rate, 1.0);
    }

    #[test]
    fn weekly_rate_counts_elapsed_unmet_weeks() {
        let created = date(2025, 1, 6);
        let t = task(Frequency::WeeklyTarget(2), created);
        // Week 1 met, week 2 empty, asked the Monday after
        let logs = logs_on(&t, &[date(2025, 1, 6), date(2025, 1, 8)]);
        let rate = CompletionAggregator::lifetime().completion_rate(&t, &logs, date(2025, 1, 20));
        assert!((rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_quota_rate_is_zero() {
        let created = date(2025, 1, 6);
        let t = task(Frequency::WeeklyTarget(0), created);
        let logs = logs_on(&t, &[date(2025, 1, 7)]);
        let rate = CompletionAggregator::lifetime().completion_rate(&t, &logs, date(2025, 1, 20));
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn completions_this_week_counts_due_logs_only() {
        let created = date(2025, 1, 6);
        let t = task(Frequency::Weekdays, created);
        // Wed + Sat of the week containing Jan 15
        let logs = logs_on(&t, &[date(2025, 1, 13), date(2025, 1, 15), date(2025, 1, 18)]);
        let agg = CompletionAggregator::lifetime();
        assert_eq!(agg.completions_this_week(&t, &logs, date(2025, 1, 18)), 2);
    }

    #[test]
    fn completions_this_week_for_quota_counts_everything() {
        let created = date(2025, 1, 6);
        let t = task(Frequency::WeeklyTarget(5), created);
        let logs = logs_on(&t, &[date(2025, 1, 13), date(2025, 1, 15), date(2025, 1, 18)]);
        let agg = CompletionAggregator::lifetime();
        assert_eq!(agg.completions_this_week(&t, &logs, date(2025, 1, 19)), 3);
        // Logs after as_of are not counted yet
        assert_eq!(agg.completions_this_week(&t, &logs, date(2025, 1, 14)), 1);
    }

    #[test]
    fn consistency_of_empty_system_is_zero() {
        let agg = CompletionAggregator::lifetime();
        assert_eq!(agg.system_consistency(&[], date(2025, 1, 10)), 0.0);
    }

    #[test]
    fn consistency_averages_task_rates() {
        let created = date(2025, 1, 6);
        let as_of = date(2025, 1, 12);
        let full = task(Frequency::Daily, created);
        let all: Vec<NaiveDate> = (0..7).map(|i| created + Duration::days(i)).collect();
        let half = task(Frequency::Daily, created);
        let some: Vec<NaiveDate> = (0..7).filter(|i| i % 2 == 0).map(|i| created + Duration::days(i)).collect();

        let histories = vec![
            TaskHistory { logs: logs_on(&full, &all), task: full },
            TaskHistory { logs: logs_on(&half, &some), task: half },
        ];
        let consistency = CompletionAggregator::lifetime().system_consistency(&histories, as_of);
        let expected = (1.0 + 4.0 / 7.0) / 2.0;
        assert!((consistency - expected).abs() < 1e-9);
    }

    #[test]
    fn trailing_window_restricts_consistency() {
        let created = date(2025, 1, 6);
        let as_of = date(2025, 1, 19);
        let t = task(Frequency::Daily, created);
        // First week perfect, second week empty
        let first_week: Vec<NaiveDate> = (0..7).map(|i| created + Duration::days(i)).collect();
        let histories = vec![TaskHistory { logs: logs_on(&t, &first_week), task: t }];

        let lifetime = CompletionAggregator::lifetime().system_consistency(&histories, as_of);
        let window = CompletionAggregator::with_trailing_window(7).system_consistency(&histories, as_of);
        assert!(lifetime > 0.4 && lifetime < 0.6);
        assert_eq!(window, 0.0);
    }

    #[test]
    fn tasks_without_due_dates_in_window_are_excluded() {
        let as_of = date(2025, 1, 19);
        // Weekend-only task asked over a Mon-Fri window
        let weekend = task(Frequency::Weekends, date(2025, 1, 13));
        let daily = task(Frequency::Daily, date(2025, 1, 13));
        let all: Vec<NaiveDate> = (0..5).map(|i| date(2025, 1, 13) + Duration::days(i)).collect();
        let histories = vec![
            TaskHistory { logs: vec![], task: weekend },
            TaskHistory { logs: logs_on(&daily, &all), task: daily },
        ];
        // Window covering Mon-Fri only
        let agg = CompletionAggregator::with_trailing_window(5);
        let consistency = agg.system_consistency(&histories, date(2025, 1, 17));
        assert_eq!(consistency, 1.0);
        // Lifetime through the weekend includes the weekend task
        let lifetime = CompletionAggregator::lifetime().system_consistency(&histories, as_of);
        assert!(lifetime < 1.0);
    }
}
