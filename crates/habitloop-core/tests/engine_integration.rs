//! End-to-end engine flow over an in-memory database.

use chrono::NaiveDate;
use habitloop_core::{
    compute_stats, CompletionAggregator, Database, Frequency, HabitType, Log, StreakCalculator,
    System, Task,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn full_workflow_from_store_to_stats() {
    let db = Database::open_memory().unwrap();
    let created = date(2025, 1, 6); // Monday
    let as_of = date(2025, 1, 19); // Sunday, two full weeks

    let system = System::new("Health", "health", created);
    db.insert_system(&system).unwrap();

    let stretch = Task::new(
        system.id.clone(),
        "Stretch",
        Frequency::Daily,
        HabitType::Positive,
        created,
    );
    db.insert_task(&stretch).unwrap();

    let run = Task::new(
        system.id.clone(),
        "Run",
        Frequency::WeeklyTarget(3),
        HabitType::Positive,
        created,
    );
    db.insert_task(&run).unwrap();

    // Stretch logged daily except one isolated miss on Jan 10
    let mut day = created;
    while day <= as_of {
        if day != date(2025, 1, 10) {
            db.insert_log(&Log::new(stretch.id.clone(), day)).unwrap();
        }
        day = day.succ_opt().unwrap();
    }

    // Run quota met both weeks
    for d in [
        date(2025, 1, 6),
        date(2025, 1, 8),
        date(2025, 1, 10),
        date(2025, 1, 13),
        date(2025, 1, 15),
        date(2025, 1, 17),
    ] {
        db.insert_log(&Log::new(run.id.clone(), d)).unwrap();
    }

    let snapshot = db.snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);

    let by_name = |name: &str| {
        snapshot[0]
            .tasks
            .iter()
            .find(|h| h.task.name == name)
            .unwrap()
    };

    let streaks = StreakCalculator::new();
    let history = by_name("Stretch");
    // 13 hits, one isolated miss absorbed by the grace rule
    assert_eq!(streaks.current_streak(&history.task, &history.logs, as_of), 13);

    let weekly = by_name("Run");
    assert_eq!(streaks.current_streak(&weekly.task, &weekly.logs, as_of), 2);

    let agg = CompletionAggregator::lifetime();
    let rate = agg.completion_rate(&history.task, &history.logs, as_of);
    assert!((rate - 13.0 / 14.0).abs() < 1e-9);
    assert_eq!(agg.completions_this_week(&weekly.task, &weekly.logs, as_of), 3);

    let stats = compute_stats(&snapshot, as_of);
    assert_eq!(stats.system_count, 1);
    assert_eq!(stats.task_count, 2);
    assert_eq!(stats.total_completions, 13 + 6);
    assert_eq!(stats.best_streak, 13);
    assert_eq!(stats.weeks_quota_met, 2);
    // Daily at 13/14, weekly at 2/2 -> (0.928... + 1.0) / 2 rounds to 96%
    assert_eq!(stats.best_consistency_pct, 96);
}

#[test]
fn statistics_are_recomputed_not_cached() {
    let db = Database::open_memory().unwrap();
    let created = date(2025, 1, 6);
    let as_of = date(2025, 1, 12);

    let system = System::new("Solo", "misc", created);
    db.insert_system(&system).unwrap();
    let task = Task::new(
        system.id.clone(),
        "Read",
        Frequency::Daily,
        HabitType::Positive,
        created,
    );
    db.insert_task(&task).unwrap();

    for offset in [0i64, 1, 2, 4, 5, 6] {
        db.insert_log(&Log::new(task.id.clone(), created + chrono::Duration::days(offset)))
            .unwrap();
    }

    let agg = CompletionAggregator::lifetime();
    let snapshot = db.snapshot().unwrap();
    let history = &snapshot[0].tasks[0];
    let before = agg.completion_rate(&history.task, &history.logs, as_of);

    // Backfilling the missed due date strictly increases the rate
    db.insert_log(&Log::new(task.id.clone(), created + chrono::Duration::days(3)))
        .unwrap();
    let snapshot = db.snapshot().unwrap();
    let history = &snapshot[0].tasks[0];
    let after = agg.completion_rate(&history.task, &history.logs, as_of);
    assert!(after > before);
    assert_eq!(after, 1.0);
}

#[test]
fn deleting_a_task_removes_it_from_stats() {
    let db = Database::open_memory().unwrap();
    let created = date(2025, 1, 6);

    let system = System::new("Mixed", "misc", created);
    db.insert_system(&system).unwrap();
    let keep = Task::new(system.id.clone(), "Keep", Frequency::Daily, HabitType::Positive, created);
    let drop = Task::new(system.id.clone(), "Drop", Frequency::Daily, HabitType::Positive, created);
    db.insert_task(&keep).unwrap();
    db.insert_task(&drop).unwrap();
    db.insert_log(&Log::new(drop.id.clone(), created)).unwrap();

    assert!(db.delete_task(&drop.id).unwrap());
    let stats = compute_stats(&db.snapshot().unwrap(), date(2025, 1, 7));
    assert_eq!(stats.task_count, 1);
    assert_eq!(stats.total_completions, 0);
}
