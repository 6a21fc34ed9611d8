//! Achievement bootstrap and evaluation through the storage layer.

use chrono::{NaiveDate, Utc};
use habitloop_core::{
    catalog, compute_stats, evaluate, Database, Frequency, HabitType, Log, System, Task,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn bootstrap_then_evaluate_then_reevaluate() {
    let db = Database::open_memory().unwrap();
    db.bootstrap_achievements(&catalog()).unwrap();

    let created = date(2025, 1, 6);
    let as_of = date(2025, 1, 12);
    let system = System::new("Health", "health", created);
    db.insert_system(&system).unwrap();
    let task = Task::new(
        system.id.clone(),
        "Stretch",
        Frequency::Daily,
        HabitType::Positive,
        created,
    );
    db.insert_task(&task).unwrap();
    let mut day = created;
    while day <= as_of {
        db.insert_log(&Log::new(task.id.clone(), day)).unwrap();
        day = day.succ_opt().unwrap();
    }

    let stats = compute_stats(&db.snapshot().unwrap(), as_of);
    assert_eq!(stats.best_streak, 7);
    assert_eq!(stats.total_completions, 7);

    let evaluation = evaluate(&stats, &db.list_achievements().unwrap(), Utc::now());
    // 7-day streak, 7 completions, 1 system, perfect consistency
    assert!(evaluation.newly_unlocked.contains(&"streak_3".to_string()));
    assert!(evaluation.newly_unlocked.contains(&"streak_7".to_string()));
    assert!(evaluation.newly_unlocked.contains(&"log_1".to_string()));
    assert!(evaluation.newly_unlocked.contains(&"systems_1".to_string()));
    assert!(evaluation.newly_unlocked.contains(&"consistency_100".to_string()));
    assert!(evaluation.xp_delta > 0);

    let ledger = db.apply_evaluation(&evaluation).unwrap();
    assert_eq!(ledger.total_xp, evaluation.xp_delta);

    // Second pass with unchanged stats: nothing moves
    let again = evaluate(&stats, &db.list_achievements().unwrap(), Utc::now());
    assert_eq!(again.xp_delta, 0);
    assert!(again.newly_unlocked.is_empty());
    let ledger_after = db.apply_evaluation(&again).unwrap();
    assert_eq!(ledger_after.total_xp, ledger.total_xp);
}

#[test]
fn bootstrap_never_resets_progress() {
    let db = Database::open_memory().unwrap();
    db.bootstrap_achievements(&catalog()).unwrap();

    let stats = habitloop_core::EngineStats {
        best_streak: 7,
        ..Default::default()
    };
    let evaluation = evaluate(&stats, &db.list_achievements().unwrap(), Utc::now());
    db.apply_evaluation(&evaluation).unwrap();

    // A second bootstrap (e.g. app upgrade) inserts nothing and keeps state
    assert_eq!(db.bootstrap_achievements(&catalog()).unwrap(), 0);
    let streak_7 = db
        .list_achievements()
        .unwrap()
        .into_iter()
        .find(|a| a.key == "streak_7")
        .unwrap();
    assert!(streak_7.unlocked);
    assert_eq!(streak_7.progress, 7);
}

#[test]
fn unlocks_survive_streak_breaks() {
    let db = Database::open_memory().unwrap();
    db.bootstrap_achievements(&catalog()).unwrap();

    let streak_stats = habitloop_core::EngineStats {
        best_streak: 14,
        ..Default::default()
    };
    let first = evaluate(&streak_stats, &db.list_achievements().unwrap(), Utc::now());
    db.apply_evaluation(&first).unwrap();
    let xp_after_first = db.ledger().unwrap().total_xp;

    // Streak collapses to zero; unlocked milestones stay and no XP moves
    let broken = habitloop_core::EngineStats::default();
    let second = evaluate(&broken, &db.list_achievements().unwrap(), Utc::now());
    db.apply_evaluation(&second).unwrap();

    let achievements = db.list_achievements().unwrap();
    let streak_14 = achievements.iter().find(|a| a.key == "streak_14").unwrap();
    assert!(streak_14.unlocked);
    assert_eq!(streak_14.progress, 14);
    assert_eq!(db.ledger().unwrap().total_xp, xp_after_first);

    // A still-locked one tracks the collapsed statistic
    let streak_30 = achievements.iter().find(|a| a.key == "streak_30").unwrap();
    assert!(!streak_30.unlocked);
    assert_eq!(streak_30.progress, 0);
}
