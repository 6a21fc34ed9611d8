//! Pure achievement reducer.
//!
//! Takes the aggregated statistics and the current persisted achievement
//! state, and produces the next state plus the XP earned by unlocks.
//! Idempotent by construction: re-running with unchanged statistics
//! yields the same achievement set and a zero XP delta, because the
//! unlock transition fires only on the locked -> unlocked edge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Achievement, AchievementCategory};
use crate::stats::EngineStats;

/// Result of one evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// The full achievement set after the pass
    pub achievements: Vec<Achievement>,
    /// Keys that unlocked during this pass
    pub newly_unlocked: Vec<String>,
    /// XP earned by this pass (zero when nothing unlocked)
    pub xp_delta: u64,
}

/// Reduce `stats` over the current achievement state.
///
/// Progress is clamped to each threshold; the unlocked flag flips exactly
/// once, at which point (and only then) the reward lands in `xp_delta`.
/// Already-unlocked achievements are carried through untouched, so a
/// later drop in the driving statistic never regresses them.
pub fn evaluate(
    stats: &EngineStats,
    achievements: &[Achievement],
    now: DateTime<Utc>,
) -> Evaluation {
    let mut updated = Vec::with_capacity(achievements.len());
    let mut newly_unlocked = Vec::new();
    let mut xp_delta = 0u64;

    for achievement in achievements {
        if achievement.unlocked {
            updated.push(achievement.clone());
            continue;
        }
        let stat = stat_for(achievement.category, stats);
        let progress = stat.min(achievement.threshold as u64) as u32;
        let mut next = achievement.clone();
        next.progress = progress;
        if progress >= next.threshold {
            next.unlocked = true;
            next.unlocked_at = Some(now);
            xp_delta += next.xp_reward as u64;
            newly_unlocked.push(next.key.clone());
        }
        updated.push(next);
    }

    Evaluation { achievements: updated, newly_unlocked, xp_delta }
}

fn stat_for(category: AchievementCategory, stats: &EngineStats) -> u64 {
    match category {
        AchievementCategory::Streak => stats.best_streak as u64,
        AchievementCategory::Completions => stats.total_completions,
        AchievementCategory::Consistency => stats.best_consistency_pct as u64,
        AchievementCategory::Systems => stats.system_count as u64,
        AchievementCategory::WeeklyQuota => stats.weeks_quota_met as u64,
    }
}
