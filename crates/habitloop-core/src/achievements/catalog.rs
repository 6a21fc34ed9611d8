//! The fixed achievement catalog.
//!
//! Pure static data: stable keys, thresholds, and XP rewards. The keys
//! are persisted, so entries must never be renamed; add new ones instead.

use super::AchievementCategory;

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub threshold: u32,
    pub xp_reward: u32,
}

/// The full catalog, in display order.
pub fn catalog() -> Vec<AchievementDef> {
    use AchievementCategory::*;

    vec![
        // Streak milestones
        def("streak_3", "Getting Started", "Hold a 3-day streak", Streak, 3, 10),
        def("streak_7", "One Week Strong", "Hold a 7-day streak", Streak, 7, 25),
        def("streak_14", "Fortnight", "Hold a 14-day streak", Streak, 14, 50),
        def("streak_30", "Monthly Habit", "Hold a 30-day streak", Streak, 30, 120),
        def("streak_60", "Two Months Deep", "Hold a 60-day streak", Streak, 60, 250),
        def("streak_100", "Century", "Hold a 100-day streak", Streak, 100, 500),
        def("streak_180", "Half Year", "Hold a 180-day streak", Streak, 180, 1000),
        def("streak_365", "Full Circle", "Hold a 365-day streak", Streak, 365, 2500),
        // Lifetime completions
        def("log_1", "First Log", "Log your first completion", Completions, 1, 5),
        def("log_10", "Warming Up", "Log 10 completions", Completions, 10, 15),
        def("log_50", "Fifty Deep", "Log 50 completions", Completions, 50, 40),
        def("log_100", "Hundred Club", "Log 100 completions", Completions, 100, 80),
        def("log_250", "Regular", "Log 250 completions", Completions, 250, 150),
        def("log_500", "Dedicated", "Log 500 completions", Completions, 500, 300),
        def("log_1000", "Thousand Strong", "Log 1,000 completions", Completions, 1000, 600),
        def("log_5000", "Lifer", "Log 5,000 completions", Completions, 5000, 2000),
        // Consistency
        def("consistency_50", "Finding Rhythm", "Reach 50% system consistency", Consistency, 50, 30),
        def("consistency_75", "Reliable", "Reach 75% system consistency", Consistency, 75, 75),
        def("consistency_90", "Clockwork", "Reach 90% system consistency", Consistency, 90, 200),
        def("consistency_100", "Flawless", "Reach 100% system consistency", Consistency, 100, 400),
        // Systems
        def("systems_1", "Architect", "Create your first system", Systems, 1, 5),
        def("systems_3", "Portfolio", "Run 3 systems", Systems, 3, 30),
        def("systems_5", "Juggler", "Run 5 systems", Systems, 5, 75),
        def("systems_10", "Empire", "Run 10 systems", Systems, 10, 200),
        // Weekly quotas
        def("quota_1", "Quota Met", "Satisfy a weekly quota", WeeklyQuota, 1, 10),
        def("quota_5", "Five Weeks", "Satisfy 5 weekly quotas", WeeklyQuota, 5, 40),
        def("quota_25", "Quarter Master", "Satisfy 25 weekly quotas", WeeklyQuota, 25, 150),
        def("quota_100", "Quota Machine", "Satisfy 100 weekly quotas", WeeklyQuota, 100, 600),
    ]
}

fn def(
    key: &'static str,
    name: &'static str,
    description: &'static str,
    category: AchievementCategory,
    threshold: u32,
    xp_reward: u32,
) -> AchievementDef {
    AchievementDef { key, name, description, category, threshold, xp_reward }
}
