//! Gamified achievements: catalog, persisted state, XP ledger.
//!
//! All achievements are created once from the fixed [`catalog`] by an
//! explicit bootstrap step (the storage layer inserts missing keys and
//! never touches existing progress). After that, only the progress and
//! unlocked fields ever change, and only through [`evaluate`].

mod catalog;
mod evaluator;

pub use catalog::{catalog, AchievementDef};
pub use evaluator::{evaluate, Evaluation};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which statistic drives an achievement's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    /// Best current streak across all tasks
    Streak,
    /// Lifetime logged completions
    Completions,
    /// Best system consistency percentage
    Consistency,
    /// Number of systems created
    Systems,
    /// Lifetime count of satisfied weekly quotas
    WeeklyQuota,
}

/// Persisted achievement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Unique identifier
    pub id: String,
    /// Stable catalog key
    pub key: String,
    /// Display name
    pub name: String,
    /// Driving statistic
    pub category: AchievementCategory,
    /// Progress needed to unlock
    pub threshold: u32,
    /// Current progress, clamped to the threshold
    pub progress: u32,
    /// Whether the achievement has been unlocked
    pub unlocked: bool,
    /// When it was unlocked
    pub unlocked_at: Option<DateTime<Utc>>,
    /// XP awarded at the unlock transition
    pub xp_reward: u32,
}

impl Achievement {
    /// Fresh locked state for a catalog entry.
    pub fn from_def(def: &AchievementDef) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            key: def.key.to_string(),
            name: def.name.to_string(),
            category: def.category,
            threshold: def.threshold,
            progress: 0,
            unlocked: false,
            unlocked_at: None,
            xp_reward: def.xp_reward,
        }
    }
}

/// Running total of earned reward points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub total_xp: u64,
}

impl Ledger {
    pub fn new(total_xp: u64) -> Self {
        Self { total_xp }
    }

    /// Add freshly awarded XP.
    pub fn award(&mut self, xp: u64) {
        self.total_xp = self.total_xp.saturating_add(xp);
    }

    /// Level derived from total XP. Reaching level `n + 1` from `n`
    /// costs `250 * n` XP, so levels get progressively slower.
    pub fn level(&self) -> u32 {
        let mut level = 1u32;
        let mut remaining = self.total_xp;
        loop {
            let cost = 250u64 * level as u64;
            if remaining < cost {
                return level;
            }
            remaining -= cost;
            level += 1;
        }
    }

    /// XP still needed to reach the next level.
    pub fn xp_to_next_level(&self) -> u64 {
        let mut level = 1u32;
        let mut remaining = self.total_xp;
        loop {
            let cost = 250u64 * level as u64;
            if remaining < cost {
                return cost - remaining;
            }
            remaining -= cost;
            level += 1;
        }
    }
}
