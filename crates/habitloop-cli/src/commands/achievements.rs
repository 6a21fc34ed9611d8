use chrono::Utc;
use clap::Subcommand;
use habitloop_core::storage::Database;
use habitloop_core::{catalog, compute_stats, evaluate};
use serde_json::json;

use super::parse_as_of;

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// List achievement state and the XP ledger
    List,
    /// Recompute statistics, evaluate the catalog, persist unlocks
    Sync {
        /// Evaluate as of this date, YYYY-MM-DD (default: today)
        #[arg(long)]
        as_of: Option<String>,
    },
}

pub fn run(action: AchievementsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    // First-launch seeding; a no-op on every later call.
    db.bootstrap_achievements(&catalog())?;

    match action {
        AchievementsAction::List => {
            let achievements = db.list_achievements()?;
            let ledger = db.ledger()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "achievements": achievements,
                    "total_xp": ledger.total_xp,
                    "level": ledger.level(),
                }))?
            );
        }
        AchievementsAction::Sync { as_of } => {
            let as_of = parse_as_of(as_of.as_deref())?;
            let stats = compute_stats(&db.snapshot()?, as_of);
            let evaluation = evaluate(&stats, &db.list_achievements()?, Utc::now());
            let ledger = db.apply_evaluation(&evaluation)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "newly_unlocked": evaluation.newly_unlocked,
                    "xp_earned": evaluation.xp_delta,
                    "total_xp": ledger.total_xp,
                    "level": ledger.level(),
                }))?
            );
        }
    }
    Ok(())
}
