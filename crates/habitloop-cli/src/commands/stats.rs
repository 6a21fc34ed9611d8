use clap::Subcommand;
use habitloop_core::storage::{Config, Database};
use habitloop_core::{compute_stats, CompletionAggregator, TaskHistory};
use serde_json::json;

use super::parse_as_of;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Current streak for a task
    Streak {
        /// Task id
        task_id: String,
        /// Compute as of this date, YYYY-MM-DD (default: today)
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Lifetime completion rate for a task
    Rate {
        /// Task id
        task_id: String,
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Completions inside the current week window
    Week {
        /// Task id
        task_id: String,
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Consistency across a system's tasks
    Consistency {
        /// System id
        system_id: String,
        #[arg(long)]
        as_of: Option<String>,
        /// Trailing window in days (overrides config; 0 = lifetime)
        #[arg(long)]
        window: Option<u32>,
    },
    /// Aggregate statistics across all systems
    Summary {
        #[arg(long)]
        as_of: Option<String>,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;

    match action {
        StatsAction::Streak { task_id, as_of } => {
            let as_of = parse_as_of(as_of.as_deref())?;
            let history = task_history(&db, &task_id)?;
            let streak = config
                .streak_calculator()
                .current_streak(&history.task, &history.logs, as_of);
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "task_id": task_id,
                    "as_of": as_of,
                    "streak": streak,
                }))?
            );
        }
        StatsAction::Rate { task_id, as_of } => {
            let as_of = parse_as_of(as_of.as_deref())?;
            let history = task_history(&db, &task_id)?;
            let rate = CompletionAggregator::lifetime().completion_rate(
                &history.task,
                &history.logs,
                as_of,
            );
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "task_id": task_id,
                    "as_of": as_of,
                    "completion_rate": rate,
                }))?
            );
        }
        StatsAction::Week { task_id, as_of } => {
            let as_of = parse_as_of(as_of.as_deref())?;
            let history = task_history(&db, &task_id)?;
            let count = CompletionAggregator::lifetime().completions_this_week(
                &history.task,
                &history.logs,
                as_of,
            );
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "task_id": task_id,
                    "as_of": as_of,
                    "completions_this_week": count,
                }))?
            );
        }
        StatsAction::Consistency { system_id, as_of, window } => {
            let as_of = parse_as_of(as_of.as_deref())?;
            if db.get_system(&system_id)?.is_none() {
                return Err(format!("no system with id {system_id}").into());
            }
            let aggregator = match window {
                Some(days) => CompletionAggregator::with_trailing_window(days),
                None => config.completion_aggregator(),
            };
            let mut histories = Vec::new();
            for task in db.list_tasks(&system_id)? {
                let logs = db.list_logs(&task.id)?;
                histories.push(TaskHistory { task, logs });
            }
            let consistency = aggregator.system_consistency(&histories, as_of);
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "system_id": system_id,
                    "as_of": as_of,
                    "consistency": consistency,
                }))?
            );
        }
        StatsAction::Summary { as_of } => {
            let as_of = parse_as_of(as_of.as_deref())?;
            let stats = compute_stats(&db.snapshot()?, as_of);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}

fn task_history(db: &Database, task_id: &str) -> Result<TaskHistory, Box<dyn std::error::Error>> {
    let task = db
        .get_task(task_id)?
        .ok_or_else(|| format!("no task with id {task_id}"))?;
    let logs = db.list_logs(task_id)?;
    Ok(TaskHistory { task, logs })
}
