use chrono::{Duration, Utc};
use clap::Args;
use habitloop_core::storage::Database;
use habitloop_core::HistoryGenerator;
use serde_json::json;

/// Generate a deterministic synthetic history, for stress testing the
/// engine against multi-year log volumes.
#[derive(Args)]
pub struct SeedArgs {
    /// Seed only this task (default: every task)
    #[arg(long)]
    pub task_id: Option<String>,
    /// How many days of history to generate, ending today
    #[arg(long, default_value_t = 365)]
    pub days: u32,
    /// Per-due-date completion probability
    #[arg(long, default_value_t = 0.8)]
    pub probability: f64,
    /// RNG seed; identical seeds produce identical histories
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

pub fn run(args: SeedArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let to = Utc::now().date_naive();
    let from = to - Duration::days(args.days.max(1) as i64 - 1);

    let tasks = match &args.task_id {
        Some(id) => {
            let task = db
                .get_task(id)?
                .ok_or_else(|| format!("no task with id {id}"))?;
            vec![task]
        }
        None => {
            let mut all = Vec::new();
            for system in db.list_systems()? {
                all.extend(db.list_tasks(&system.id)?);
            }
            all
        }
    };
    if tasks.is_empty() {
        return Err("no tasks to seed".into());
    }

    let mut generator = HistoryGenerator::new(args.seed);
    let mut generated = 0usize;
    let mut inserted = 0usize;
    for task in &tasks {
        let logs = generator.generate(task, from, to, args.probability);
        generated += logs.len();
        inserted += db.insert_logs(&logs)?;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "tasks": tasks.len(),
            "from": from,
            "to": to,
            "generated": generated,
            "inserted": inserted,
        }))?
    );
    Ok(())
}
