use clap::Subcommand;
use habitloop_core::storage::Database;
use habitloop_core::Log;

use super::parse_as_of;

#[derive(Subcommand)]
pub enum LogAction {
    /// Log a completion (one per task per date; duplicates are ignored)
    Add {
        /// Task id
        task_id: String,
        /// Completion date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Free-text note
        #[arg(long)]
        note: Option<String>,
        /// Satisfaction rating 1-5
        #[arg(long)]
        rating: Option<u8>,
        /// Minutes spent
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Remove the log for a date
    Remove {
        /// Task id
        task_id: String,
        /// Log date, YYYY-MM-DD
        date: String,
    },
    /// List a task's logs, ordered by date
    List {
        /// Task id
        task_id: String,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        LogAction::Add { task_id, date, note, rating, minutes } => {
            if db.get_task(&task_id)?.is_none() {
                return Err(format!("no task with id {task_id}").into());
            }
            let date = parse_as_of(date.as_deref())?;
            let mut log = Log::new(task_id, date);
            if let Some(note) = note {
                log = log.with_note(note);
            }
            if let Some(rating) = rating {
                log = log.with_rating(rating);
            }
            if let Some(minutes) = minutes {
                log = log.with_minutes(minutes);
            }
            if db.insert_log(&log)? {
                println!("Logged {date}");
            } else {
                println!("Already logged on {date}");
            }
        }
        LogAction::Remove { task_id, date } => {
            let date = date.parse()?;
            if db.delete_log(&task_id, date)? {
                println!("Log removed: {date}");
            } else {
                return Err(format!("no log on {date}").into());
            }
        }
        LogAction::List { task_id } => {
            let logs = db.list_logs(&task_id)?;
            println!("{}", serde_json::to_string_pretty(&logs)?);
        }
    }
    Ok(())
}
