use chrono::Utc;
use clap::Subcommand;
use habitloop_core::storage::Database;
use habitloop_core::{Frequency, HabitType, Task};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task inside a system
    Add {
        /// Owning system id
        system_id: String,
        /// Display name
        name: String,
        /// Frequency spec: daily, weekdays, weekends, days:1,3,5, weekly:3
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// positive (build up) or negative (reduce)
        #[arg(long, default_value = "positive")]
        habit_type: String,
        /// Optional cue time of day, HH:mm
        #[arg(long)]
        cue: Option<String>,
    },
    /// List the tasks of a system
    List {
        /// System id
        system_id: String,
    },
    /// Delete a task and its logs
    Remove {
        /// Task id
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Add { system_id, name, frequency, habit_type, cue } => {
            if db.get_system(&system_id)?.is_none() {
                return Err(format!("no system with id {system_id}").into());
            }
            let frequency = Frequency::parse(&frequency)?;
            let habit_type = match habit_type.as_str() {
                "positive" => HabitType::Positive,
                "negative" => HabitType::Negative,
                other => return Err(format!("unknown habit type '{other}'").into()),
            };
            let mut task = Task::new(system_id, name, frequency, habit_type, Utc::now().date_naive());
            task.cue_time = cue;
            db.insert_task(&task)?;
            println!("Task created: {}", task.id);
        }
        TaskAction::List { system_id } => {
            let tasks = db.list_tasks(&system_id)?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Remove { id } => {
            if db.delete_task(&id)? {
                println!("Task removed: {id}");
            } else {
                return Err(format!("no task with id {id}").into());
            }
        }
    }
    Ok(())
}
