use chrono::Utc;
use clap::Subcommand;
use habitloop_core::storage::Database;
use habitloop_core::System;

#[derive(Subcommand)]
pub enum SystemAction {
    /// Create a system
    Add {
        /// Display name
        name: String,
        /// Category tag
        #[arg(long, default_value = "general")]
        category: String,
    },
    /// List systems
    List,
    /// Delete a system; its tasks and logs go with it
    Remove {
        /// System id
        id: String,
    },
}

pub fn run(action: SystemAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SystemAction::Add { name, category } => {
            let system = System::new(name, category, Utc::now().date_naive());
            db.insert_system(&system)?;
            println!("System created: {}", system.id);
        }
        SystemAction::List => {
            let systems = db.list_systems()?;
            println!("{}", serde_json::to_string_pretty(&systems)?);
        }
        SystemAction::Remove { id } => {
            if db.delete_system(&id)? {
                println!("System removed: {id}");
            } else {
                return Err(format!("no system with id {id}").into());
            }
        }
    }
    Ok(())
}
