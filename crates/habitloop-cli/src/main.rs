use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "habitloop-cli", version, about = "Habitloop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// System management
    System {
        #[command(subcommand)]
        action: commands::system::SystemAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Completion logs
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Streaks, rates and consistency
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Achievements and XP
    Achievements {
        #[command(subcommand)]
        action: commands::achievements::AchievementsAction,
    },
    /// Generate a synthetic history for stress testing
    Seed(commands::seed::SeedArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::System { action } => commands::system::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Achievements { action } => commands::achievements::run(action),
        Commands::Seed(args) => commands::seed::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
