use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ebs", version, about = "Evidence-based schedule forecasting")]
struct Cli {
    /// Path to the ebs directory holding tasks.toml
    #[arg(long, global = true, default_value = ".")]
    path: PathBuf,

    /// Config file to use instead of ~/.config/ebs/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict completion dates of outstanding tasks
    Guess(commands::guess::GuessArgs),
    /// Check whether a date is a work day
    Workday {
        /// Date as YYYY-MM-DDTHH:MM:SS
        date: String,
    },
    /// Find the date a quantity of work is done
    Complete {
        /// Start date as YYYY-MM-DDTHH:MM:SS
        start: String,
        /// Work needed, in seconds
        seconds: i64,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("EBS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = commands::Context {
        dir: cli.path,
        config_path: cli.config,
    };
    let result = match cli.command {
        Commands::Guess(args) => commands::guess::run(args, &ctx),
        Commands::Workday { date } => commands::calendar::workday(&date, &ctx),
        Commands::Complete { start, seconds } => commands::calendar::complete(&start, seconds, &ctx),
        Commands::Config { action } => commands::config::run(action, &ctx),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
