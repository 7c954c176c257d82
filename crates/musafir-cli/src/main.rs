use clap::{Parser, Subcommand};
use musafir_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "musafir", version, about = "Musafir -- the spiritual traveller's tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current level, points and mirror gauge
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the daily efforts
    Tasks {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the stages of the path and which are unlocked
    Stages {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a completed effort with its reflection
    Record {
        /// Task id (see `musafir tasks`)
        task: String,
        /// What you felt, what changed in you
        reflection: String,
    },
    /// Show the journal, most recent first
    Journal {
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Effort statistics by category
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_logging(&config);

    let result = match cli.command {
        Commands::Status { json } => commands::progress::status(&config, json),
        Commands::Tasks { json } => commands::catalog::tasks(json),
        Commands::Stages { json } => commands::catalog::stages(&config, json),
        Commands::Record { task, reflection } => {
            commands::progress::record(&config, &task, &reflection)
        }
        Commands::Journal { json, limit } => commands::progress::journal(&config, json, limit),
        Commands::Stats => commands::progress::stats(&config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
