mod commands;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ideaforge-cli")]
#[command(about = "IdeaForge command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the fetch, filter, extract, persist pipeline once.
    Generate {
        /// Run every stage except the final save.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print stored ideas, newest first.
    Ideas {
        /// Only ideas created inside the freshness window.
        #[arg(long)]
        fresh: bool,
    },
    /// Print a random sample of raw signals.
    Signals {
        /// Sample size, bounded to 1..=100. Defaults from config.
        #[arg(long)]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ideaforge_core::load_app_config()?;

    match cli.command {
        Some(Commands::Generate { dry_run }) => commands::run_generate(&config, dry_run).await,
        Some(Commands::Ideas { fresh }) => commands::run_ideas(&config, fresh).await,
        Some(Commands::Signals { count }) => commands::run_signals(&config, count).await,
        None => {
            println!("ideaforge-cli: pick one of generate, ideas, signals (see --help)");
            Ok(())
        }
    }
}
