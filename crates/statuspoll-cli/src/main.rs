use clap::{Parser, Subcommand};
use statuspoll_cli::cmd;
use statuspoll_cli::cmd::config::ConfigSubcommand;
use statuspoll_core::ApplicationStatus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "statuspoll",
    about = "Quorum-based application status polling — ask every backend, decide once",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the service endpoints file
    #[arg(long, global = true, env = "STATUSPOLL_CONFIG", default_value = "endpoints.yaml")]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll every configured service about an application and print the verdict
    Check {
        /// Application identifier to poll
        identifier: String,

        /// Override the cumulative query-time budget in seconds
        #[arg(long)]
        budget_secs: Option<u64>,

        /// Override the retry backoff in seconds
        #[arg(long)]
        backoff_secs: Option<u64>,
    },

    /// Inspect the endpoints file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Check {
            identifier,
            budget_secs,
            backoff_secs,
        } => cmd::check::run(&cli.config, &identifier, budget_secs, backoff_secs, cli.json)
            .map(Some),
        Commands::Config { subcommand } => {
            cmd::config::run(&cli.config, subcommand, cli.json).map(|()| None)
        }
    };

    match result {
        Ok(Some(ApplicationStatus::Failure)) => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
