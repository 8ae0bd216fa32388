//! notice-bot CLI
//!
//! Local execution entry point. For AWS Lambda, use `notice-bot-lambda`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use notice_bot::{
    config::Credentials,
    error::Result,
    models::Config,
    pipeline::{NoticePipeline, RunOutcome},
    storage::{LocalStorage, SnapshotStore},
};

/// notice-bot - MapleStory notice watcher
#[derive(Parser, Debug)]
#[command(
    name = "notice-bot",
    version,
    about = "Reports new and updated MapleStory notices to a Discord webhook"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the feed once and notify about changes
    Run {
        /// Fetch and format only; send nothing and save nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration and credentials
    Validate,

    /// Show stored snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env_overrides();

    let storage = LocalStorage::new(&config.storage.snapshot_path);

    match cli.command {
        Command::Run { dry_run } => {
            config.validate()?;
            let credentials = Credentials::from_env()?;
            let store: Arc<dyn SnapshotStore> = Arc::new(storage);
            let pipeline = NoticePipeline::from_config(&config, &credentials, store)?;

            if dry_run {
                report_preview(pipeline.preview().await?)?;
            } else {
                match pipeline.run().await? {
                    RunOutcome::Seeded { tracked } => {
                        log::info!("Seeded snapshot with {} notices", tracked)
                    }
                    RunOutcome::Unchanged => log::info!("Nothing to report"),
                    RunOutcome::Notified { added, updated } => {
                        log::info!("Reported {} new and {} updated notices", added, updated)
                    }
                    RunOutcome::Previewed { .. } => {}
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let credentials = Credentials::from_env()?;
            log::info!("✓ Credentials OK ({:?})", credentials);

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Snapshot: {}", storage.location());
            match storage.load().await? {
                Some(snapshot) => {
                    log::info!("Notices tracked: {}", snapshot.len());
                    match snapshot.updated_at {
                        Some(updated) => log::info!("Last updated: {}", updated),
                        None => log::info!("Last updated: unknown"),
                    }
                }
                None => log::info!("No snapshot found yet."),
            }
        }
    }

    Ok(())
}

fn report_preview(outcome: RunOutcome) -> Result<()> {
    match outcome {
        RunOutcome::Previewed {
            message: Some(message),
        } => {
            let json = serde_json::to_string_pretty(&message)
                .map_err(notice_bot::error::AppError::format)?;
            println!("{}", json);
        }
        _ => log::info!("No message would be sent"),
    }
    Ok(())
}
