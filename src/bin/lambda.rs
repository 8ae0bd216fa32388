//! AWS Lambda entry point for notice-bot
//!
//! Designed for a scheduled (EventBridge cron) trigger: every invocation
//! performs one check against the snapshot kept in S3.
//!
//! ## Environment Variables
//!
//! - `NEXON_API_KEY`, `DISCORD_WEBHOOK_URL`: required secrets
//! - `S3_BUCKET`: bucket holding the snapshot (default: `notice-bot`)
//! - `S3_PREFIX`: key prefix (default: `maplestory`)
//! - `CONFIG_S3_PREFIX`: prefix of `config.toml` (default: `{S3_PREFIX}/config`)
//! - `FEED_TIMEOUT_SECS`, `WEBHOOK_TIMEOUT_SECS`: HTTP timeouts
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)
//!
//! Deploy with `cargo lambda build --release --features lambda`.

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notice_bot::config::{Credentials, LambdaConfigLoader};
use notice_bot::error::Result;
use notice_bot::pipeline::{NoticePipeline, RunOutcome};
use notice_bot::storage::SnapshotStore;
use notice_bot::storage::s3::S3Storage;

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> std::result::Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("notice-bot Lambda starting...");
    lambda_runtime::run(service_fn(handler)).await
}

/// Handler for scheduled events. A failed check fails the invocation.
#[instrument(skip(event))]
async fn handler(event: LambdaEvent<Value>) -> std::result::Result<Value, LambdaError> {
    info!("Received event: {:?}", event.payload);

    match run_lambda_pipeline().await {
        Ok(outcome) => {
            info!("Lambda execution successful: {:?}", outcome);
            Ok(summarize(&outcome))
        }
        Err(e) => {
            error!("Lambda execution failed: {}", e);
            Err(e.into())
        }
    }
}

/// Internal pipeline logic for the Lambda environment.
async fn run_lambda_pipeline() -> Result<RunOutcome> {
    let credentials = Credentials::from_env()?;
    let storage = S3Storage::from_env().await;

    let config_prefix = std::env::var("CONFIG_S3_PREFIX").unwrap_or_else(|_| {
        match storage.prefix() {
            "" => "config".to_string(),
            prefix => format!("{}/config", prefix),
        }
    });
    let config = LambdaConfigLoader::new(storage.clone(), &config_prefix)
        .load_config()
        .await?;

    let store: Arc<dyn SnapshotStore> = Arc::new(storage);
    let pipeline = NoticePipeline::from_config(&config, &credentials, store)?;
    pipeline.run().await
}

fn summarize(outcome: &RunOutcome) -> Value {
    match outcome {
        RunOutcome::Seeded { tracked } => {
            serde_json::json!({ "status": "seeded", "tracked": tracked })
        }
        RunOutcome::Unchanged => serde_json::json!({ "status": "unchanged" }),
        RunOutcome::Notified { added, updated } => {
            serde_json::json!({ "status": "notified", "added": added, "updated": updated })
        }
        RunOutcome::Previewed { .. } => serde_json::json!({ "status": "previewed" }),
    }
}
