//! 🚀 drizzle-lambda — the front door, the bouncer, the maitre d' of drizzle.
//!
//! 📦 This binary crate is the thin wrapper that sets up logging, loads config,
//! builds the one S3 client this process will ever have, and then hands every
//! SQS batch to the library. Like a manager. 🦆

use std::path::PathBuf;

use anyhow::Context;
use drizzle::{BatchOutcome, BatchWriter, QueueEvent, S3Sink};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use tracing::error;

/// 📁 Optional TOML file layered under the env vars. Unset means env only.
const CONFIG_PATH_VAR: &str = "DRIZZLE_CONFIG";

/// 📨 One invocation. Whatever the writer says goes back to the platform, errors included.
/// An event with no `Records` key still reaches the writer and comes back as `no_records`.
async fn function_handler(
    writer: &BatchWriter,
    event: LambdaEvent<QueueEvent>,
) -> Result<BatchOutcome, Error> {
    Ok(writer.handle_event(&event.payload).await?)
}

/// 🚀 main(): the cold start.
///
/// 🔧 Steps:
/// 1. Init tracing, JSON lines, no timestamps (CloudWatch stamps them for us)
/// 2. Load config. No BUCKET? We die here, before the first batch ever shows up.
/// 3. Build the S3 client once. Every warm invocation borrows it.
/// 4. Run the loop until the platform freezes or recycles us.
#[tokio::main]
async fn main() -> Result<(), Error> {
    drizzle::logging::init()?;

    let config_file = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
    let app_config = match drizzle::load_config(config_file.as_deref())
        .context("💀 In drizzle-lambda, main, we couldn't load the config. Check BUCKET first.")
    {
        Ok(app_config) => app_config,
        Err(err) => {
            // 🧅 the whole onion, one line, so it shows up as a single CloudWatch event
            error!(error = %format!("{err:#}"), "💀 cold start failed");
            return Err(err.into());
        }
    };

    let sink = S3Sink::new(&app_config).await;
    let writer = BatchWriter::from_config(&app_config, sink);

    run(service_fn(|event| function_handler(&writer, event))).await
}
