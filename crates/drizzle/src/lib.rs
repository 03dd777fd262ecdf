//! 🌧️ drizzle — queue messages in, hourly-partitioned ndjson objects out.
//!
//! One invocation, one batch, at most one object. Everything else is plumbing.

pub mod app_config;
pub mod backends;
pub mod batcher;
pub mod common;
pub mod composers;
pub mod logging;
pub mod partition;

pub use app_config::{AppConfig, load_config};
pub use backends::{InMemorySink, S3Sink, Sink, SinkBackend, StoredObject};
pub use batcher::BatchWriter;
pub use common::{BatchOutcome, QueueEvent, SkipReason};
