//! 🍞 Logging: one JSON object per line, because CloudWatch reads JSON and so do we.
//!
//! The format lives here, not in the binary, so the tests can point the exact same
//! subscriber at a buffer and read back what production would have printed.
//!
//! 🧠 Knowledge graph:
//! - Event fields are flattened to the top level: `{"level":"INFO","s3_key":...,"records_written":2,...}`
//! - No timestamps. The log service stamps every line on arrival.
//! - `RUST_LOG` picks the filter; unset means `info`.

use anyhow::Context;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// 🔧 The subscriber, writing to whatever `writer` makes. Production hands it stdout.
pub fn json_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_target(false)
        .without_time()
        .with_writer(writer)
        .finish()
}

/// 🚀 Install the stdout subscriber for the whole process. Call once, at cold start.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(json_subscriber(filter, std::io::stdout))
        .context("💀 Someone already installed a global subscriber. There can be only one.")
}
