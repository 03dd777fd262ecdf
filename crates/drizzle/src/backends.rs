//! 🔌 Backends — where the real I/O happens.
//!
//! 🕳️ There is exactly one direction of travel here: a finished payload goes in,
//! an object comes out the other side. Sinks don't compose, don't pick keys, and
//! don't retry. They get a key, some bytes, a content type, and one shot.
//!
//! 🧠 Knowledge graph:
//! - Pattern: `Sink` trait → concrete impls (`S3Sink`, `InMemorySink`) → `SinkBackend` enum
//! - `S3Sink`: the production path, one `PutObject` per call
//! - `InMemorySink`: the test double, and the "what would it have written?" dry run
//! - Ancient proverb: "He who puts business logic in the Sink, debugs in production."

use anyhow::Result;
use async_trait::async_trait;

mod in_mem;
mod s3;

pub use in_mem::{InMemorySink, StoredObject};
pub use s3::S3Sink;

/// 🕳️ A sink that stores one fully rendered object per call. Pure I/O, zero logic.
///
/// # Contract 📜
/// - `put` writes `payload` under `key` with `content_type`, or returns the error unchanged
///   in meaning. No local retries. The platform owns retries.
/// - `&self`, not `&mut self`: one sink serves every warm invocation of the process.
#[async_trait]
pub trait Sink: std::fmt::Debug + Send + Sync {
    /// 📡 Store a payload under `key`. Overwrites are the caller's problem; our keys don't collide.
    async fn put(&self, key: &str, payload: Vec<u8>, content_type: &str) -> Result<()>;
}

/// 🎭 The many faces of a Sink: a polymorphic casting call for data destinations.
///
/// The enum dispatches `put` to the inner concrete type, keeping the batch writer
/// blissfully ignorant of whether the bytes land in S3 or in a `Vec` in RAM.
#[derive(Debug, Clone)]
pub enum SinkBackend {
    S3(S3Sink),
    InMemory(InMemorySink),
}

#[async_trait]
impl Sink for SinkBackend {
    async fn put(&self, key: &str, payload: Vec<u8>, content_type: &str) -> Result<()> {
        match self {
            SinkBackend::S3(sink) => sink.put(key, payload, content_type).await,
            SinkBackend::InMemory(sink) => sink.put(key, payload, content_type).await,
        }
    }
}

impl From<S3Sink> for SinkBackend {
    fn from(sink: S3Sink) -> Self {
        SinkBackend::S3(sink)
    }
}

impl From<InMemorySink> for SinkBackend {
    fn from(sink: InMemorySink) -> Self {
        SinkBackend::InMemory(sink)
    }
}
