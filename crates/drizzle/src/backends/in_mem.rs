use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::trace;

use crate::backends::Sink;

/// 📄 One object as the in-memory sink saw it. Key, bytes, and what the bytes claim to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub payload: Vec<u8>,
    pub content_type: String,
}

impl StoredObject {
    /// 🔤 The payload as text. Lossy, because tests want to read it, not audit it.
    pub fn payload_str(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// 📦 A sink that never forgets. Unlike S3 lifecycle rules, which forget on schedule.
///
/// `InMemorySink` keeps every `put` in a shared Vec wrapped in a Mutex wrapped in an Arc.
/// It's types all the way down.
///
/// Clone-able because tests need to peek inside after handing a clone off to the
/// batch writer. The `Arc` means everyone shares the same Vec.
#[derive(Debug, Default, Clone)]
pub struct InMemorySink {
    received: Arc<Mutex<Vec<StoredObject>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 🔍 A snapshot of everything stored so far, in put order.
    pub async fn objects(&self) -> Vec<StoredObject> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl Sink for InMemorySink {
    /// 📡 Lock, push, done. Like a fax machine but for bytes. 🦆
    async fn put(&self, key: &str, payload: Vec<u8>, content_type: &str) -> Result<()> {
        trace!(
            "📬 {} bytes for '{}' walked into the in-memory sink and never left",
            payload.len(),
            key
        );
        // 🔒 The Mutex is load-bearing. Do not remove. I know it looks optional. It isn't.
        self.received.lock().await.push(StoredObject {
            key: key.to_string(),
            payload,
            content_type: content_type.to_string(),
        });
        Ok(())
    }
}
