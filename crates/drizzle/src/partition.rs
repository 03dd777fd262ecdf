//! 🗂️ Partition keys — where in the bucket a batch goes to live forever.
//!
//! Hive-style `dt=YYYY-MM-DD/hr=HH` folders so downstream batch jobs can list one
//! hour at a time instead of the whole bucket. The partition is the wall clock at
//! invocation, in UTC. Whatever timestamps live inside the message bodies are not
//! our problem and never move a message between folders.
//!
//! ```text
//! raw/dt=2024-03-05/hr=14/weather_20240305T142210Z_3f2a...9c.jsonl
//! └┬┘ └─────┬─────┘ └─┬─┘ └──┬──┘ └──────┬──────┘ └──────┬─────┘
//! prefix   date     hour   type    timestamp     uuid v4, simple hex
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";
const HOUR_FORMAT: &str = "%H";
// 🕰️ ISO 8601 basic format, with the Z. Sorts lexically, which is the whole point.
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// 📁 The `dt=.../hr=...` segment for a moment in time.
pub fn partition_of(now: DateTime<Utc>) -> String {
    format!(
        "dt={}/hr={}",
        now.format(DATE_FORMAT),
        now.format(HOUR_FORMAT)
    )
}

/// 🗝️ Builds object keys for one deployment: fixed prefix and type, fresh time and suffix per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKeyBuilder {
    prefix: String,
    object_type: String,
}

impl ObjectKeyBuilder {
    /// Trailing slashes on `prefix` are dropped, so `"raw/"` and `"raw"` build the same keys,
    /// and an empty `prefix` starts the key at `dt=`.
    ///
    /// ⚠️ `RAW_PREFIX=raw/` and `RAW_PREFIX=` used to land under `raw//dt=...` and `/dt=...`.
    /// They now land under `raw/dt=...` and `dt=...`. Anything listing the old layouts
    /// has to move with them.
    pub fn new(prefix: impl Into<String>, object_type: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            object_type: object_type.into(),
        }
    }

    /// 🎲 A key for `now` with a brand new random suffix. Two calls in the same second
    /// still get different keys; 122 random bits see to that.
    pub fn build(&self, now: DateTime<Utc>) -> String {
        self.build_at(now, Uuid::new_v4())
    }

    /// 🔧 Deterministic flavor of [`build`](Self::build), for when the test wants to pick the dice.
    pub fn build_at(&self, now: DateTime<Utc>, id: Uuid) -> String {
        let file_name = format!(
            "{}_{}_{}.jsonl",
            self.object_type,
            now.format(TIMESTAMP_FORMAT),
            id.simple()
        );
        // 🕳️ An empty prefix would give "/dt=..." and S3 would happily store a key
        // starting with a slash. Nobody wants that folder.
        if self.prefix.is_empty() {
            format!("{}/{}", partition_of(now), file_name)
        } else {
            format!("{}/{}/{}", self.prefix, partition_of(now), file_name)
        }
    }
}
