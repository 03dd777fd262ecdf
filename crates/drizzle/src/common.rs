//! 📦 Common data structures — what an invocation hands back to whoever invoked it.
//!
//! 🎬 INT. LAMBDA SANDBOX: A WARM START.
//! A batch arrives. Maybe it has records. Maybe it's `{"Records": []}` and someone,
//! somewhere, configured a trigger with a sense of humor. Either way, we owe the
//! platform an answer, and this module is the shape of that answer.
//!
//! 🧠 Knowledge graph:
//! - `BatchOutcome::Written` → `{"s3_key": ..., "records_written": N}`
//! - `BatchOutcome::Skipped` → `{"written": 0, "reason": "no_records" | "no_message_bodies"}`
//! - `QueueEvent` is what comes in: an SQS batch where a missing `Records` key is an
//!   empty batch rather than a deserialization failure.
//! - Downstream consumers already parse these exact strings. The reason codes are
//!   a closed enum on our side and verbatim strings on the wire. Both, forever. 🦆

use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use serde::{Deserialize, Serialize};

/// 📨 One trigger event. Same shape as [`SqsEvent`], but `{}` is a batch of nothing
/// instead of "missing field `Records`" before we ever get a say.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<SqsMessage>,
}

impl From<SqsEvent> for QueueEvent {
    fn from(event: SqsEvent) -> Self {
        Self {
            records: event.records,
        }
    }
}

/// 🤷 Why an invocation wrote nothing. Two ways to do nothing, and we name both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// 📭 The batch had zero records.
    NoRecords,
    /// 📄 Records arrived, but every body was missing or empty.
    NoMessageBodies,
}

impl SkipReason {
    /// 🏷️ The wire string, same as the serde name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRecords => "no_records",
            Self::NoMessageBodies => "no_message_bodies",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 🎯 The return value of one invocation.
///
/// Untagged, so the JSON is exactly the two shapes consumers expect, with no
/// `{"Written": {...}}` wrapper sneaking in. Variant order matters for deserialization:
/// `Written` is tried first, and `Skipped` needs both of its own fields to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchOutcome {
    /// ✅ One object landed in the bucket.
    Written {
        s3_key: String,
        records_written: usize,
    },
    /// 💤 Nothing to write. `written` is always 0, it's on the wire for the consumers.
    Skipped { written: usize, reason: SkipReason },
}

impl BatchOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { written: 0, reason }
    }

    pub fn written(s3_key: String, records_written: usize) -> Self {
        Self::Written {
            s3_key,
            records_written,
        }
    }

    /// 📊 How many bodies ended up in storage. Zero for skips, obviously.
    pub fn records_written(&self) -> usize {
        match self {
            Self::Written {
                records_written, ..
            } => *records_written,
            Self::Skipped { .. } => 0,
        }
    }
}
