//! 🌧️ The batch writer — one invocation in, at most one object out.
//!
//! 🎬 *[a queue, somewhere, fills with weather readings]*
//! 🎬 *[the platform scoops up a handful and throws them at us]*
//! 🎬 *[we line them up, stamp the hour on them, and drop them in a bucket]*
//! 🎬 *[that's it. that's the movie.]* 🦆
//!
//! 📜 The whole contract, in order:
//! 1. Zero records → skip with `no_records`. No storage call.
//! 2. Drop records whose body is missing or `""`.
//! 3. Nothing left → skip with `no_message_bodies`. No storage call.
//! 4. Compose the survivors as ndjson, build a `dt=/hr=` key from the wall clock (UTC),
//!    put the object, log one line, return the key and the count.
//!
//! Storage errors go straight back up. The platform decides about retries, not us.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::app_config::AppConfig;
use crate::backends::{Sink, SinkBackend};
use crate::common::{BatchOutcome, QueueEvent, SkipReason};
use crate::composers::{Composer, NdjsonComposer};
use crate::partition::ObjectKeyBuilder;

/// 🌧️ Turns one batch of message bodies into one stored object.
///
/// Holds the sink (and through it, the process-wide storage client), the composer, and
/// the key layout. Nothing in here changes between invocations, so one writer built at
/// cold start serves every warm invocation after it.
#[derive(Debug, Clone)]
pub struct BatchWriter {
    sink: SinkBackend,
    composer: NdjsonComposer,
    keys: ObjectKeyBuilder,
}

impl BatchWriter {
    pub fn new(sink: impl Into<SinkBackend>, keys: ObjectKeyBuilder) -> Self {
        Self {
            sink: sink.into(),
            composer: NdjsonComposer,
            keys,
        }
    }

    /// 🔧 The usual way in: key layout from the config, sink from wherever you built it.
    pub fn from_config(app_config: &AppConfig, sink: impl Into<SinkBackend>) -> Self {
        Self::new(
            sink,
            ObjectKeyBuilder::new(&app_config.raw_prefix, &app_config.object_type),
        )
    }

    /// 📨 Adapt an SQS trigger event. Record order is line order. No `Records` at all is
    /// the same as an empty list: `no_records`.
    pub async fn handle_event(&self, event: &QueueEvent) -> Result<BatchOutcome> {
        self.write_bodies(event.records.iter().map(|record| record.body.as_deref()))
            .await
    }

    /// 🚀 Write a batch, partitioned by right now.
    pub async fn write_bodies<'a, I>(&self, bodies: I) -> Result<BatchOutcome>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        self.write_bodies_at(bodies, Utc::now()).await
    }

    /// 🕰️ Write a batch as if the clock read `now`. The partition and the timestamp in the
    /// file name both come from `now`; nothing inside the bodies is consulted.
    pub async fn write_bodies_at<'a, I>(&self, bodies: I, now: DateTime<Utc>) -> Result<BatchOutcome>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let bodies: Vec<Option<&str>> = bodies.into_iter().collect();
        if bodies.is_empty() {
            debug!(reason = %SkipReason::NoRecords, "💤 empty batch, nothing to write");
            return Ok(BatchOutcome::skipped(SkipReason::NoRecords));
        }

        let the_record_count = bodies.len();
        let lines: Vec<&str> = bodies
            .into_iter()
            .flatten()
            .filter(|body| !body.is_empty())
            .collect();
        if lines.is_empty() {
            debug!(
                reason = %SkipReason::NoMessageBodies,
                records = the_record_count,
                "💤 every record showed up empty-handed, nothing to write"
            );
            return Ok(BatchOutcome::skipped(SkipReason::NoMessageBodies));
        }

        let payload = self.composer.compose(&lines).into_bytes();
        let s3_key = self.keys.build(now);

        self.sink
            .put(&s3_key, payload, self.composer.content_type())
            .await
            .context(format!(
                "💀 Failed to store a batch of {} records. The platform gets the error, \
                 and the messages go back on the queue.",
                lines.len()
            ))?;

        info!(
            s3_key = %s3_key,
            records_written = lines.len(),
            "📦 batch written"
        );
        Ok(BatchOutcome::written(s3_key, lines.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::InMemorySink;
    use chrono::TimeZone;
    use serde_json::json;

    fn the_moment() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 22, 10)
            .single()
            .expect("💀 2024-03-05 exists. The calendar says so.")
    }

    fn writer_with_vault() -> (BatchWriter, InMemorySink) {
        let the_vault = InMemorySink::new();
        let writer = BatchWriter::new(the_vault.clone(), ObjectKeyBuilder::new("raw", "weather"));
        (writer, the_vault)
    }

    #[tokio::test]
    async fn the_one_where_zero_records_means_zero_writes() -> Result<()> {
        let (writer, the_vault) = writer_with_vault();

        let outcome = writer.write_bodies_at(Vec::<Option<&str>>::new(), the_moment()).await?;

        assert_eq!(outcome, BatchOutcome::skipped(SkipReason::NoRecords));
        assert!(the_vault.objects().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_every_body_is_missing_or_empty() -> Result<()> {
        let (writer, the_vault) = writer_with_vault();

        let outcome = writer
            .write_bodies_at([None, Some(""), None], the_moment())
            .await?;

        assert_eq!(outcome, BatchOutcome::skipped(SkipReason::NoMessageBodies));
        assert!(the_vault.objects().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_two_bodies_land_as_one_object() -> Result<()> {
        let (writer, the_vault) = writer_with_vault();

        let outcome = writer
            .write_bodies_at([Some(r#"{"a":1}"#), Some(r#"{"a":2}"#)], the_moment())
            .await?;

        let stored = the_vault.objects().await;
        assert_eq!(stored.len(), 1, "💀 one batch, one object. Not zero. Not two.");
        assert_eq!(stored[0].payload_str(), "{\"a\":1}\n{\"a\":2}\n");
        assert_eq!(stored[0].content_type, "application/x-ndjson");
        assert!(
            stored[0]
                .key
                .starts_with("raw/dt=2024-03-05/hr=14/weather_20240305T142210Z_")
        );
        assert!(stored[0].key.ends_with(".jsonl"));
        assert_eq!(
            outcome,
            BatchOutcome::written(stored[0].key.clone(), 2),
            "💀 the returned key should be the key we actually wrote"
        );
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_blanks_are_skipped_and_order_is_kept() -> Result<()> {
        let (writer, the_vault) = writer_with_vault();

        let outcome = writer
            .write_bodies_at(
                [Some(r#"{"n":1}"#), None, Some(""), Some(r#"{"n":2}"#), Some(r#"{"n":3}"#)],
                the_moment(),
            )
            .await?;

        assert_eq!(outcome.records_written(), 3);
        let stored = the_vault.objects().await;
        assert_eq!(stored[0].payload_str(), "{\"n\":1}\n{\"n\":2}\n{\"n\":3}\n");
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_whitespace_counts_as_a_body() -> Result<()> {
        // 🧪 Only `""` is empty. A single space is somebody's very minimal JSON. Not our call.
        let (writer, the_vault) = writer_with_vault();

        let outcome = writer.write_bodies_at([Some(" ")], the_moment()).await?;

        assert_eq!(outcome.records_written(), 1);
        assert_eq!(the_vault.objects().await[0].payload_str(), " \n");
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_partition_ignores_timestamps_inside_bodies() -> Result<()> {
        let (writer, the_vault) = writer_with_vault();

        writer
            .write_bodies_at([Some(r#"{"ts_utc":"1999-12-31T23:59:59Z"}"#)], the_moment())
            .await?;

        let stored = the_vault.objects().await;
        assert!(stored[0].key.contains("/dt=2024-03-05/hr=14/"));
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_an_sqs_event_is_unpacked_record_by_record() -> Result<()> {
        let (writer, the_vault) = writer_with_vault();
        let event: QueueEvent = serde_json::from_value(json!({
            "Records": [
                {
                    "messageId": "m-1",
                    "body": "{\"city\":\"Oslo\",\"temp_c\":-2.5}",
                    "attributes": {},
                    "messageAttributes": {}
                },
                {
                    "messageId": "m-2",
                    "attributes": {},
                    "messageAttributes": {}
                },
                {
                    "messageId": "m-3",
                    "body": "{\"city\":\"Lima\",\"temp_c\":19.0}",
                    "attributes": {},
                    "messageAttributes": {}
                }
            ]
        }))?;

        let outcome = writer.handle_event(&event).await?;

        assert_eq!(outcome.records_written(), 2);
        let stored = the_vault.objects().await;
        assert_eq!(
            stored[0].payload_str(),
            "{\"city\":\"Oslo\",\"temp_c\":-2.5}\n{\"city\":\"Lima\",\"temp_c\":19.0}\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_an_empty_sqs_event_says_no_records() -> Result<()> {
        let (writer, the_vault) = writer_with_vault();
        let event: QueueEvent = serde_json::from_value(json!({ "Records": [] }))?;

        let outcome = writer.handle_event(&event).await?;

        assert_eq!(
            serde_json::to_value(&outcome)?,
            json!({"written": 0, "reason": "no_records"})
        );
        assert!(the_vault.objects().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_an_event_without_records_still_says_no_records() -> Result<()> {
        let (writer, the_vault) = writer_with_vault();
        let event: QueueEvent = serde_json::from_str("{}")?;

        let outcome = writer.handle_event(&event).await?;

        assert_eq!(
            serde_json::to_value(&outcome)?,
            json!({"written": 0, "reason": "no_records"})
        );
        assert!(the_vault.objects().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_two_invocations_never_share_a_key() -> Result<()> {
        let (writer, the_vault) = writer_with_vault();

        writer.write_bodies_at([Some("{}")], the_moment()).await?;
        writer.write_bodies_at([Some("{}")], the_moment()).await?;

        let stored = the_vault.objects().await;
        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0].key, stored[1].key);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_config_picks_the_prefix() -> Result<()> {
        let the_vault = InMemorySink::new();
        let app_config = AppConfig {
            bucket: "b".to_string(),
            raw_prefix: "landing/".to_string(),
            object_type: "telemetry".to_string(),
            region: None,
            endpoint_url: None,
        };
        let writer = BatchWriter::from_config(&app_config, the_vault.clone());

        writer.write_bodies_at([Some("{}")], the_moment()).await?;

        assert!(
            the_vault.objects().await[0]
                .key
                .starts_with("landing/dt=2024-03-05/hr=14/telemetry_20240305T142210Z_")
        );
        Ok(())
    }
}
