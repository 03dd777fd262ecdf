//! 🪣📡 S3 Sink — one batch, one object, one PutObject.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, trace};

use crate::app_config::AppConfig;
use crate::backends::Sink;

/// 🌎 Where we land when nobody told us where to land. The Florida of AWS regions.
const DEFAULT_REGION: &str = "us-east-1";

/// 🪣 Writes payloads into one bucket. Holds the process-wide S3 client.
///
/// Built once at cold start and shared by reference with every invocation after.
/// It carries no per-invocation state, so warm invocations reuse the connection pool
/// and nothing else.
#[derive(Debug, Clone)]
pub struct S3Sink {
    client: S3Client,
    bucket: String,
}

impl S3Sink {
    /// 🚀 Build the client from the environment (credentials, region, the works),
    /// with the config's region and endpoint overrides layered on top.
    ///
    /// Doesn't touch the network. Credentials are resolved lazily on the first `put`,
    /// so a missing IAM role shows up as a failed invocation, not a failed cold start.
    pub async fn new(app_config: &AppConfig) -> Self {
        let endpoint_url = app_config.endpoint_url.as_deref();
        let sdk_config = aws_sdk_config(app_config.region.clone(), endpoint_url).await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(endpoint_url.is_some())
            .build();

        debug!(
            bucket = %app_config.bucket,
            region = ?sdk_config.region(),
            endpoint_url = ?endpoint_url,
            "🪣 S3 client ready"
        );

        Self::from_client(S3Client::from_conf(s3_config), app_config.bucket.clone())
    }

    /// 🔧 Bring your own client. Tests point one at a fake endpoint; everyone else wants [`new`](Self::new).
    pub fn from_client(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl Sink for S3Sink {
    /// 📡 PutObject. That's the whole job.
    ///
    /// 💀 Any failure (no credentials, AccessDenied, NoSuchBucket, the network having a
    /// moment) comes back as an error with the full `s3://bucket/key` attached. Nothing
    /// here swallows it.
    async fn put(&self, key: &str, payload: Vec<u8>, content_type: &str) -> Result<()> {
        let the_size = payload.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(payload))
            .send()
            .await
            .with_context(|| {
                format!(
                    "💀 PutObject failed for s3://{}/{}. The bucket ghosted us. \
                     Check: bucket name, region, IAM permissions, KMS key access.",
                    self.bucket, key
                )
            })?;

        trace!(
            "🪣 {} bytes parachuted into s3://{}/{}",
            the_size, self.bucket, key
        );
        Ok(())
    }
}

/// 🔧 Build the shared AWS SDK config: region chain plus an optional endpoint override.
async fn aws_sdk_config(region: Option<String>, endpoint_url: Option<&str>) -> SdkConfig {
    let region_provider = RegionProviderChain::first_try(region.map(Region::new))
        .or_default_provider()
        .or_else(DEFAULT_REGION);

    let loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
    let loader = match endpoint_url {
        Some(url) => loader.endpoint_url(url),
        None => loader,
    };

    loader.load().await
}
