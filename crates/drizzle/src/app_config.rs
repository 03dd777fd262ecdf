//! 🔧 App Configuration — the sacred env-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the Lambda console. Nothing." -- every developer at 3am 🦆
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.
//!
//! 🧠 Knowledge graph:
//! - `BUCKET` (required) and `RAW_PREFIX` (default `"raw"`) are the contract with the
//!   deployment. Their names are load-bearing. Do not rename them.
//! - `OBJECT_TYPE` (default `"weather"`) names the file stem of every object we write.
//! - Env values are taken verbatim. `BUCKET=123456` is a bucket named "123456", not a number,
//!   so the env layer goes in as a map of strings rather than through figment's typed `Env`.
//! - `RAW_PREFIX` loses any trailing `/`, and an empty one drops the segment entirely:
//!   `RAW_PREFIX=raw/` writes `raw/dt=...`, `RAW_PREFIX=` writes `dt=...`. Older writers
//!   produced `raw//dt=...` and `/dt=...` for those; readers globbing on those layouts won't
//!   see new objects.
//! - `region` / `endpoint_url` only come from the optional TOML file. The AWS SDK already
//!   reads `AWS_REGION` and `AWS_ENDPOINT_URL` on its own, we don't need to compete.

use anyhow::{Context, bail};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// 🌍 The env vars we accept. Everything else in the Lambda environment is none of our business.
const ENV_KEYS: [&str; 3] = ["BUCKET", "RAW_PREFIX", "OBJECT_TYPE"];

/// 📦 The AppConfig: one struct to rule them all, one bucket to write them,
/// one prefix to partition them all, and in the dt=/hr= folders bind them.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// 🪣 Where every batch lands. No default. No bucket, no function.
    pub bucket: String,
    /// 📁 Top-level key prefix for raw objects. Trailing `/` is trimmed and an empty prefix
    /// means keys start at `dt=`. No more `raw//dt=` or `/dt=` keys.
    #[serde(default = "default_raw_prefix")]
    pub raw_prefix: String,
    /// 🏷️ File stem of every object, the `weather` in `weather_20240305T142210Z_<hex>.jsonl`
    #[serde(default = "default_object_type")]
    pub object_type: String,
    /// 🌎 Region override. None means "ask the default provider chain, then us-east-1".
    #[serde(default)]
    pub region: Option<String>,
    /// 🔌 Custom S3 endpoint, for LocalStack, MinIO, and other forms of self-deception
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn default_raw_prefix() -> String {
    "raw".to_string()
}

/// 🌍 The env layer: every known key that's set, as the exact string the environment holds.
/// Set-but-empty passes through as `""` so the blank-bucket check can complain about it.
fn env_layer() -> BTreeMap<String, String> {
    ENV_KEYS
        .iter()
        .filter_map(|key| {
            std::env::var(key)
                .ok()
                .map(|value| (key.to_ascii_lowercase(), value))
        })
        .collect()
}

// 🌦️ Every object this thing has ever written started with "weather_". Tradition is tradition.
fn default_object_type() -> String {
    "weather".to_string()
}

/// 🚀 Load the config: from env vars, optionally on top of a TOML file.
///
/// 📐 Layering:
///   - `config_file_name` is None  → env vars only.
///   - `config_file_name` is Some  → TOML file first, env vars merged over it. Env wins,
///     because the Lambda environment is what operators actually look at.
///
/// 💀 Returns an error when the file was named but doesn't exist, when the config doesn't
/// parse, or when `bucket` is missing or blank. The binary calls this before the runtime
/// loop starts, so any of these kill the cold start instead of the first invocation.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = match config_file_name {
        Some(file_name) => {
            // 🔒 Figment shrugs at missing files. We don't. If you named it, it better exist.
            let exists = file_name.try_exists().context(format!(
                "💀 Couldn't check whether config file '{}' exists. The filesystem is being coy.",
                file_name.display()
            ))?;
            if !exists {
                bail!(
                    "💀 Config file '{}' does not exist. It exists in our hearts, but not on disk. \
                     Check DRIZZLE_CONFIG, or unset it to run on env vars alone.",
                    file_name.display()
                );
            }
            Figment::new().merge(Toml::file(file_name))
        }
        None => Figment::new(),
    };

    // 🏗️ Env on top. Only the keys we know about. No velvet rope for PATH and friends.
    let config = config.merge(Serialized::defaults(env_layer()));

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables ({}). \
             Is BUCKET set?",
            path.display(),
            ENV_KEYS.join(", ")
        ),
        None => format!(
            "💀 Failed to parse configuration from environment variables ({}). \
             No file was provided, this one's all on the environment. Is BUCKET set?",
            ENV_KEYS.join(", ")
        ),
    };

    let app_config: AppConfig = config.extract().context(context_msg)?;

    // 🕳️ BUCKET="" parses just fine and then fails on every single PutObject. Catch it here.
    if app_config.bucket.trim().is_empty() {
        bail!("💀 BUCKET is set but blank. A bucket with no name is just a hole.");
    }

    Ok(app_config)
}
