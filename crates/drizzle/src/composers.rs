//! 🎼 The Composers module — turning a pile of message bodies into one object body.
//!
//! The bodies are already JSON (somebody upstream made sure of that, or didn't, and
//! either way it's not our problem). The composer doesn't parse them. It doesn't
//! validate them. It just lines them up, one per line, and hands back the payload
//! along with the content type the sink should stamp on it.
//!
//! 🧠 Knowledge graph:
//! - **NDJSON** (`NdjsonComposer`): every body followed by `\n`, trailing one included.
//!   `{"a":1}\n{"a":2}\n`. Content type `application/x-ndjson`.
//! - The batch writer owns one composer and never asks it for anything else.
//!
//! What's the DEAL with NDJSON? It's JSON but unfriendly. Every line is lonely.
//! No brackets to hold them. No commas to connect them. Just newlines. 🦆

/// 🎼 Assembles message bodies into a wire-format payload.
pub trait Composer: std::fmt::Debug {
    /// Join `bodies` into one payload. The order of `bodies` is the order of the lines.
    fn compose(&self, bodies: &[&str]) -> String;

    /// 🏷️ What the payload is, for the `Content-Type` of the stored object.
    fn content_type(&self) -> &'static str;
}

/// 📡 Newline-Delimited JSON: the format Athena, Spark, and `jq -c` all agree on.
#[derive(Debug, Clone, Copy, Default)]
pub struct NdjsonComposer;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

impl Composer for NdjsonComposer {
    #[inline]
    fn compose(&self, bodies: &[&str]) -> String {
        // 🧮 exact capacity: every body plus its newline
        let capacity: usize = bodies.iter().map(|b| b.len() + 1).sum();
        let mut payload = String::with_capacity(capacity);

        for body in bodies {
            payload.push_str(body);
            payload.push('\n');
        }

        // ✅ Trailing \n included. `cat` appreciates it, line readers expect it, nobody complains.
        payload
    }

    fn content_type(&self) -> &'static str {
        NDJSON_CONTENT_TYPE
    }
}
