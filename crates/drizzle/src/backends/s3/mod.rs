//! 🪣 S3 Backend — the ground-to-cloud data paratrooper.
//!
//! This module wraps the AWS S3 SDK and exposes a [`Sink`](super::Sink) that drops
//! each composed batch into the bucket as exactly one object, via exactly one
//! `PutObject`. No multipart. No retries of our own. The SDK's retry policy and the
//! platform's redelivery are the only second chances a batch gets.
//!
//! 🧠 Knowledge graph:
//! - Client built once per process from `aws-config`, then cloned cheaply (it's an `Arc` inside)
//! - Region: config override → default provider chain → `us-east-1`
//! - Endpoint override flips on path-style addressing, because LocalStack and MinIO
//!   don't do virtual-hosted buckets on `localhost`
//!
//! 🦆 The duck has no clearance for AWS. It watches from the edge of the VPC.

mod s3_sink;

pub use s3_sink::S3Sink;
