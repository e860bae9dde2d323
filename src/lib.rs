// SPDX-License-Identifier: MIT
//! Crate bootstrapping a process-wide OpenTelemetry pipeline and bridging `tracing`
//! events into it.
//!
//! The crate combines a multi-signal OTLP export pipeline with a log bridge:
//! * Traces, metrics and logs are each enabled independently by [`TelemetryConfig`]; with
//!   every signal disabled the pipeline is an inert no-op.
//! * Each signal is exported over OTLP/HTTP to its own sub-path of one base endpoint,
//!   authenticated with `Authorization: Bearer <api key>`.
//! * [`pipeline::PipelineRegistry`] holds the single registered pipeline: the first
//!   initialization wins, shutdown is idempotent and bounded.
//! * [`bridge::LogBridge`] turns `tracing` events into log records correlated with the
//!   active trace, without ever feeding the telemetry stack's own diagnostics back in.
//!
//! The primary entry points are [`telemetry::init_telemetry`] for the full bootstrap, or
//! [`pipeline::initialize`] plus [`bridge::LogBridge::attach`] for hosts that compose
//! their own subscriber.
//!
//! # Feature Flags
//! * `console-log` – add a compact console formatter (file/line/thread id).
//!
//! # Quick Start
//! ```no_run
//! use beacon_telemetry::telemetry::init_telemetry;
//! use beacon_telemetry::TelemetryConfig;
//! fn main() -> anyhow::Result<()> {
//!     let handle = init_telemetry(TelemetryConfig::from_env())?;
//!     // business logic
//!     handle.shutdown();
//!     Ok(())
//! }
//! ```
pub mod bridge;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod pipeline;
pub mod resource;
pub mod subscriber;
pub mod telemetry;

pub use config::TelemetryConfig;
pub use endpoint::{resolve_endpoint, Signal};
pub use error::{ConfigError, TelemetryError, TelemetryResult};
pub use pipeline::{initialize, is_initialized, shutdown_global, Pipeline, PipelineRegistry};
