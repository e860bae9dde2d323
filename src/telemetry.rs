// SPDX-License-Identifier: MIT
//! One-call telemetry bootstrap (pipeline, global providers, log bridge, subscriber).
//!
//! This module wires the pieces of the crate together for a typical service:
//!
//! * [`init_telemetry`] – initializes the process-wide pipeline, registers its providers
//!   with `opentelemetry::global`, attaches the log bridge and installs the global
//!   `tracing` subscriber.
//! * [`TelemetryHandle`] – detaches the bridge and shuts the pipeline down explicitly.
//!
//! Feature flags (Cargo features) influence behavior:
//!
//! * `console-log` – add a compact console formatting layer.
//!
//! # Example
//! ```no_run
//! use beacon_telemetry::telemetry::init_telemetry;
//! use beacon_telemetry::TelemetryConfig;
//! fn main() -> Result<(), beacon_telemetry::TelemetryError> {
//!     let handle = init_telemetry(TelemetryConfig::from_env())?;
//!     // ... application logic ...
//!     handle.shutdown(); // flush final batches
//!     Ok(())
//! }
//! ```
//!
//! # Shutdown
//! Call [`TelemetryHandle::shutdown`] before exiting so remaining batches are flushed.
//! Flushing is bounded by [`crate::pipeline::SHUTDOWN_TIMEOUT`].
//!
//! # Threading Model
//! Batch exporters and the metrics reader run on their own worker threads using the
//! blocking HTTP client; no async runtime is required.
use opentelemetry_sdk::logs::SdkLogger;

use crate::bridge::LogBridge;
use crate::config::TelemetryConfig;
use crate::error::TelemetryResult;
use crate::pipeline::{self, Pipeline};
use crate::subscriber;

/// Handle over the bootstrapped telemetry.
///
/// Dropping the handle without calling [`TelemetryHandle::shutdown`] may lose the final
/// batches. Call `shutdown()` at a controlled point, typically just before process exit.
#[derive(Debug)]
pub struct TelemetryHandle {
    pipeline: Pipeline,
    bridge: Option<LogBridge<SdkLogger>>,
}

impl TelemetryHandle {
    /// The registered pipeline, for obtaining tracers, meters and loggers.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The attached log bridge; `None` when logs are not exported.
    pub fn bridge(&self) -> Option<&LogBridge<SdkLogger>> {
        self.bridge.as_ref()
    }

    /// Detach the log bridge, then flush and shut down the pipeline.
    pub fn shutdown(self) {
        if let Some(bridge) = &self.bridge {
            bridge.detach();
        }
        self.pipeline.shutdown();
    }
}

/// Bootstrap telemetry for the application.
///
/// Initializes the process-wide pipeline (a pipeline that is already registered is
/// reused and `cfg` is ignored), registers enabled providers globally, attaches a
/// [`LogBridge`] when logs are exported and installs the composed subscriber.
///
/// # Errors
/// * configuration or exporter failures from [`pipeline::initialize`];
/// * [`crate::TelemetryError::Subscriber`] if a global `tracing` subscriber is already
///   installed. The bridge is detached in that case; the pipeline stays registered.
pub fn init_telemetry(cfg: TelemetryConfig) -> TelemetryResult<TelemetryHandle> {
    let pipeline = pipeline::initialize(cfg)?;
    pipeline.install_global_providers();

    let bridge = pipeline
        .exporting_signals()
        .contains(&crate::Signal::Logs)
        .then(|| LogBridge::attach(&pipeline));

    if let Err(e) = subscriber::install(&pipeline, bridge.as_ref()) {
        if let Some(bridge) = &bridge {
            bridge.detach();
        }
        return Err(e);
    }

    Ok(TelemetryHandle { pipeline, bridge })
}
