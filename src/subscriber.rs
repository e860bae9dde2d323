// SPDX-License-Identifier: MIT
//! Global `tracing` subscriber composition.
//!
//! The subscriber is a [`Registry`] filtered by [`EnvFilter`] (`RUST_LOG`, default `info`)
//! with up to three layers:
//!
//! * a compact console formatter (Cargo feature `console-log`);
//! * the [`LogBridge`] layer, forwarding events as OpenTelemetry log records;
//! * the `tracing-opentelemetry` layer, exporting spans through the pipeline's tracer
//!   (only when traces are exported).
use opentelemetry::logs::Logger;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::bridge::LogBridge;
use crate::endpoint::Signal;
use crate::error::TelemetryResult;
use crate::pipeline::Pipeline;

/// Instrumentation scope of the tracer behind the `tracing-opentelemetry` layer.
pub const TRACING_SCOPE: &str = "beacon-telemetry-tracing";

/// A layer over the filtered registry.
pub type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync + 'static>;

/// Level filter from `RUST_LOG`, falling back to `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Layers for `pipeline`, in formatter, bridge, span-export order.
pub fn layers<L>(pipeline: &Pipeline, bridge: Option<&LogBridge<L>>) -> Vec<BoxedLayer>
where
    L: Logger + Send + Sync + 'static,
{
    let mut layers: Vec<BoxedLayer> = Vec::new();

    // Console formatting: plain compact single-line output.
    #[cfg(feature = "console-log")]
    layers.push(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .compact()
            .boxed(),
    );

    if let Some(bridge) = bridge {
        layers.push(bridge.layer().boxed());
    }
    if pipeline.exporting_signals().contains(&Signal::Traces) {
        layers.push(OpenTelemetryLayer::new(pipeline.tracer(TRACING_SCOPE)).boxed());
    }
    layers
}

/// Install the composed subscriber as the global default.
///
/// # Errors
/// Returns [`crate::TelemetryError::Subscriber`] if a global subscriber is already set.
pub fn install<L>(pipeline: &Pipeline, bridge: Option<&LogBridge<L>>) -> TelemetryResult<()>
where
    L: Logger + Send + Sync + 'static,
{
    Registry::default()
        .with(env_filter())
        .with(layers(pipeline, bridge))
        .try_init()?;
    Ok(())
}
