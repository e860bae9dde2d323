// SPDX-License-Identifier: MIT
//! Error types surfaced by pipeline initialization.
use opentelemetry_otlp::ExporterBuildError;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::endpoint::Signal;

/// An enabled-signal invariant that the configuration does not satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API key is required; set BEACON_API_KEY or OTEL_API_KEY")]
    MissingApiKey,
    #[error("service name is required; set BEACON_SERVICE_NAME or OTEL_SERVICE_NAME")]
    MissingServiceName,
    #[error("endpoint must not be empty")]
    MissingEndpoint,
    #[error("export interval must be greater than zero")]
    NonPositiveInterval,
}

/// Errors returned while bootstrapping telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid telemetry configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("failed to build {signal} exporter: {source}")]
    Transport {
        signal: Signal,
        #[source]
        source: ExporterBuildError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
