// SPDX-License-Identifier: MIT
//! Static identity attributes attached to every exported signal.
use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;

use crate::config::{is_blank, TelemetryConfig};

/// `telemetry.sdk.name` reported by this crate.
pub const SDK_NAME: &str = "beacon-telemetry";
/// `telemetry.sdk.language` reported by this crate.
pub const SDK_LANGUAGE: &str = "rust";
/// `telemetry.sdk.version` reported by this crate.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Attributes derived from the configuration alone.
///
/// `service.version` is only included when the configured version is non-blank.
pub fn identity_attributes(cfg: &TelemetryConfig) -> Vec<KeyValue> {
    let mut attrs = vec![
        KeyValue::new("service.name", cfg.service_name.clone()),
        KeyValue::new("deployment.environment", cfg.environment.clone()),
        KeyValue::new("telemetry.sdk.name", SDK_NAME),
        KeyValue::new("telemetry.sdk.language", SDK_LANGUAGE),
        KeyValue::new("telemetry.sdk.version", SDK_VERSION),
    ];
    if !is_blank(&cfg.service_version) {
        attrs.push(KeyValue::new("service.version", cfg.service_version.clone()));
    }
    attrs
}

/// Build the pipeline resource: SDK and environment defaults (`OTEL_RESOURCE_ATTRIBUTES`,
/// `OTEL_SERVICE_NAME`) overlaid with [`identity_attributes`].
pub fn build_resource(cfg: &TelemetryConfig) -> Resource {
    Resource::builder()
        .with_service_name(cfg.service_name.clone())
        .with_attributes(identity_attributes(cfg))
        .build()
}
