// SPDX-License-Identifier: MIT
//! Pipeline configuration.
//!
//! [`TelemetryConfig`] is a plain value object. Callers either fill it in directly, use the
//! `with_*` builders, or load it from the environment with [`TelemetryConfig::from_env`].
//! Nothing is checked until [`TelemetryConfig::validate`] runs (the pipeline registry calls it
//! on first initialization).
//!
//! Environment variables (first non-blank wins):
//!
//! | Field             | Variables                                                   | Default                 |
//! |-------------------|-------------------------------------------------------------|-------------------------|
//! | `api_key`         | `BEACON_API_KEY`, `OTEL_API_KEY`                            | empty                   |
//! | `service_name`    | `BEACON_SERVICE_NAME`, `OTEL_SERVICE_NAME`                  | empty                   |
//! | `endpoint`        | `BEACON_ENDPOINT`, `OTEL_EXPORTER_OTLP_ENDPOINT`            | `http://localhost:8080` |
//! | `environment`     | `BEACON_ENVIRONMENT`                                        | `local`                 |
//! | `service_version` | `BEACON_SERVICE_VERSION`                                    | empty                   |
//! | `enable_*`        | `BEACON_ENABLE_TRACES`, `..._METRICS`, `..._LOGS`           | `true`                  |
//! | `export_interval` | `BEACON_EXPORT_INTERVAL_MS`, `OTEL_METRIC_EXPORT_INTERVAL`  | 10 000 ms               |
use std::time::Duration;

use crate::endpoint::DEFAULT_ENDPOINT;
use crate::error::ConfigError;

/// Deployment environment reported when none is configured.
pub const DEFAULT_ENVIRONMENT: &str = "local";

/// Metrics export interval used when none is configured.
pub const DEFAULT_EXPORT_INTERVAL: Duration = Duration::from_millis(10_000);

/// Configuration used when building the telemetry pipeline.
///
/// If at least one signal is enabled, `api_key`, `service_name` and `endpoint` must be
/// non-blank and `export_interval` must be non-zero. With every signal disabled no field
/// is constrained and the pipeline degenerates to a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Collector API key, sent as `Authorization: Bearer <api_key>`.
    pub api_key: String,
    /// Service name reported in resource attributes (`service.name`).
    pub service_name: String,
    /// Base collector endpoint (without per-signal suffix). Example: `http://localhost:8080`.
    pub endpoint: String,
    /// Deployment environment (`deployment.environment`).
    pub environment: String,
    /// Service version (`service.version`), omitted from the resource when blank.
    pub service_version: String,
    pub enable_traces: bool,
    pub enable_metrics: bool,
    pub enable_logs: bool,
    /// Interval between periodic metric exports.
    pub export_interval: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            service_name: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            service_version: String::new(),
            enable_traces: true,
            enable_metrics: true,
            enable_logs: true,
            export_interval: DEFAULT_EXPORT_INTERVAL,
        }
    }
}

impl TelemetryConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let export_interval = first(&["BEACON_EXPORT_INTERVAL_MS"])
            .and_then(|raw| parse_millis(&raw))
            .or_else(|| first(&["OTEL_METRIC_EXPORT_INTERVAL"]).and_then(|raw| parse_millis(&raw)))
            .unwrap_or(defaults.export_interval);

        Self {
            api_key: first(&["BEACON_API_KEY", "OTEL_API_KEY"]).unwrap_or_default(),
            service_name: first(&["BEACON_SERVICE_NAME", "OTEL_SERVICE_NAME"]).unwrap_or_default(),
            endpoint: first(&["BEACON_ENDPOINT", "OTEL_EXPORTER_OTLP_ENDPOINT"])
                .unwrap_or(defaults.endpoint),
            environment: first(&["BEACON_ENVIRONMENT"]).unwrap_or(defaults.environment),
            service_version: first(&["BEACON_SERVICE_VERSION"]).unwrap_or_default(),
            enable_traces: parse_bool(lookup("BEACON_ENABLE_TRACES"), defaults.enable_traces),
            enable_metrics: parse_bool(lookup("BEACON_ENABLE_METRICS"), defaults.enable_metrics),
            enable_logs: parse_bool(lookup("BEACON_ENABLE_LOGS"), defaults.enable_logs),
            export_interval,
        }
    }

    pub fn with_api_key(mut self, api_key: impl AsRef<str>) -> Self {
        self.api_key = api_key.as_ref().trim().to_string();
        self
    }

    pub fn with_service_name(mut self, service_name: impl AsRef<str>) -> Self {
        self.service_name = service_name.as_ref().trim().to_string();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Self {
        self.endpoint = endpoint.as_ref().trim().to_string();
        self
    }

    pub fn with_environment(mut self, environment: impl AsRef<str>) -> Self {
        self.environment = environment.as_ref().trim().to_string();
        self
    }

    pub fn with_service_version(mut self, service_version: impl AsRef<str>) -> Self {
        self.service_version = service_version.as_ref().trim().to_string();
        self
    }

    /// Enable or disable all three signals at once.
    pub fn with_signals(mut self, traces: bool, metrics: bool, logs: bool) -> Self {
        self.enable_traces = traces;
        self.enable_metrics = metrics;
        self.enable_logs = logs;
        self
    }

    pub fn with_export_interval(mut self, export_interval: Duration) -> Self {
        self.export_interval = export_interval;
        self
    }

    /// True when at least one signal would be exported.
    pub fn any_signal_enabled(&self) -> bool {
        self.enable_traces || self.enable_metrics || self.enable_logs
    }

    /// Check the enabled-signal invariants, reporting the first one that fails.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] naming the missing or invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.any_signal_enabled() {
            return Ok(());
        }
        if is_blank(&self.api_key) {
            return Err(ConfigError::MissingApiKey);
        }
        if is_blank(&self.service_name) {
            return Err(ConfigError::MissingServiceName);
        }
        if is_blank(&self.endpoint) {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.export_interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval);
        }
        Ok(())
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn parse_bool(raw: Option<String>, fallback: bool) -> bool {
    let Some(raw) = raw else {
        return fallback;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => fallback,
    }
}

fn parse_millis(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<i64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms.unsigned_abs())),
        _ => None,
    }
}
