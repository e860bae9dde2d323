// SPDX-License-Identifier: MIT
//! Per-signal endpoint derivation.
use std::fmt;

/// Collector endpoint used when the configured base is blank.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// An independently enable-able telemetry stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Traces,
    Metrics,
    Logs,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Traces, Signal::Metrics, Signal::Logs];

    /// Fixed collector sub-path for this signal.
    pub const fn path_suffix(self) -> &'static str {
        match self {
            Signal::Traces => "/otlp/v1/traces",
            Signal::Metrics => "/otlp/v1/metrics",
            Signal::Logs => "/otlp/v1/logs",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Signal::Traces => "traces",
            Signal::Metrics => "metrics",
            Signal::Logs => "logs",
        }
    }

    /// Resolve this signal's URL below `base`.
    pub fn endpoint(self, base: &str) -> String {
        resolve_endpoint(base, self.path_suffix())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join `suffix` onto `base`, tolerating trailing slashes and bases that already end
/// with the suffix. A blank base resolves against [`DEFAULT_ENDPOINT`].
///
/// ```
/// use beacon_telemetry::endpoint::resolve_endpoint;
/// assert_eq!(
///     resolve_endpoint("http://host:4318/", "/otlp/v1/traces"),
///     "http://host:4318/otlp/v1/traces"
/// );
/// ```
pub fn resolve_endpoint(base: &str, suffix: &str) -> String {
    let base = match base.trim() {
        "" => DEFAULT_ENDPOINT,
        trimmed => trimmed,
    };
    let base = base.trim_end_matches('/');
    if base.ends_with(suffix) {
        return base.to_string();
    }
    format!("{base}{suffix}")
}
