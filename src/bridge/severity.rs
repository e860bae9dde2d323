// SPDX-License-Identifier: MIT
use opentelemetry::logs::Severity;
use tracing::Level;

/// Severity of a bridged record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogSeverity {
    pub const ALL: [LogSeverity; 5] = [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ];

    pub fn from_level(level: &Level) -> Self {
        match *level {
            Level::TRACE => LogSeverity::Trace,
            Level::DEBUG => LogSeverity::Debug,
            Level::INFO => LogSeverity::Info,
            Level::WARN => LogSeverity::Warn,
            Level::ERROR => LogSeverity::Error,
        }
    }

    /// Map a level name (case-insensitive). Absent or unknown names map to `Info`.
    pub fn from_name(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return LogSeverity::Info;
        };
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(LogSeverity::Info)
    }

    /// Severity text carried on the record.
    pub const fn as_str(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO",
            LogSeverity::Warn => "WARN",
            LogSeverity::Error => "ERROR",
        }
    }

    pub const fn to_otel(self) -> Severity {
        match self {
            LogSeverity::Trace => Severity::Trace,
            LogSeverity::Debug => Severity::Debug,
            LogSeverity::Info => Severity::Info,
            LogSeverity::Warn => Severity::Warn,
            LogSeverity::Error => Severity::Error,
        }
    }
}

impl From<&Level> for LogSeverity {
    fn from(level: &Level) -> Self {
        Self::from_level(level)
    }
}
