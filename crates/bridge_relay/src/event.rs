use std::fmt;
use std::time::SystemTime;

use serde::Serialize;

/// Severity of a transcript entry.
///
/// The relay wire carries a bare string; the level is derived on the host
/// from the textual markers the harness prefixes error reports with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    /// `Error` when `message` starts with one of `error_markers`.
    pub fn classify<S: AsRef<str>>(message: &str, error_markers: &[S]) -> Self {
        if error_markers
            .iter()
            .any(|marker| !marker.as_ref().is_empty() && message.starts_with(marker.as_ref()))
        {
            LogLevel::Error
        } else {
            LogLevel::Info
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// One relayed console line. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    pub sequence: u64,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: SystemTime,
}

impl LogEvent {
    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }
}
