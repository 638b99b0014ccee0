//! Transport and logging configuration.

use serde::{Deserialize, Serialize};

/// HTTP timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// 1-60
    pub connect_timeout_secs: u32,
    /// 1-600
    pub request_timeout_secs: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[derive(Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `tracing_subscriber::EnvFilter` directive for the workspace crates.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "orama=debug",
            LogLevel::Info => "orama=info",
            LogLevel::Warning => "orama=warn",
            LogLevel::Error => "orama=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
