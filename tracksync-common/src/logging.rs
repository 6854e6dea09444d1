//! Logging setup
//!
//! Severity levels come from an explicit [`LoggingConfig`] built once at
//! startup (normally from the TOML config file) and handed to
//! [`init_logging`]. Nothing mutates the installed subscriber afterwards;
//! changing a level means editing the config and restarting the service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration: a default severity plus per-component overrides
///
/// Components are tracing target prefixes, e.g. `tracksync_am` or `sqlx`:
///
/// ```toml
/// [logging]
/// level = "info"
///
/// [logging.components]
/// tracksync_am = "debug"
/// sqlx = "warn"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default severity applied to everything without an override
    pub level: String,
    /// Per-component severity overrides, keyed by target prefix
    pub components: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            components: BTreeMap::new(),
        }
    }
}

/// Parse a severity label into a filter directive token
///
/// Accepts ERROR, WARN/WARNING, INFO, DEBUG and TRACE in any case.
/// Unknown labels fall back to debug.
pub fn parse_level(value: &str) -> &'static str {
    match value.trim().to_ascii_uppercase().as_str() {
        "ERROR" => "error",
        "WARN" | "WARNING" => "warn",
        "INFO" => "info",
        "DEBUG" => "debug",
        "TRACE" => "trace",
        _ => {
            tracing::warn!(level = %value, "Unknown logging level, defaulting to debug");
            "debug"
        }
    }
}

/// Assemble the filter directive string for a configuration
///
/// The default level comes first, followed by one `component=level`
/// directive per override.
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = vec![parse_level(&config.level).to_string()];

    for (component, level) in &config.components {
        directives.push(format!("{}={}", component, parse_level(level)));
    }

    directives.join(",")
}

/// Install the global tracing subscriber
///
/// The `RUST_LOG` environment variable takes precedence over the configured
/// levels when set. Call once from `main` before any other work.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
