use anyhow::{Context, Result};
use std::env;

/// Process settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fallback filter directive when `RUST_LOG` is not set.
    pub log_level: String,
    /// Rows to generate when the caller does not say.
    pub default_rows: usize,
    /// Headers shown for an empty document and used by a bare `generate`.
    pub default_headers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_rows: 5,
            default_headers: vec!["Name".to_string(), "Email".to_string()],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value source; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(level) = lookup("LOG_LEVEL") {
            cfg.log_level = level;
        }
        if let Some(rows) = lookup("TABLEKIT_DEFAULT_ROWS") {
            cfg.default_rows = rows
                .trim()
                .parse()
                .with_context(|| format!("TABLEKIT_DEFAULT_ROWS must be a count, got {:?}", rows))?;
        }
        if let Some(headers) = lookup("TABLEKIT_DEFAULT_HEADERS") {
            cfg.default_headers = split_headers(&headers);
        }

        Ok(cfg)
    }
}

/// Comma-separated header list; blank entries are skipped.
pub fn split_headers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(String::from)
        .collect()
}
