use std::env;
use std::path::PathBuf;

use chrono::FixedOffset;

use crate::error::{NewswatchError, Result};
use crate::time::{default_reference_zone, parse_utc_offset};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Trigger rule file consumed by the compiler.
    pub triggers_path: PathBuf,
    /// Zone that rule-file time literals are interpreted in.
    pub reference_zone: FixedOffset,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `NEWSWATCH_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self> {
        let profile = env_or("NEWSWATCH_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Result<Self> {
        let p = profile.to_uppercase();
        let p = p.as_str();

        let reference_zone = match profiled_env_opt(p, "REFERENCE_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw).ok_or_else(|| {
                NewswatchError::Config(format!(
                    "REFERENCE_UTC_OFFSET must look like -05:00, got '{}'",
                    raw
                ))
            })?,
            None => default_reference_zone(),
        };

        Ok(Self {
            profile: p.to_string(),
            triggers_path: PathBuf::from(profiled_env_or(p, "TRIGGERS_PATH", "triggers.txt")),
            reference_zone,
            log_filter: profiled_env_or(p, "LOG_FILTER", "info"),
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  triggers:    path={}", self.triggers_path.display());
        tracing::info!("  reference:   utc_offset={}", self.reference_zone);
    }
}
