//! Environment-driven runtime configuration.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently.
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: FromStr + Display>(var: &str, default: T) -> T {
    match env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// First non-empty value among `vars`.
#[must_use]
pub fn env_first(vars: &[&str]) -> Option<String> {
    vars.iter().find_map(|v| env::var(v).ok().filter(|s| !s.trim().is_empty()))
}

/// Which storage backend the binary should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Postgres,
    Memory,
}

impl FromStr for BackendKind {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(crate::CoreError::InvalidInput(format!("unknown backend: {other}"))),
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        })
    }
}

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 38080;
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 86_400;

/// Runtime settings for the server and the reconcile job.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub backend: BackendKind,
    pub host: String,
    pub port: u16,
    /// `0` disables the in-process reconcile scheduler.
    pub reconcile_interval_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: env_first(&["STREAKCERT_DATABASE_URL", "DATABASE_URL"]),
            backend: env_parse_with_default("STREAKCERT_BACKEND", BackendKind::Postgres),
            host: env_first(&["STREAKCERT_HOST"]).unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: env_parse_with_default("STREAKCERT_PORT", DEFAULT_PORT),
            reconcile_interval_secs: env_parse_with_default(
                "STREAKCERT_RECONCILE_INTERVAL_SECS",
                DEFAULT_RECONCILE_INTERVAL_SECS,
            ),
        }
    }
}
