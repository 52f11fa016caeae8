use std::{env, time::Duration};

/// AppConfig
///
/// Holds the console front's entire configuration. Immutable once loaded and
/// carried in `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // GraphQL endpoint of the console API, queried for organization access.
    pub api_url: String,
    // Request timeout for the console API client. The guard itself has none.
    pub api_timeout: Duration,
    // Address the HTTP server binds to.
    pub bind_addr: String,
    // Directory holding the built single-page console (index.html + assets).
    pub static_dir: String,
    // Runtime environment marker. Controls log format and fail-fast checks.
    pub env: Env,
}

/// Env
///
/// Runtime context: local development or a production deployment.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const DEFAULT_API_URL: &str = "http://localhost:8000/graphql";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STATIC_DIR: &str = "dist";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration for test setup, independent of the
    /// process environment.
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables, failing fast on
    /// anything production cannot run without.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `CONSOLE_API_URL` is not set, and in any
    /// environment when `CONSOLE_API_TIMEOUT_SECS` is not a whole number of seconds.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        // API URL Resolution
        // Mandatory in production; local development falls back to a local API.
        let api_url = match env {
            Env::Production => env::var("CONSOLE_API_URL")
                .expect("FATAL: CONSOLE_API_URL must be set in production."),
            Env::Local => {
                env::var("CONSOLE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            }
        };

        let api_timeout = env::var("CONSOLE_API_TIMEOUT_SECS")
            .map(|secs| {
                secs.parse::<u64>()
                    .expect("FATAL: CONSOLE_API_TIMEOUT_SECS must be a whole number of seconds.")
            })
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_API_TIMEOUT_SECS));

        Self {
            api_url,
            api_timeout,
            bind_addr: env::var("CONSOLE_BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            static_dir: env::var("CONSOLE_STATIC_DIR")
                .unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string()),
            env,
        }
    }
}
