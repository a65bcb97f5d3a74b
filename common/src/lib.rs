use anyhow::Context;
use env_logger::{Builder, Env};
use std::env;

/// Sets up the environment for the application.
///
/// Loads environment variables from a `.env` file if present and initializes
/// the logger with a default filter level of "info".
pub fn setup_env() {
    dotenvy::dotenv().ok();
    Builder::from_env(Env::default().default_filter_or("info")).init();
}

pub fn required_var(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("missing environment variable {key}"))
}

/// Returns `None` for unset or empty variables.
pub fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
