//! `switchboard-config` — runtime configuration for the Switchboard bot.
//!
//! Provides:
//! - Typed config schema (prefix, intents, Discord credentials, rule overrides)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Default value application and validation
//! - Config redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, DEFAULT_INTENTS, DEFAULT_MESSAGE_CACHE, KNOWN_INTENTS};
pub use env::{collect_referenced_vars, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_raw};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{
    CommandRulesConfig, DiscordConfig, InteractionsConfig, LoggingConfig, SwitchboardConfig,
};
pub use validation::{validate, validate_for_run, ConfigValidationError, ValidationReport};

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Load, substitute env vars, and apply defaults to a config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// is left to the caller, which knows whether a token is required.
pub async fn load_and_prepare(path: &Path) -> Result<SwitchboardConfig> {
    let raw = load_raw(path).await?;
    prepare(raw, &std::env::vars().collect())
}

/// The pure half of [`load_and_prepare`].
pub fn prepare(raw: Value, env: &HashMap<String, String>) -> Result<SwitchboardConfig> {
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;

    let config: SwitchboardConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    Ok(apply_all_defaults(config))
}

/// A redacted JSON snapshot of `config`, safe to print.
pub fn redacted_snapshot(config: &SwitchboardConfig) -> Result<Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    Ok(redact(&value))
}
