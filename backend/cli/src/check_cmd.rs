//! `switchboard check`: validate a config file without connecting.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Result};

use switchboard_config::{
    collect_referenced_vars, load_raw, prepare, redacted_snapshot, validate, validate_for_run,
};

use crate::terminal_output::{note_error, note_info, note_success, note_warn};

pub async fn run(path: &Path, strict: bool) -> Result<()> {
    note_info(&format!("Checking {}", path.display()));
    if !path.exists() {
        note_warn("Config file not found; defaults apply");
    }

    let raw = load_raw(path).await?;
    let env: HashMap<String, String> = std::env::vars().collect();
    for var in collect_referenced_vars(&raw) {
        match env.get(&var) {
            Some(v) if !v.is_empty() => note_success(&format!("{var} is set")),
            _ => note_error(&format!("{var} is referenced but not set")),
        }
    }

    let config = match prepare(raw, &env) {
        Ok(config) => config,
        Err(e) => {
            note_error(&format!("{e:#}"));
            bail!("Config at {} could not be loaded", path.display());
        }
    };

    let report = if strict { validate_for_run(&config) } else { validate(&config) };
    for warning in &report.warnings {
        note_warn(&warning.to_string());
    }
    for err in &report.errors {
        note_error(&err.to_string());
    }

    println!("{}", serde_json::to_string_pretty(&redacted_snapshot(&config)?)?);

    if !report.is_valid() {
        bail!("{} config error(s)", report.errors.len());
    }
    note_success("Config is valid");
    Ok(())
}
