//! Environment variable substitution for config values.
//!
//! Supports `${VAR_NAME}` in string values, resolved at load time. Only
//! uppercase `[A-Z_][A-Z0-9_]*` names are matched. `$${VAR}` escapes to a
//! literal `${VAR}`.

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

/// An optional escaping `$` followed by a `${NAME}` reference.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$)?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config value tree from the process
/// environment. A referenced variable that is unset or empty is an error.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute env vars using a provided map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    Ok(substitute_value(value, env, "")?)
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if caps.get(1).is_some() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    match missing {
        Some(err) => Err(err),
        None => Ok(substituted.into_owned()),
    }
}

/// Collect all env var names referenced in a config value tree. Escaped
/// references are not included.
pub fn collect_referenced_vars(value: &Value) -> BTreeSet<String> {
    let mut vars = BTreeSet::new();
    collect_recursive(value, &mut vars);
    vars
}

fn collect_recursive(value: &Value, vars: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_VAR_PATTERN.captures_iter(s) {
                if caps.get(1).is_none() {
                    vars.insert(caps[2].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_recursive(v, vars)),
        Value::Object(map) => map.values().for_each(|v| collect_recursive(v, vars)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_nested_strings() {
        let value = json!({ "discord": { "token": "${DISCORD_TOKEN}" }, "intents": ["${EXTRA}"] });
        let out = resolve_env_vars_with(&value, &env(&[("DISCORD_TOKEN", "t0k"), ("EXTRA", "GUILDS")]))
            .unwrap();
        assert_eq!(out["discord"]["token"], "t0k");
        assert_eq!(out["intents"][0], "GUILDS");
    }

    #[test]
    fn missing_var_names_the_config_path() {
        let value = json!({ "discord": { "token": "${DISCORD_TOKEN}" } });
        let err = resolve_env_vars_with(&value, &env(&[])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DISCORD_TOKEN"), "{msg}");
        assert!(msg.contains("discord.token"), "{msg}");
    }

    #[test]
    fn empty_var_counts_as_missing() {
        let value = json!("${DISCORD_TOKEN}");
        assert!(resolve_env_vars_with(&value, &env(&[("DISCORD_TOKEN", "")])).is_err());
    }

    #[test]
    fn escaped_reference_stays_literal() {
        let value = json!("pay $${AMOUNT} now, ${WHO}");
        let out = resolve_env_vars_with(&value, &env(&[("WHO", "alice")])).unwrap();
        assert_eq!(out, json!("pay ${AMOUNT} now, alice"));
    }

    #[test]
    fn lowercase_names_are_not_references() {
        let value = json!("${not_a_var}");
        let out = resolve_env_vars_with(&value, &env(&[])).unwrap();
        assert_eq!(out, value);
    }

    #[test]
    fn collects_unescaped_references() {
        let value = json!({ "a": "${ONE} $${TWO}", "b": ["${THREE}"] });
        let vars: Vec<_> = collect_referenced_vars(&value).into_iter().collect();
        assert_eq!(vars, vec!["ONE", "THREE"]);
    }
}
