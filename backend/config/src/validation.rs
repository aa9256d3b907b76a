//! Config validation with field paths in every message.

use switchboard_core::Permissions;
use thiserror::Error;

use crate::defaults::KNOWN_INTENTS;
use crate::schema::SwitchboardConfig;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// Errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &SwitchboardConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_prefix(config, &mut report);
    validate_intents(config, &mut report);
    validate_discord(config, &mut report);
    validate_commands(config, &mut report);
    report
}

/// Additional checks for a config that is about to connect: a token is
/// required.
pub fn validate_for_run(config: &SwitchboardConfig) -> ValidationReport {
    let mut report = validate(config);
    if config.discord.token.trim().is_empty() {
        report.error("discord.token", "Discord bot token is required");
    }
    report
}

fn validate_prefix(config: &SwitchboardConfig, report: &mut ValidationReport) {
    let Some(prefix) = &config.prefix else { return };
    if prefix.is_empty() {
        report.error("prefix", "Prefix cannot be empty");
    } else if prefix.chars().any(char::is_whitespace) {
        report.error("prefix", format!("Prefix '{prefix}' cannot contain whitespace"));
    }
}

fn validate_intents(config: &SwitchboardConfig, report: &mut ValidationReport) {
    for (i, intent) in config.intents.iter().enumerate() {
        if !KNOWN_INTENTS.contains(&intent.as_str()) {
            report.error(format!("intents[{i}]"), format!("Unknown gateway intent '{intent}'"));
        }
    }
    let has = |name: &str| config.intents.iter().any(|i| i == name);
    if !config.intents.is_empty() && !has("MESSAGE_CONTENT") {
        report.warn("intents", "MESSAGE_CONTENT is not requested; prefix commands will not be seen");
    }
    if !config.intents.is_empty() && !has("GUILD_MEMBERS") {
        report.warn("intents", "GUILD_MEMBERS is not requested; role checks may deny members missing from the cache");
    }
}

fn validate_discord(config: &SwitchboardConfig, report: &mut ValidationReport) {
    if config.discord.dev_guild_id == Some(0) {
        report.error("discord.devGuildId", "Guild id cannot be 0");
    }
}

fn validate_commands(config: &SwitchboardConfig, report: &mut ValidationReport) {
    for (name, rules) in &config.commands {
        let path = format!("commands.{name}");
        for flag in &rules.require_any {
            if Permissions::parse_name(flag).is_none() {
                report.error(format!("{path}.requireAny"), format!("Unknown permission flag '{flag}'"));
            }
        }
        let known = rules.require_any.iter().filter(|f| Permissions::parse_name(f).is_some()).count();
        if known > 1 && !config.interactions.check_permissions {
            report.warn(
                format!("{path}.requireAny"),
                "Several flags on an interaction are only enforced with interactions.checkPermissions",
            );
        }
        if rules.allow_roles.contains(&0) || rules.deny_roles.contains(&0) {
            report.error(&path, "Role id cannot be 0");
        }
        if let Some(role) = rules.allow_roles.iter().find(|r| rules.deny_roles.contains(r)) {
            report.warn(&path, format!("Role {role} is both allowed and denied; deny wins"));
        }
    }
}
