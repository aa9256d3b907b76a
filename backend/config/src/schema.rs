//! Switchboard configuration schema, typed for serde YAML/JSON.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use switchboard_core::{PermissionRules, Permissions, RoleId};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchboardConfig {
    /// Text-command prefix. Defaults to `!`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Gateway intents to subscribe to, by platform name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intents: Vec<String>,

    #[serde(default)]
    pub discord: DiscordConfig,

    #[serde(default)]
    pub interactions: InteractionsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-command permission overrides, keyed by command name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub commands: BTreeMap<String, CommandRulesConfig>,
}

// ---------------------------------------------------------------------------
// Discord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConfig {
    /// Bot token; usually `${DISCORD_TOKEN}`.
    #[serde(default)]
    pub token: String,

    /// Register structured commands in this guild only (instant updates while
    /// developing) instead of globally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_guild_id: Option<u64>,

    /// Messages kept per channel in the gateway cache. Message-target context
    /// menus only resolve messages still held here; `0` disables the cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_cache: Option<usize>,
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionsConfig {
    /// Evaluate rule sets before interaction handlers as well as text commands.
    #[serde(default)]
    pub check_permissions: bool,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `switchboard_commands=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for rolling NDJSON log files. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Emit JSON on the console as well.
    #[serde(default)]
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Command rule overrides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRulesConfig {
    /// Capability flag names; holding any one grants access.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub require_any: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow_roles: Vec<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny_roles: Vec<u64>,
}

impl CommandRulesConfig {
    /// Build the rule set, skipping unknown flag names (validation reports
    /// them).
    pub fn to_rules(&self) -> PermissionRules {
        let flags = self
            .require_any
            .iter()
            .filter_map(|name| Permissions::parse_name(name))
            .fold(Permissions::empty(), |acc, p| acc | p);

        PermissionRules {
            flags,
            allow_roles: self.allow_roles.iter().copied().map(RoleId::new).collect(),
            deny_roles: self.deny_roles.iter().copied().map(RoleId::new).collect(),
        }
    }
}

impl SwitchboardConfig {
    /// The rule set configured for `command`, if any.
    pub fn rules_for(&self, command: &str) -> Option<PermissionRules> {
        self.commands.get(command).map(CommandRulesConfig::to_rules)
    }
}
