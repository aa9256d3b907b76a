//! Config defaults: fills in values a config file may leave out.

use switchboard_core::DEFAULT_PREFIX;

use crate::schema::SwitchboardConfig;

/// Gateway intents understood by the Discord adapter.
pub const KNOWN_INTENTS: &[&str] = &[
    "GUILDS",
    "GUILD_MEMBERS",
    "GUILD_MODERATION",
    "GUILD_EMOJIS_AND_STICKERS",
    "GUILD_INTEGRATIONS",
    "GUILD_WEBHOOKS",
    "GUILD_INVITES",
    "GUILD_VOICE_STATES",
    "GUILD_PRESENCES",
    "GUILD_MESSAGES",
    "GUILD_MESSAGE_REACTIONS",
    "GUILD_MESSAGE_TYPING",
    "DIRECT_MESSAGES",
    "DIRECT_MESSAGE_REACTIONS",
    "DIRECT_MESSAGE_TYPING",
    "MESSAGE_CONTENT",
    "GUILD_SCHEDULED_EVENTS",
    "AUTO_MODERATION_CONFIGURATION",
    "AUTO_MODERATION_EXECUTION",
];

/// Intents needed for prefix commands and member role lookups.
pub const DEFAULT_INTENTS: &[&str] =
    &["GUILDS", "GUILD_MEMBERS", "GUILD_MESSAGES", "MESSAGE_CONTENT"];

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Messages cached per channel when `discord.messageCache` is unset.
pub const DEFAULT_MESSAGE_CACHE: usize = 200;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: SwitchboardConfig) -> SwitchboardConfig {
    let config = apply_prefix_default(config);
    let config = apply_intent_defaults(config);
    let config = apply_discord_defaults(config);
    apply_logging_defaults(config)
}

fn apply_prefix_default(mut config: SwitchboardConfig) -> SwitchboardConfig {
    config.prefix.get_or_insert_with(|| DEFAULT_PREFIX.to_string());
    config
}

/// Intent names are upper-cased; an empty list gets the defaults.
fn apply_intent_defaults(mut config: SwitchboardConfig) -> SwitchboardConfig {
    if config.intents.is_empty() {
        config.intents = DEFAULT_INTENTS.iter().map(|s| s.to_string()).collect();
    } else {
        for intent in &mut config.intents {
            *intent = intent.trim().to_ascii_uppercase();
        }
    }
    config
}

fn apply_discord_defaults(mut config: SwitchboardConfig) -> SwitchboardConfig {
    config.discord.message_cache.get_or_insert(DEFAULT_MESSAGE_CACHE);
    config
}

fn apply_logging_defaults(mut config: SwitchboardConfig) -> SwitchboardConfig {
    config
        .logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gets_defaults() {
        let config = apply_all_defaults(SwitchboardConfig::default());
        assert_eq!(config.prefix.as_deref(), Some("!"));
        assert_eq!(config.intents, DEFAULT_INTENTS);
        assert_eq!(config.logging.level.as_deref(), Some("info"));
        assert_eq!(config.discord.message_cache, Some(DEFAULT_MESSAGE_CACHE));
    }

    #[test]
    fn explicit_message_cache_is_kept_even_when_zero() {
        let mut config = SwitchboardConfig::default();
        config.discord.message_cache = Some(0);
        let config = apply_all_defaults(config);
        assert_eq!(config.discord.message_cache, Some(0));
    }

    #[test]
    fn explicit_values_are_kept_and_intents_normalised() {
        let mut config = SwitchboardConfig::default();
        config.prefix = Some("?".into());
        config.intents = vec![" guilds ".into(), "GUILD_MESSAGES".into()];
        let config = apply_all_defaults(config);
        assert_eq!(config.prefix.as_deref(), Some("?"));
        assert_eq!(config.intents, vec!["GUILDS", "GUILD_MESSAGES"]);
    }

    #[test]
    fn default_intents_are_known() {
        for intent in DEFAULT_INTENTS {
            assert!(KNOWN_INTENTS.contains(intent), "{intent}");
        }
    }
}
