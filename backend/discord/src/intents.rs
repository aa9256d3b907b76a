use anyhow::{bail, Result};
use serenity::all::GatewayIntents;

/// Combine gateway intents given by name, e.g. `["GUILDS", "MESSAGE_CONTENT"]`.
pub fn parse_intents<S: AsRef<str>>(names: &[S]) -> Result<GatewayIntents> {
    let mut intents = GatewayIntents::empty();
    for name in names {
        intents |= match name.as_ref().trim().to_ascii_uppercase().as_str() {
            "GUILDS" => GatewayIntents::GUILDS,
            "GUILD_MEMBERS" => GatewayIntents::GUILD_MEMBERS,
            "GUILD_MODERATION" => GatewayIntents::GUILD_MODERATION,
            "GUILD_EMOJIS_AND_STICKERS" => GatewayIntents::GUILD_EMOJIS_AND_STICKERS,
            "GUILD_INTEGRATIONS" => GatewayIntents::GUILD_INTEGRATIONS,
            "GUILD_WEBHOOKS" => GatewayIntents::GUILD_WEBHOOKS,
            "GUILD_INVITES" => GatewayIntents::GUILD_INVITES,
            "GUILD_VOICE_STATES" => GatewayIntents::GUILD_VOICE_STATES,
            "GUILD_PRESENCES" => GatewayIntents::GUILD_PRESENCES,
            "GUILD_MESSAGES" => GatewayIntents::GUILD_MESSAGES,
            "GUILD_MESSAGE_REACTIONS" => GatewayIntents::GUILD_MESSAGE_REACTIONS,
            "GUILD_MESSAGE_TYPING" => GatewayIntents::GUILD_MESSAGE_TYPING,
            "DIRECT_MESSAGES" => GatewayIntents::DIRECT_MESSAGES,
            "DIRECT_MESSAGE_REACTIONS" => GatewayIntents::DIRECT_MESSAGE_REACTIONS,
            "DIRECT_MESSAGE_TYPING" => GatewayIntents::DIRECT_MESSAGE_TYPING,
            "MESSAGE_CONTENT" => GatewayIntents::MESSAGE_CONTENT,
            "GUILD_SCHEDULED_EVENTS" => GatewayIntents::GUILD_SCHEDULED_EVENTS,
            "AUTO_MODERATION_CONFIGURATION" => GatewayIntents::AUTO_MODERATION_CONFIGURATION,
            "AUTO_MODERATION_EXECUTION" => GatewayIntents::AUTO_MODERATION_EXECUTION,
            other => bail!("Unknown gateway intent '{other}'"),
        };
    }
    Ok(intents)
}
