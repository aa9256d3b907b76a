//! Gateway event handler feeding the router.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::all::{Interaction as DiscordInteraction, Ready};
use serenity::cache::Settings as CacheSettings;
use serenity::model::channel::Message as DiscordMessage;
use serenity::prelude::*;
use tracing::{info, warn};

use switchboard_commands::Router;

use crate::context::DiscordContext;
use crate::convert;

pub struct SwitchboardHandler {
    router: Router<DiscordContext>,
}

impl SwitchboardHandler {
    pub fn new(router: Router<DiscordContext>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl EventHandler for SwitchboardHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "[Discord] Connected");

        let conn = DiscordContext::from_serenity(&ctx);
        let report = self.router.ready(&conn).await;
        if report.failed_batches > 0 {
            warn!(
                failed = report.failed_batches,
                global = report.global,
                guild = report.guild,
                "[Discord] Some command uploads failed"
            );
        }
    }

    async fn message(&self, ctx: Context, msg: DiscordMessage) {
        let conn = DiscordContext::from_serenity(&ctx);
        // Handlers run detached; the outcome is only interesting to tests.
        let _ = self.router.route_message(&conn, convert::message(&msg));
    }

    async fn interaction_create(&self, ctx: Context, interaction: DiscordInteraction) {
        let Some(interaction) = convert::interaction(&interaction) else {
            return;
        };
        let conn = DiscordContext::from_serenity(&ctx);
        let _ = self.router.route_interaction(&conn, interaction);
    }
}

/// Gateway cache settings keeping `max_messages` messages per channel.
///
/// serenity caches no messages by default, which leaves message-target context
/// menus without anything to resolve.
pub fn cache_settings(max_messages: usize) -> CacheSettings {
    let mut settings = CacheSettings::default();
    settings.max_messages = max_messages;
    settings
}

/// Connect to the gateway and serve events until the client stops.
pub async fn run(
    token: &str,
    intents: GatewayIntents,
    max_messages: usize,
    router: Router<DiscordContext>,
) -> Result<()> {
    info!(max_messages, "[Discord] Starting client");

    let mut client = Client::builder(token, intents)
        .cache_settings(cache_settings(max_messages))
        .event_handler(SwitchboardHandler::new(router))
        .await
        .context("Failed to build Discord client")?;

    client.start().await.context("Discord client error")?;
    Ok(())
}
