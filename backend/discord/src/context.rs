//! Per-event connection handle: the gateway cache for lookups and the HTTP
//! client for replies and command uploads.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::all::{
    Cache, ChannelId as DiscordChannelId, Command, CreateInteractionResponse,
    CreateInteractionResponseMessage, GuildId as DiscordGuildId, Http,
    InteractionId as DiscordInteractionId, MessageId as DiscordMessageId,
    UserId as DiscordUserId,
};
use serenity::prelude::Context;
use tracing::debug;

use switchboard_core::{
    ChannelId, CommandData, CommandSink, Connection, GuildCommand, GuildId, Interaction, Member,
    Message, MessageId, UserId,
};

use crate::convert::{self, discord_id};

#[derive(Clone)]
pub struct DiscordContext {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl DiscordContext {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    pub fn from_serenity(ctx: &Context) -> Self {
        Self::new(Arc::clone(&ctx.http), Arc::clone(&ctx.cache))
    }

    pub fn http(&self) -> &Arc<Http> {
        &self.http
    }

    /// Post a plain text message.
    pub async fn say(&self, channel_id: ChannelId, text: impl Into<String>) -> Result<()> {
        let channel: DiscordChannelId =
            discord_id(channel_id.get()).context("Cannot post to channel 0")?;
        channel.say(&self.http, text).await?;
        Ok(())
    }

    /// Answer an interaction with a plain text message.
    pub async fn respond(&self, interaction: &Interaction, text: impl Into<String>) -> Result<()> {
        let id: DiscordInteractionId =
            discord_id(interaction.id.get()).context("Cannot respond to interaction 0")?;
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(text),
        );
        self.http
            .create_interaction_response(id, &interaction.token, &response, Vec::new())
            .await?;
        Ok(())
    }
}

impl Connection for DiscordContext {
    #[allow(deprecated)]
    fn member(&self, guild_id: GuildId, user_id: UserId) -> Option<Member> {
        let guild = self.cache.guild(discord_id::<DiscordGuildId>(guild_id.get())?)?;
        let member = guild.members.get(&discord_id::<DiscordUserId>(user_id.get())?)?;
        let permissions = convert::permissions(guild.member_permissions(member));
        Some(convert::member(member, guild_id).with_permissions(permissions))
    }

    fn cached_message(&self, channel_id: ChannelId, message_id: MessageId) -> Option<Message> {
        let message = self.cache.message(
            discord_id::<DiscordChannelId>(channel_id.get())?,
            discord_id::<DiscordMessageId>(message_id.get())?,
        )?;
        Some(convert::message(&message))
    }
}

#[async_trait]
impl CommandSink for DiscordContext {
    async fn register_global(&self, commands: Vec<CommandData>) -> Result<()> {
        let builders = commands.iter().map(convert::create_command).collect();
        let registered = Command::set_global_commands(&self.http, builders).await?;
        debug!(count = registered.len(), "[Discord] Global commands set");
        Ok(())
    }

    async fn register_guild(&self, guild_id: GuildId, commands: Vec<GuildCommand>) -> Result<()> {
        let guild: DiscordGuildId =
            discord_id(guild_id.get()).context("Cannot register commands in guild 0")?;
        let builders = commands.iter().map(convert::guild_command).collect();
        let registered = guild.set_commands(&self.http, builders).await?;
        debug!(count = registered.len(), guild = %guild_id, "[Discord] Guild commands set");
        Ok(())
    }
}
