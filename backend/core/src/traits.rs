use anyhow::Result;
use async_trait::async_trait;

use crate::command::{CommandData, GuildCommand};
use crate::event::Message;
use crate::types::{ChannelId, GuildId, Member, MessageId, UserId};

/// Handle to the live platform connection, passed to the router with every
/// event and on to the handler that fires.
///
/// Lookups only read the connection's local cache; they never suspend.
pub trait Connection: Clone + Send + Sync + 'static {
    /// A cached member of `guild_id`, if both the guild and member are known.
    fn member(&self, guild_id: GuildId, user_id: UserId) -> Option<Member>;

    /// A cached message in `channel_id`.
    fn cached_message(&self, channel_id: ChannelId, message_id: MessageId) -> Option<Message>;
}

/// Receives structured-command definitions once the connection is ready.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Register commands available in every guild and in DMs.
    async fn register_global(&self, commands: Vec<CommandData>) -> Result<()>;

    /// Register commands, with their rule sets, for one guild.
    async fn register_guild(&self, guild_id: GuildId, commands: Vec<GuildCommand>) -> Result<()>;
}
