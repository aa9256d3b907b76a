//! In-memory doubles for the connection and the outbound sink.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

use switchboard_core::{
    ChannelId, CommandData, CommandSink, Connection, GuildCommand, GuildId, Member, Message,
    MessageId, UserId,
};

#[derive(Clone, Default)]
pub struct FakeConnection {
    members: Arc<Mutex<HashMap<(GuildId, UserId), Member>>>,
    messages: Arc<Mutex<HashMap<(ChannelId, MessageId), Message>>>,
}

impl FakeConnection {
    pub fn with_member(self, member: Member) -> Self {
        self.members.lock().insert((member.guild_id, member.user.id), member);
        self
    }

    pub fn with_message(self, message: Message) -> Self {
        self.messages.lock().insert((message.channel_id, message.id), message);
        self
    }
}

impl Connection for FakeConnection {
    fn member(&self, guild_id: GuildId, user_id: UserId) -> Option<Member> {
        self.members.lock().get(&(guild_id, user_id)).cloned()
    }

    fn cached_message(&self, channel_id: ChannelId, message_id: MessageId) -> Option<Message> {
        self.messages.lock().get(&(channel_id, message_id)).cloned()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    global: Mutex<Vec<Vec<CommandData>>>,
    guilds: Mutex<Vec<(GuildId, Vec<GuildCommand>)>>,
    fail_global: bool,
}

impl RecordingSink {
    pub fn failing_global() -> Self {
        Self { fail_global: true, ..Self::default() }
    }

    pub fn global_calls(&self) -> usize {
        self.global.lock().len()
    }

    pub fn global_names(&self) -> Vec<String> {
        self.global
            .lock()
            .iter()
            .flatten()
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn guild_calls(&self) -> Vec<(GuildId, Vec<GuildCommand>)> {
        self.guilds.lock().clone()
    }
}

#[async_trait]
impl CommandSink for RecordingSink {
    async fn register_global(&self, commands: Vec<CommandData>) -> Result<()> {
        if self.fail_global {
            bail!("platform rejected the batch");
        }
        self.global.lock().push(commands);
        Ok(())
    }

    async fn register_guild(&self, guild_id: GuildId, commands: Vec<GuildCommand>) -> Result<()> {
        self.guilds.lock().push((guild_id, commands));
        Ok(())
    }
}

/// Collects what handlers were called with.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().push(call.into());
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock())
    }
}
