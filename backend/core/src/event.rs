//! Inbound platform events, already translated out of the transport's types.

use serde::{Deserialize, Serialize};

use crate::command::InteractionKind;
use crate::types::{ChannelId, GuildId, InteractionId, Member, MessageId, RoleId, User, UserId};

/// A text message posted in a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    /// `None` for direct messages.
    pub guild_id: Option<GuildId>,
    pub author: User,
    pub content: String,
}

/// A structured interaction (slash command, component, context menu).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: InteractionId,
    /// Continuation token used to respond to the interaction.
    pub token: String,
    pub guild_id: Option<GuildId>,
    pub channel_id: Option<ChannelId>,
    pub user: User,
    /// The invoking member, present for interactions inside a guild.
    pub member: Option<Member>,
    pub data: InteractionData,
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        self.data.kind()
    }
}

/// The kind-specific payload of an interaction. The platform guarantees the
/// classification, so exactly one variant applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionData {
    Slash {
        name: String,
        #[serde(default)]
        options: Vec<CommandOption>,
    },
    ContextMenu {
        name: String,
        target: TargetRef,
    },
    Button {
        custom_id: String,
    },
    SelectMenu {
        custom_id: String,
        #[serde(default)]
        values: Vec<String>,
    },
}

impl InteractionData {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Self::Slash { .. } => InteractionKind::Slash,
            Self::ContextMenu { .. } => InteractionKind::ContextMenu,
            Self::Button { .. } => InteractionKind::Button,
            Self::SelectMenu { .. } => InteractionKind::SelectMenu,
        }
    }

    /// The registry key: command name for slash and context menus, custom id
    /// for components.
    pub fn lookup_key(&self) -> &str {
        match self {
            Self::Slash { name, .. } | Self::ContextMenu { name, .. } => name,
            Self::Button { custom_id } | Self::SelectMenu { custom_id, .. } => custom_id,
        }
    }
}

/// A parsed slash-command option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
}

impl CommandOption {
    pub fn new(name: impl Into<String>, value: OptionValue) -> Self {
        Self { name: name.into(), value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    User(UserId),
    Channel(ChannelId),
    Role(RoleId),
    Mentionable(u64),
    Attachment(u64),
    SubCommand(Vec<CommandOption>),
    SubCommandGroup(Vec<CommandOption>),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// What a context-menu command was invoked on, as declared by the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum TargetRef {
    User(UserId),
    Message(MessageId),
}

/// A context-menu target resolved from the connection's cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Target {
    User(User),
    Message(Message),
}
