//! `switchboard-core` — the platform model shared by every Switchboard crate.

pub mod command;
pub mod error;
pub mod event;
pub mod traits;
pub mod types;

pub use command::{
    CommandData, DEFAULT_PREFIX, CommandType, ContextMenuTarget, GuildCommand, InteractionKind, OptionSpec,
    OptionType,
};
pub use error::{Result, SwitchboardError};
pub use event::{
    CommandOption, Interaction, InteractionData, Message, OptionValue, Target, TargetRef,
};
pub use traits::{CommandSink, Connection};
pub use types::{
    ChannelId, GuildId, InteractionId, Member, MessageId, PermissionRules, Permissions, RoleId,
    User, UserId,
};
