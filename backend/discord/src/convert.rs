//! Conversions between serenity's model and the Switchboard platform model.

use std::num::NonZeroU64;

use serenity::all::{
    CommandDataOption, CommandDataOptionValue, CommandInteraction, CommandOptionType,
    CommandType as DiscordCommandType, ComponentInteraction, ComponentInteractionDataKind,
    CreateCommand, CreateCommandOption, Interaction as DiscordInteraction,
    Member as DiscordMember, Message as DiscordMessage, Permissions as DiscordPermissions,
    User as DiscordUser,
};
use tracing::warn;

use switchboard_core::{
    ChannelId, CommandData, CommandOption, CommandType, ContextMenuTarget, GuildCommand, GuildId,
    Interaction, InteractionData, InteractionId, Member, Message, MessageId, OptionType,
    OptionValue, Permissions, RoleId, TargetRef, User, UserId,
};

/// A serenity id from a raw snowflake. Zero is not a valid id.
pub fn discord_id<T: From<NonZeroU64>>(raw: u64) -> Option<T> {
    NonZeroU64::new(raw).map(T::from)
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

pub fn permissions(p: DiscordPermissions) -> Permissions {
    Permissions::from_bits_truncate(p.bits())
}

pub fn user(u: &DiscordUser) -> User {
    let user = User::new(u.id.get(), u.name.clone());
    if u.bot { user.bot() } else { user }
}

pub fn member(m: &DiscordMember, guild_id: GuildId) -> Member {
    Member::new(user(&m.user), guild_id)
        .with_roles(m.roles.iter().map(|r| RoleId::new(r.get())))
        .with_permissions(m.permissions.map(permissions).unwrap_or_else(Permissions::empty))
}

pub fn message(m: &DiscordMessage) -> Message {
    Message {
        id: MessageId::new(m.id.get()),
        channel_id: ChannelId::new(m.channel_id.get()),
        guild_id: m.guild_id.map(|g| GuildId::new(g.get())),
        author: user(&m.author),
        content: m.content.clone(),
    }
}

/// Slash commands, context menus and message components. Autocomplete,
/// modals and pings have no counterpart and yield `None`.
pub fn interaction(i: &DiscordInteraction) -> Option<Interaction> {
    match i {
        DiscordInteraction::Command(cmd) => command_interaction(cmd),
        DiscordInteraction::Component(component) => component_interaction(component),
        _ => None,
    }
}

fn command_interaction(cmd: &CommandInteraction) -> Option<Interaction> {
    let name = cmd.data.name.clone();
    let data = match cmd.data.kind {
        DiscordCommandType::ChatInput => InteractionData::Slash {
            name,
            options: options(&cmd.data.options),
        },
        DiscordCommandType::User => InteractionData::ContextMenu {
            name,
            target: TargetRef::User(UserId::new(cmd.data.target_id?.get())),
        },
        DiscordCommandType::Message => InteractionData::ContextMenu {
            name,
            target: TargetRef::Message(MessageId::new(cmd.data.target_id?.get())),
        },
        _ => return None,
    };

    let guild_id = cmd.guild_id.map(|g| GuildId::new(g.get()));
    Some(Interaction {
        id: InteractionId::new(cmd.id.get()),
        token: cmd.token.clone(),
        guild_id,
        channel_id: Some(ChannelId::new(cmd.channel_id.get())),
        user: user(&cmd.user),
        member: guild_id.and_then(|g| cmd.member.as_ref().map(|m| member(m, g))),
        data,
    })
}

fn component_interaction(component: &ComponentInteraction) -> Option<Interaction> {
    let custom_id = component.data.custom_id.clone();
    let data = match &component.data.kind {
        ComponentInteractionDataKind::Button => InteractionData::Button { custom_id },
        ComponentInteractionDataKind::StringSelect { values } => InteractionData::SelectMenu {
            custom_id,
            values: values.clone(),
        },
        ComponentInteractionDataKind::UserSelect { values } => select(custom_id, values),
        ComponentInteractionDataKind::RoleSelect { values } => select(custom_id, values),
        ComponentInteractionDataKind::ChannelSelect { values } => select(custom_id, values),
        ComponentInteractionDataKind::MentionableSelect { values } => select(custom_id, values),
        _ => return None,
    };

    let guild_id = component.guild_id.map(|g| GuildId::new(g.get()));
    Some(Interaction {
        id: InteractionId::new(component.id.get()),
        token: component.token.clone(),
        guild_id,
        channel_id: Some(ChannelId::new(component.channel_id.get())),
        user: user(&component.user),
        member: guild_id.and_then(|g| component.member.as_ref().map(|m| member(m, g))),
        data,
    })
}

/// Entity selects carry ids; they are passed on as decimal strings.
fn select<T: ToString>(custom_id: String, values: &[T]) -> InteractionData {
    InteractionData::SelectMenu {
        custom_id,
        values: values.iter().map(ToString::to_string).collect(),
    }
}

fn options(opts: &[CommandDataOption]) -> Vec<CommandOption> {
    opts.iter()
        .filter_map(|o| Some(CommandOption::new(o.name.clone(), option_value(&o.value)?)))
        .collect()
}

pub fn option_value(value: &CommandDataOptionValue) -> Option<OptionValue> {
    Some(match value {
        CommandDataOptionValue::String(s) => OptionValue::String(s.clone()),
        CommandDataOptionValue::Integer(n) => OptionValue::Integer(*n),
        CommandDataOptionValue::Number(n) => OptionValue::Number(*n),
        CommandDataOptionValue::Boolean(b) => OptionValue::Boolean(*b),
        CommandDataOptionValue::User(id) => OptionValue::User(UserId::new(id.get())),
        CommandDataOptionValue::Channel(id) => OptionValue::Channel(ChannelId::new(id.get())),
        CommandDataOptionValue::Role(id) => OptionValue::Role(RoleId::new(id.get())),
        CommandDataOptionValue::Mentionable(id) => OptionValue::Mentionable(id.get()),
        CommandDataOptionValue::Attachment(id) => OptionValue::Attachment(id.get()),
        CommandDataOptionValue::SubCommand(opts) => OptionValue::SubCommand(options(opts)),
        CommandDataOptionValue::SubCommandGroup(opts) => {
            OptionValue::SubCommandGroup(options(opts))
        }
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

fn option_type(t: OptionType) -> CommandOptionType {
    match t {
        OptionType::String => CommandOptionType::String,
        OptionType::Integer => CommandOptionType::Integer,
        OptionType::Number => CommandOptionType::Number,
        OptionType::Boolean => CommandOptionType::Boolean,
        OptionType::User => CommandOptionType::User,
        OptionType::Channel => CommandOptionType::Channel,
        OptionType::Role => CommandOptionType::Role,
        OptionType::Mentionable => CommandOptionType::Mentionable,
        OptionType::Attachment => CommandOptionType::Attachment,
    }
}

pub fn create_command(data: &CommandData) -> CreateCommand {
    let command = CreateCommand::new(&data.name);
    match data.command_type {
        CommandType::ChatInput => data.options.iter().fold(
            command.description(&data.description),
            |command, o| {
                command.add_option(
                    CreateCommandOption::new(option_type(o.option_type), &o.name, &o.description)
                        .required(o.required),
                )
            },
        ),
        CommandType::ContextMenu(ContextMenuTarget::User) => command.kind(DiscordCommandType::User),
        CommandType::ContextMenu(ContextMenuTarget::Message) => {
            command.kind(DiscordCommandType::Message)
        }
    }
}

/// A single capability flag becomes the command's default member permission.
///
/// Discord requires every bit of `default_member_permissions`, while a rule
/// set passes on any one flag, so several flags are not uploaded and are only
/// enforced by the router's interaction check. Role lists are enforced when
/// routing as well.
pub fn guild_command(command: &GuildCommand) -> CreateCommand {
    let builder = create_command(&command.data);
    let Some(rules) = &command.permissions else {
        return builder;
    };
    match rules.flags.bits().count_ones() {
        0 => builder,
        1 => builder.default_member_permissions(DiscordPermissions::from_bits_truncate(
            rules.flags.bits(),
        )),
        _ => {
            warn!(
                command = %command.data.name,
                flags = %rules.flags.names().join("|"),
                "[Discord] Any-of flags cannot be uploaded; enable interactions.checkPermissions to enforce them"
            );
            builder
        }
    }
}
