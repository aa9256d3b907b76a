//! Event router: maps each inbound event to at most one handler.
//!
//! Routing is synchronous. Every lookup and permission check completes before
//! the handler is spawned, and the handler is never awaited here.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use switchboard_core::{
    CommandSink, Connection, Interaction, InteractionData, Message, Target, TargetRef,
};

use crate::detection::parse_invocation;
use crate::dispatch::{fire, Dispatch, Skip};
use crate::outbound::{FlushReport, OutboundQueue};
use crate::permissions::{evaluate, Access};
use crate::registry::{CommandRegistry, RegisteredInteraction};
use crate::types::InteractionCallback;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterSettings {
    /// Also run the permission evaluator before interaction handlers. Off by
    /// default: interaction rule sets are otherwise only uploaded to the
    /// platform with the command.
    #[serde(default)]
    pub check_interaction_permissions: bool,
}

pub struct Router<C: Connection> {
    pub(crate) registry: Arc<CommandRegistry<C>>,
    pub(crate) outbound: Arc<OutboundQueue>,
    pub(crate) prefix: Arc<RwLock<String>>,
    pub(crate) settings: RouterSettings,
}

impl<C: Connection> Clone for Router<C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            outbound: Arc::clone(&self.outbound),
            prefix: Arc::clone(&self.prefix),
            settings: self.settings,
        }
    }
}

impl<C: Connection> Router<C> {
    /// The connection is ready: upload the queued structured commands.
    pub async fn ready(&self, sink: &dyn CommandSink) -> FlushReport {
        self.outbound.flush(sink).await
    }

    /// Route a text message to a prefix command.
    pub fn route_message(&self, conn: &C, message: Message) -> Dispatch {
        let invocation = {
            let prefix = self.prefix.read();
            parse_invocation(&message.content, &prefix)
        };
        let Some(invocation) = invocation else {
            return Dispatch::Skipped(Skip::NotACommand);
        };
        let Some(command) = self.registry.lookup_text(&invocation.command) else {
            return Dispatch::Skipped(Skip::UnknownCommand);
        };

        let Some(member) = message
            .guild_id
            .and_then(|guild_id| conn.member(guild_id, message.author.id))
        else {
            return Dispatch::Skipped(Skip::NoMember);
        };
        if message.author.bot || member.user.bot {
            return Dispatch::Skipped(Skip::AutomatedAuthor);
        }
        if evaluate(&member, command.permissions.as_ref()) == Access::Deny {
            return Dispatch::Skipped(Skip::Denied);
        }

        let handler = Arc::clone(&command.handler);
        let conn = conn.clone();
        fire(command.name.clone(), async move {
            handler.handle(conn, message, invocation.args).await
        })
    }

    /// Route a structured interaction by command name or custom id.
    pub fn route_interaction(&self, conn: &C, interaction: Interaction) -> Dispatch {
        let Some(command) = self.registry.lookup_interaction(interaction.data.lookup_key()) else {
            return Dispatch::Skipped(Skip::UnknownCommand);
        };
        if command.kind != interaction.kind() {
            return Dispatch::Skipped(Skip::KindMismatch);
        }
        if self.settings.check_interaction_permissions
            && interaction_access(&command, &interaction) == Access::Deny
        {
            return Dispatch::Skipped(Skip::Denied);
        }

        let conn = conn.clone();
        let id = command.id.clone();
        match &command.callback {
            InteractionCallback::Slash(handler) => {
                let InteractionData::Slash { options, .. } = &interaction.data else {
                    return Dispatch::Skipped(Skip::KindMismatch);
                };
                let options = options.clone();
                let handler = Arc::clone(handler);
                fire(id, async move { handler.handle(conn, interaction, options).await })
            }
            InteractionCallback::Component(handler) => {
                let handler = Arc::clone(handler);
                fire(id, async move { handler.handle(conn, interaction).await })
            }
            InteractionCallback::ContextMenu(handler) => {
                let target = resolve_target(&conn, &interaction);
                let handler = Arc::clone(handler);
                fire(id, async move { handler.handle(conn, interaction, target).await })
            }
        }
    }
}

fn interaction_access<C: Connection>(
    command: &RegisteredInteraction<C>,
    interaction: &Interaction,
) -> Access {
    match &interaction.member {
        Some(member) => evaluate(member, command.permissions.as_ref()),
        None if command.permissions.as_ref().is_none_or(|r| r.is_unrestricted()) => Access::Allow,
        None => Access::Deny,
    }
}

/// Resolve a context-menu target from the connection's cache. Absent guild,
/// channel, or cache entry yields `None`.
fn resolve_target<C: Connection>(conn: &C, interaction: &Interaction) -> Option<Target> {
    let InteractionData::ContextMenu { target, .. } = &interaction.data else {
        return None;
    };
    match *target {
        TargetRef::User(user_id) => {
            let guild_id = interaction.guild_id?;
            conn.member(guild_id, user_id).map(|m| Target::User(m.user))
        }
        TargetRef::Message(message_id) => {
            let channel_id = interaction.channel_id?;
            conn.cached_message(channel_id, message_id).map(Target::Message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::switchboard::Switchboard;
    use crate::testing::{Calls, FakeConnection, RecordingSink};
    use crate::types::{InteractionCommand, TextCommand};
    use switchboard_core::{
        ChannelId, CommandData, CommandOption, ContextMenuTarget, GuildId, InteractionId, Member,
        MessageId, OptionValue, PermissionRules, Permissions, RoleId, User, UserId,
    };

    const GUILD: u64 = 10;
    const CHANNEL: u64 = 20;
    const ROLE_A: u64 = 100;
    const ROLE_B: u64 = 200;

    fn alice() -> User {
        User::new(1, "alice")
    }

    fn member(user: User, roles: &[u64]) -> Member {
        Member::new(user, GUILD).with_roles(roles.iter().copied().map(RoleId::new))
    }

    fn message(author: User, content: &str) -> Message {
        Message {
            id: MessageId::new(500),
            channel_id: ChannelId::new(CHANNEL),
            guild_id: Some(GuildId::new(GUILD)),
            author,
            content: content.to_string(),
        }
    }

    fn interaction(data: InteractionData) -> Interaction {
        Interaction {
            id: InteractionId::new(900),
            token: "token".into(),
            guild_id: Some(GuildId::new(GUILD)),
            channel_id: Some(ChannelId::new(CHANNEL)),
            user: alice(),
            member: Some(member(alice(), &[])),
            data,
        }
    }

    fn recording_text(name: &str, calls: &Calls) -> TextCommand<FakeConnection> {
        let calls = calls.clone();
        TextCommand::new(name).handler_fn(move |_conn, msg: Message, args: Vec<String>| {
            let calls = calls.clone();
            async move {
                calls.push(format!("{}:{}", msg.author.name, args.join(",")));
                Ok(())
            }
        })
    }

    fn recording_button(id: &str, calls: &Calls) -> InteractionCommand<FakeConnection> {
        let calls = calls.clone();
        InteractionCommand::button(id).on_component(move |_conn, i: Interaction| {
            let calls = calls.clone();
            async move {
                calls.push(i.data.lookup_key().to_string());
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn text_command_receives_remaining_tokens() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_text(recording_text("greet", &calls));
        let conn = FakeConnection::default().with_member(member(alice(), &[]));

        let dispatch = board.router().route_message(&conn, message(alice(), "!greet alice bob"));

        assert!(dispatch.finished().await);
        assert_eq!(calls.take(), vec!["alice:alice,bob"]);
    }

    #[tokio::test]
    async fn message_without_prefix_never_fires() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_text(recording_text("greet", &calls));
        let conn = FakeConnection::default().with_member(member(alice(), &[]));
        let router = board.router();

        for content in ["greet alice", "?greet", "hey !greet", ""] {
            let dispatch = router.route_message(&conn, message(alice(), content));
            assert_eq!(dispatch.skip_reason(), Some(Skip::NotACommand));
        }
        assert!(calls.take().is_empty());
    }

    #[tokio::test]
    async fn unknown_text_command_is_ignored() {
        let board = Switchboard::<FakeConnection>::new();
        let conn = FakeConnection::default().with_member(member(alice(), &[]));
        let dispatch = board.router().route_message(&conn, message(alice(), "!nope"));
        assert_eq!(dispatch.skip_reason(), Some(Skip::UnknownCommand));
    }

    #[tokio::test]
    async fn ping_allow_list_scenario() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_text(
            recording_text("ping", &calls).permissions(PermissionRules::new().allow(ROLE_A)),
        );
        let bob = User::new(2, "bob");
        let conn = FakeConnection::default()
            .with_member(member(alice(), &[ROLE_A, ROLE_B]))
            .with_member(member(bob.clone(), &[ROLE_B]));
        let router = board.router();

        assert!(router.route_message(&conn, message(alice(), "!ping")).finished().await);
        let denied = router.route_message(&conn, message(bob, "!ping"));
        assert_eq!(denied.skip_reason(), Some(Skip::Denied));
        assert_eq!(calls.take(), vec!["alice:"]);
    }

    #[tokio::test]
    async fn unresolvable_or_bot_author_is_ignored() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_text(recording_text("ping", &calls));
        let bot = User::new(3, "helper").bot();
        let conn = FakeConnection::default().with_member(member(bot.clone(), &[]));
        let router = board.router();

        // Not cached in the guild.
        let dispatch = router.route_message(&conn, message(alice(), "!ping"));
        assert_eq!(dispatch.skip_reason(), Some(Skip::NoMember));

        // Direct message: no guild to resolve a member in.
        let mut dm = message(alice(), "!ping");
        dm.guild_id = None;
        assert_eq!(router.route_message(&conn, dm).skip_reason(), Some(Skip::NoMember));

        let dispatch = router.route_message(&conn, message(bot, "!ping"));
        assert_eq!(dispatch.skip_reason(), Some(Skip::AutomatedAuthor));
        assert!(calls.take().is_empty());
    }

    #[tokio::test]
    async fn prefix_change_applies_to_existing_routers() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_text(recording_text("ping", &calls));
        let conn = FakeConnection::default().with_member(member(alice(), &[]));
        let router = board.router();

        board.set_prefix("sb!").unwrap();

        assert!(!router.route_message(&conn, message(alice(), "!ping")).is_fired());
        assert!(router.route_message(&conn, message(alice(), "sb!ping")).finished().await);
    }

    #[tokio::test]
    async fn unknown_button_invokes_nothing() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_interaction(recording_button("confirm", &calls));

        let dispatch = board.router().route_interaction(
            &FakeConnection::default(),
            interaction(InteractionData::Button { custom_id: "cancel".into() }),
        );

        assert_eq!(dispatch.skip_reason(), Some(Skip::UnknownCommand));
        assert!(calls.take().is_empty());
    }

    #[tokio::test]
    async fn button_and_select_menu_receive_the_event() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_interaction(recording_button("confirm", &calls));
        let select_calls = calls.clone();
        board.register_interaction(InteractionCommand::select_menu("colour").on_component(
            move |_conn, i: Interaction| {
                let calls = select_calls.clone();
                async move {
                    if let InteractionData::SelectMenu { values, .. } = i.data {
                        calls.push(values.join("|"));
                    }
                    Ok(())
                }
            },
        ));
        let conn = FakeConnection::default();
        let router = board.router();

        let pressed = router.route_interaction(
            &conn,
            interaction(InteractionData::Button { custom_id: "confirm".into() }),
        );
        assert!(pressed.finished().await);
        let selected = router.route_interaction(
            &conn,
            interaction(InteractionData::SelectMenu {
                custom_id: "colour".into(),
                values: vec!["red".into(), "blue".into()],
            }),
        );
        assert!(selected.finished().await);

        assert_eq!(calls.take(), vec!["confirm", "red|blue"]);
    }

    #[tokio::test]
    async fn slash_command_receives_options() {
        let calls = Calls::default();
        let board = Switchboard::new();
        let slash_calls = calls.clone();
        board.register_interaction(
            InteractionCommand::command(CommandData::slash("echo", "Echo text")).on_slash(
                move |_conn, _i, options: Vec<CommandOption>| {
                    let calls = slash_calls.clone();
                    async move {
                        for option in options {
                            calls.push(format!("{}={}", option.name, option.value.as_str().unwrap_or("?")));
                        }
                        Ok(())
                    }
                },
            ),
        );

        let dispatch = board.router().route_interaction(
            &FakeConnection::default(),
            interaction(InteractionData::Slash {
                name: "echo".into(),
                options: vec![CommandOption::new("text", OptionValue::String("hi".into()))],
            }),
        );

        assert!(dispatch.finished().await);
        assert_eq!(calls.take(), vec!["text=hi"]);
    }

    #[tokio::test]
    async fn kind_mismatch_is_a_miss() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_interaction(recording_button("ping", &calls));

        let dispatch = board.router().route_interaction(
            &FakeConnection::default(),
            interaction(InteractionData::Slash { name: "ping".into(), options: vec![] }),
        );

        assert_eq!(dispatch.skip_reason(), Some(Skip::KindMismatch));
        assert!(calls.take().is_empty());
    }

    fn recording_context_menu(
        name: &str,
        target: ContextMenuTarget,
        calls: &Calls,
    ) -> InteractionCommand<FakeConnection> {
        let calls = calls.clone();
        InteractionCommand::command(CommandData::context_menu(name, target)).on_context_menu(
            move |_conn, _i, target: Option<Target>| {
                let calls = calls.clone();
                async move {
                    calls.push(match target {
                        Some(Target::User(u)) => format!("user:{}", u.name),
                        Some(Target::Message(m)) => format!("message:{}", m.content),
                        None => "none".to_string(),
                    });
                    Ok(())
                }
            },
        )
    }

    #[tokio::test]
    async fn context_menu_resolves_cached_targets() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_interaction(recording_context_menu("Inspect", ContextMenuTarget::User, &calls));
        board.register_interaction(recording_context_menu("Quote", ContextMenuTarget::Message, &calls));
        let bob = User::new(2, "bob");
        let conn = FakeConnection::default()
            .with_member(member(bob, &[]))
            .with_message(message(alice(), "hello there"));
        let router = board.router();

        let on_user = router.route_interaction(
            &conn,
            interaction(InteractionData::ContextMenu {
                name: "Inspect".into(),
                target: TargetRef::User(UserId::new(2)),
            }),
        );
        assert!(on_user.finished().await);
        let on_message = router.route_interaction(
            &conn,
            interaction(InteractionData::ContextMenu {
                name: "Quote".into(),
                target: TargetRef::Message(MessageId::new(500)),
            }),
        );
        assert!(on_message.finished().await);

        assert_eq!(calls.take(), vec!["user:bob", "message:hello there"]);
    }

    #[tokio::test]
    async fn context_menu_on_uncached_user_still_fires_without_target() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_interaction(recording_context_menu("Inspect", ContextMenuTarget::User, &calls));
        let router = board.router();
        let conn = FakeConnection::default();

        let uncached = router.route_interaction(
            &conn,
            interaction(InteractionData::ContextMenu {
                name: "Inspect".into(),
                target: TargetRef::User(UserId::new(404)),
            }),
        );
        assert!(uncached.finished().await);

        let mut outside_guild = interaction(InteractionData::ContextMenu {
            name: "Inspect".into(),
            target: TargetRef::User(UserId::new(2)),
        });
        outside_guild.guild_id = None;
        assert!(router.route_interaction(&conn, outside_guild).finished().await);

        assert_eq!(calls.take(), vec!["none", "none"]);
    }

    #[tokio::test]
    async fn context_menu_on_uncached_message_still_fires_without_target() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_interaction(recording_context_menu("Quote", ContextMenuTarget::Message, &calls));
        let router = board.router();
        let conn = FakeConnection::default().with_message(message(alice(), "hello there"));
        let quote = |id: u64| {
            interaction(InteractionData::ContextMenu {
                name: "Quote".into(),
                target: TargetRef::Message(MessageId::new(id)),
            })
        };

        assert!(router.route_interaction(&conn, quote(404)).finished().await);

        let mut no_channel = quote(500);
        no_channel.channel_id = None;
        assert!(router.route_interaction(&conn, no_channel).finished().await);

        let mut other_channel = quote(500);
        other_channel.channel_id = Some(ChannelId::new(CHANNEL + 1));
        assert!(router.route_interaction(&conn, other_channel).finished().await);

        assert_eq!(calls.take(), vec!["none", "none", "none"]);
    }

    #[tokio::test]
    async fn interaction_permissions_are_not_checked_by_default() {
        let calls = Calls::default();
        let board = Switchboard::new();
        board.register_interaction(
            recording_button("admin", &calls)
                .permissions(PermissionRules::new().require_any(Permissions::ADMINISTRATOR)),
        );

        let dispatch = board.router().route_interaction(
            &FakeConnection::default(),
            interaction(InteractionData::Button { custom_id: "admin".into() }),
        );

        assert!(dispatch.finished().await);
        assert_eq!(calls.take(), vec!["admin"]);
    }

    #[tokio::test]
    async fn interaction_permissions_checked_when_enabled() {
        let calls = Calls::default();
        let board = Switchboard::new()
            .with_settings(RouterSettings { check_interaction_permissions: true });
        board.register_interaction(
            recording_button("admin", &calls)
                .permissions(PermissionRules::new().require_any(Permissions::ADMINISTRATOR)),
        );
        let router = board.router();
        let conn = FakeConnection::default();

        let plain = router.route_interaction(
            &conn,
            interaction(InteractionData::Button { custom_id: "admin".into() }),
        );
        assert_eq!(plain.skip_reason(), Some(Skip::Denied));

        let mut from_dm = interaction(InteractionData::Button { custom_id: "admin".into() });
        from_dm.member = None;
        assert_eq!(router.route_interaction(&conn, from_dm).skip_reason(), Some(Skip::Denied));

        let mut from_admin = interaction(InteractionData::Button { custom_id: "admin".into() });
        from_admin.member =
            Some(member(alice(), &[]).with_permissions(Permissions::ADMINISTRATOR));
        assert!(router.route_interaction(&conn, from_admin).finished().await);

        assert_eq!(calls.take(), vec!["admin"]);
    }

    #[tokio::test]
    async fn failing_handler_does_not_affect_routing() {
        let board = Switchboard::new();
        board.register_text(
            TextCommand::new("boom")
                .handler_fn(|_c, _m, _a| async { Err(anyhow::anyhow!("handler exploded")) }),
        );
        let conn = FakeConnection::default().with_member(member(alice(), &[]));
        let router = board.router();

        assert!(router.route_message(&conn, message(alice(), "!boom")).finished().await);
        assert!(router.route_message(&conn, message(alice(), "!boom")).finished().await);
    }

    #[tokio::test]
    async fn ready_flushes_registered_commands_once() {
        let board = Switchboard::<FakeConnection>::new();
        board.register_interaction(
            InteractionCommand::command(CommandData::slash("ping", "Ping"))
                .on_slash(|_c, _i, _o| async { Ok(()) }),
        );
        let sink = RecordingSink::default();
        let router = board.router();

        let first = router.ready(&sink).await;
        let second = router.ready(&sink).await;

        assert_eq!(first.global, 1);
        assert_eq!(second, FlushReport::default());
        assert_eq!(sink.global_names(), vec!["ping"]);
    }
}
