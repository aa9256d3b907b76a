//! The bot's command set, wired onto a [`Switchboard`].

use anyhow::{ensure, Result};

use switchboard_commands::{InteractionCommand, RouterSettings, Switchboard, TextCommand};
use switchboard_config::SwitchboardConfig;
use switchboard_core::{
    CommandData, ContextMenuTarget, GuildId, InteractionData, OptionType, OptionValue,
    PermissionRules, Permissions, Target,
};
use switchboard_discord::DiscordContext;

type Board = Switchboard<DiscordContext>;
type Interaction = InteractionCommand<DiscordContext>;

/// Build the switchboard for `config`: prefix, router settings, and every
/// command with its rule set. Configured rules replace built-in ones.
pub fn build(config: &SwitchboardConfig) -> Result<Board> {
    let board = Board::new().with_settings(RouterSettings {
        check_interaction_permissions: config.interactions.check_permissions,
    });
    if let Some(prefix) = &config.prefix {
        board.set_prefix(prefix.clone())?;
    }

    register_text_commands(&board, config)?;
    register_interactions(&board, config, config.discord.dev_guild_id.map(GuildId::new))?;
    Ok(board)
}

fn rules(
    config: &SwitchboardConfig,
    name: &str,
    builtin: Option<PermissionRules>,
) -> Option<PermissionRules> {
    config.rules_for(name).or(builtin)
}

fn text(
    config: &SwitchboardConfig,
    name: &str,
    builtin: Option<PermissionRules>,
) -> TextCommand<DiscordContext> {
    let command = TextCommand::new(name);
    match rules(config, name, builtin) {
        Some(r) => command.permissions(r),
        None => command,
    }
}

// ---------------------------------------------------------------------------
// Prefix commands
// ---------------------------------------------------------------------------

fn register_text_commands(board: &Board, config: &SwitchboardConfig) -> Result<()> {
    let commands = [
        text(config, "ping", None).handler_fn(|conn, msg, _args| async move {
            conn.say(msg.channel_id, "pong").await
        }),
        text(config, "greet", None).handler_fn(|conn, msg, args| async move {
            let who = if args.is_empty() { msg.author.name.clone() } else { args.join(" ") };
            conn.say(msg.channel_id, format!("Hello, {who}!")).await
        }),
        text(
            config,
            "announce",
            Some(PermissionRules::new().require_any(Permissions::MANAGE_GUILD)),
        )
        .handler_fn(|conn, msg, args| async move {
            if args.is_empty() {
                return conn.say(msg.channel_id, "Usage: announce <text>").await;
            }
            conn.say(msg.channel_id, format!("📣 {}", args.join(" "))).await
        }),
    ];
    for command in commands {
        let name = command.name().to_string();
        ensure!(board.register_text(command), "text command '{name}' was rejected");
    }

    let mut names = board.registry().text_commands();
    names.push("help".to_string());
    names.sort();

    let help = text(config, "help", None).handler_fn(move |conn, msg, _args| {
        let reply = help_reply(&msg.content, &names);
        async move { conn.say(msg.channel_id, reply).await }
    });
    ensure!(board.register_text(help), "text command 'help' was rejected");
    Ok(())
}

/// The command listing, spelled with the prefix the invoker typed so it stays
/// current after `set_prefix`.
fn help_reply(content: &str, names: &[String]) -> String {
    let prefix = content
        .split_whitespace()
        .next()
        .and_then(|token| token.strip_suffix("help"))
        .unwrap_or_default();
    let listing = names
        .iter()
        .map(|n| format!("`{prefix}{n}`"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Commands: {listing}")
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

fn register_interactions(
    board: &Board,
    config: &SwitchboardConfig,
    dev_guild: Option<GuildId>,
) -> Result<()> {
    let declarative = [
        Interaction::command(CommandData::slash("ping", "Check that the bot is alive"))
            .on_slash(|conn, interaction, _options| async move {
                conn.respond(&interaction, "pong").await
            }),
        Interaction::command(
            CommandData::slash("greet", "Say hello")
                .option("who", "Who to greet", OptionType::User, false),
        )
        .on_slash(|conn, interaction, options| async move {
            let who = options
                .iter()
                .find_map(|o| match &o.value {
                    OptionValue::User(id) if o.name == "who" => Some(format!("<@{id}>")),
                    _ => None,
                })
                .unwrap_or_else(|| interaction.user.name.clone());
            conn.respond(&interaction, format!("Hello, {who}!")).await
        }),
        Interaction::command(CommandData::context_menu("Profile", ContextMenuTarget::User))
            .on_context_menu(|conn, interaction, target| async move {
                let reply = match target {
                    Some(Target::User(user)) if user.bot => format!("{} is a bot", user.name),
                    Some(Target::User(user)) => format!("{} (id {})", user.name, user.id),
                    _ => "That member is not in my cache".to_string(),
                };
                conn.respond(&interaction, reply).await
            }),
        Interaction::command(CommandData::context_menu("Quote", ContextMenuTarget::Message))
            .on_context_menu(|conn, interaction, target| async move {
                let reply = match target {
                    Some(Target::Message(m)) => format!("> {}\n-- {}", m.content, m.author.name),
                    _ => "I can't see that message".to_string(),
                };
                conn.respond(&interaction, reply).await
            }),
    ];

    for command in declarative {
        let id = command.id().to_string();
        let command = match rules(config, &id, None) {
            Some(r) => command.permissions(r),
            None => command,
        };
        let command = match dev_guild {
            Some(guild_id) => command.guild(guild_id),
            None => command,
        };
        ensure!(board.register_interaction(command), "interaction '{id}' was rejected");
    }

    let components = [
        Interaction::button("wave").on_component(|conn, interaction| async move {
            conn.respond(&interaction, format!("👋 {}", interaction.user.name)).await
        }),
        Interaction::select_menu("colour").on_component(|conn, interaction| async move {
            let picked = match &interaction.data {
                InteractionData::SelectMenu { values, .. } => values.join(", "),
                _ => String::new(),
            };
            conn.respond(&interaction, format!("You picked: {picked}")).await
        }),
    ];
    for command in components {
        let id = command.id().to_string();
        let command = match rules(config, &id, None) {
            Some(r) => command.permissions(r),
            None => command,
        };
        ensure!(board.register_interaction(command), "interaction '{id}' was rejected");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_config::{apply_all_defaults, CommandRulesConfig};
    use switchboard_core::{InteractionKind, RoleId};

    fn config() -> SwitchboardConfig {
        apply_all_defaults(SwitchboardConfig::default())
    }

    #[test]
    fn registers_the_full_command_set() {
        let board = build(&config()).unwrap();
        assert_eq!(board.prefix(), "!");
        assert_eq!(
            board.registry().text_commands(),
            vec!["announce", "greet", "help", "ping"]
        );
        let interactions = board.registry().interaction_commands();
        assert_eq!(
            interactions,
            vec![
                ("Profile".to_string(), InteractionKind::ContextMenu),
                ("Quote".to_string(), InteractionKind::ContextMenu),
                ("colour".to_string(), InteractionKind::SelectMenu),
                ("greet".to_string(), InteractionKind::Slash),
                ("ping".to_string(), InteractionKind::Slash),
                ("wave".to_string(), InteractionKind::Button),
            ]
        );
        assert_eq!(board.outbound().pending(), (4, 0));
    }

    #[test]
    fn dev_guild_scopes_structured_commands() {
        let mut config = config();
        config.discord.dev_guild_id = Some(77);
        let board = build(&config).unwrap();
        assert_eq!(board.outbound().pending(), (0, 4));
        let ping = board.registry().lookup_interaction("ping").unwrap();
        assert_eq!(ping.guild_id, Some(GuildId::new(77)));
    }

    #[test]
    fn configured_rules_replace_builtin_ones() {
        let board = build(&config()).unwrap();
        let announce = board.registry().lookup_text("announce").unwrap();
        assert_eq!(
            announce.permissions,
            Some(PermissionRules::new().require_any(Permissions::MANAGE_GUILD))
        );

        let mut config = config();
        config.commands.insert(
            "announce".into(),
            CommandRulesConfig { allow_roles: vec![5], ..Default::default() },
        );
        let board = build(&config).unwrap();
        let announce = board.registry().lookup_text("announce").unwrap();
        assert_eq!(announce.permissions, Some(PermissionRules::new().allow(RoleId::new(5))));
    }

    #[test]
    fn help_lists_commands_with_the_prefix_in_use() {
        let board = build(&config()).unwrap();
        let names = board.registry().text_commands();
        assert_eq!(
            help_reply("!help", &names),
            "Commands: `!announce`, `!greet`, `!help`, `!ping`"
        );

        board.set_prefix("$$").unwrap();
        assert!(board.registry().lookup_text("help").is_some());
        assert_eq!(
            help_reply("$$help extra words", &names),
            "Commands: `$$announce`, `$$greet`, `$$help`, `$$ping`"
        );
    }

    #[test]
    fn invalid_prefix_fails_the_build() {
        let mut config = config();
        config.prefix = Some("two words".into());
        assert!(build(&config).is_err());
    }
}
