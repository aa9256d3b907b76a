//! `switchboard commands`: list what the bot registers and under which rules.

use std::path::Path;

use anyhow::Result;

use switchboard_config::load_and_prepare;
use switchboard_core::PermissionRules;

use crate::bot;
use crate::terminal_output::render_table;

pub async fn run(path: &Path) -> Result<()> {
    let config = load_and_prepare(path).await?;
    let board = bot::build(&config)?;
    let registry = board.registry();

    let mut rows = Vec::new();
    for name in registry.text_commands() {
        let Some(entry) = registry.lookup_text(&name) else { continue };
        rows.push(vec![
            format!("{}{name}", board.prefix()),
            "text".to_string(),
            "-".to_string(),
            describe_rules(entry.permissions.as_ref()),
        ]);
    }
    for (id, kind) in registry.interaction_commands() {
        let Some(entry) = registry.lookup_interaction(&id) else { continue };
        let scope = match (kind.is_declarative(), entry.guild_id) {
            (false, _) => "-".to_string(),
            (true, Some(guild_id)) => format!("guild {guild_id}"),
            (true, None) => "global".to_string(),
        };
        rows.push(vec![id, kind.to_string(), scope, describe_rules(entry.permissions.as_ref())]);
    }

    print!("{}", render_table(&["COMMAND", "KIND", "SCOPE", "RULES"], &rows));
    Ok(())
}

fn describe_rules(rules: Option<&PermissionRules>) -> String {
    let Some(rules) = rules.filter(|r| !r.is_unrestricted()) else {
        return "anyone".to_string();
    };
    let join = |ids: Vec<String>| ids.join(",");
    let mut parts = Vec::new();
    if !rules.flags.is_empty() {
        parts.push(format!("any of {}", rules.flags.names().join("|")));
    }
    if !rules.deny_roles.is_empty() {
        parts.push(format!("deny {}", join(rules.deny_roles.iter().map(ToString::to_string).collect())));
    }
    if !rules.allow_roles.is_empty() {
        parts.push(format!("allow {}", join(rules.allow_roles.iter().map(ToString::to_string).collect())));
    }
    parts.join("; ")
}
