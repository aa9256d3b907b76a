//! Declarative command shapes uploaded to the platform.
//!
//! These are opaque to routing; only the name and kind matter to the
//! registry. The outbound sink serializes them however the platform needs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::PermissionRules;

/// Text-command prefix used until one is configured.
pub const DEFAULT_PREFIX: &str = "!";

/// The four structured interaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Slash,
    ContextMenu,
    Button,
    SelectMenu,
}

impl InteractionKind {
    /// Slash commands and context menus have a shape the platform must know
    /// about; components are addressed by custom id only.
    pub fn is_declarative(self) -> bool {
        matches!(self, Self::Slash | Self::ContextMenu)
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Slash => "slash",
            Self::ContextMenu => "context-menu",
            Self::Button => "button",
            Self::SelectMenu => "select-menu",
        };
        write!(f, "{s}")
    }
}

/// Which entity a context-menu command appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMenuTarget {
    User,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum CommandType {
    ChatInput,
    ContextMenu(ContextMenuTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    String,
    Integer,
    Number,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Attachment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    #[serde(default)]
    pub required: bool,
}

/// The declarative data of a slash command or context menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandData {
    pub name: String,
    /// Empty for context menus.
    #[serde(default)]
    pub description: String,
    pub command_type: CommandType,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

impl CommandData {
    pub fn slash(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            command_type: CommandType::ChatInput,
            options: Vec::new(),
        }
    }

    pub fn context_menu(name: impl Into<String>, target: ContextMenuTarget) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            command_type: CommandType::ContextMenu(target),
            options: Vec::new(),
        }
    }

    pub fn option(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        option_type: OptionType,
        required: bool,
    ) -> Self {
        self.options.push(OptionSpec {
            name: name.into(),
            description: description.into(),
            option_type,
            required,
        });
        self
    }

    pub fn interaction_kind(&self) -> InteractionKind {
        match self.command_type {
            CommandType::ChatInput => InteractionKind::Slash,
            CommandType::ContextMenu(_) => InteractionKind::ContextMenu,
        }
    }
}

/// A guild-scoped registration: the command shape plus its rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildCommand {
    pub data: CommandData,
    pub permissions: Option<PermissionRules>,
}
