//! Handler definitions, before validation by the registry.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;

use switchboard_core::{
    CommandData, CommandOption, Connection, GuildId, Interaction, InteractionKind, Message,
    PermissionRules, Target,
};

use crate::dispatch::{
    handler_fn, ComponentHandler, ContextMenuHandler, SlashCommandHandler, TextCommandHandler,
};

// ---------------------------------------------------------------------------
// Text commands
// ---------------------------------------------------------------------------

/// A prefix text command, e.g. `!ping`.
pub struct TextCommand<C: Connection> {
    pub(crate) name: String,
    pub(crate) permissions: Option<PermissionRules>,
    pub(crate) handler: Option<Arc<dyn TextCommandHandler<C>>>,
}

impl<C: Connection> TextCommand<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), permissions: None, handler: None }
    }

    pub fn permissions(mut self, rules: PermissionRules) -> Self {
        self.permissions = Some(rules);
        self
    }

    pub fn handler(mut self, handler: impl TextCommandHandler<C> + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn handler_fn<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, Message, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.handler(handler_fn(f))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<C: Connection> fmt::Debug for TextCommand<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCommand")
            .field("name", &self.name)
            .field("permissions", &self.permissions)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Interaction commands
// ---------------------------------------------------------------------------

/// The callback of an interaction command, tagged by what it accepts.
/// Buttons and select menus share the component callback.
pub enum InteractionCallback<C: Connection> {
    Slash(Arc<dyn SlashCommandHandler<C>>),
    ContextMenu(Arc<dyn ContextMenuHandler<C>>),
    Component(Arc<dyn ComponentHandler<C>>),
}

impl<C: Connection> InteractionCallback<C> {
    pub fn accepts(&self, kind: InteractionKind) -> bool {
        match self {
            Self::Slash(_) => kind == InteractionKind::Slash,
            Self::ContextMenu(_) => kind == InteractionKind::ContextMenu,
            Self::Component(_) => {
                matches!(kind, InteractionKind::Button | InteractionKind::SelectMenu)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Slash(_) => "slash",
            Self::ContextMenu(_) => "context-menu",
            Self::Component(_) => "component",
        }
    }
}

impl<C: Connection> Clone for InteractionCallback<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Slash(h) => Self::Slash(Arc::clone(h)),
            Self::ContextMenu(h) => Self::ContextMenu(Arc::clone(h)),
            Self::Component(h) => Self::Component(Arc::clone(h)),
        }
    }
}

/// A slash command, context menu, button, or select menu.
///
/// Slash commands and context menus are keyed by command name and carry
/// declarative data for the platform. Buttons and select menus are keyed by
/// the custom id of the element.
pub struct InteractionCommand<C: Connection> {
    pub(crate) id: String,
    pub(crate) kind: InteractionKind,
    pub(crate) data: Option<CommandData>,
    pub(crate) guild_id: Option<GuildId>,
    pub(crate) permissions: Option<PermissionRules>,
    pub(crate) callback: Option<InteractionCallback<C>>,
}

impl<C: Connection> InteractionCommand<C> {
    /// A slash command or context menu, depending on `data.command_type`.
    pub fn command(data: CommandData) -> Self {
        Self {
            id: data.name.clone(),
            kind: data.interaction_kind(),
            data: Some(data),
            guild_id: None,
            permissions: None,
            callback: None,
        }
    }

    pub fn button(custom_id: impl Into<String>) -> Self {
        Self::component(custom_id.into(), InteractionKind::Button)
    }

    pub fn select_menu(custom_id: impl Into<String>) -> Self {
        Self::component(custom_id.into(), InteractionKind::SelectMenu)
    }

    fn component(id: String, kind: InteractionKind) -> Self {
        Self { id, kind, data: None, guild_id: None, permissions: None, callback: None }
    }

    /// Register with the platform for one guild instead of globally.
    pub fn guild(mut self, guild_id: impl Into<GuildId>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    pub fn permissions(mut self, rules: PermissionRules) -> Self {
        self.permissions = Some(rules);
        self
    }

    pub fn callback(mut self, callback: InteractionCallback<C>) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn on_slash<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, Interaction, Vec<CommandOption>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.callback(InteractionCallback::Slash(Arc::new(handler_fn(f))))
    }

    pub fn on_context_menu<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, Interaction, Option<Target>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.callback(InteractionCallback::ContextMenu(Arc::new(handler_fn(f))))
    }

    pub fn on_component<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, Interaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.callback(InteractionCallback::Component(Arc::new(handler_fn(f))))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> InteractionKind {
        self.kind
    }
}

impl<C: Connection> fmt::Debug for InteractionCommand<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionCommand")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("guild_id", &self.guild_id)
            .field("permissions", &self.permissions)
            .field("callback", &self.callback.as_ref().map(InteractionCallback::label))
            .finish()
    }
}
