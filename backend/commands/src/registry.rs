//! Command registry: two independent namespaces, text commands and
//! interaction commands, keyed by identifier.
//!
//! Identifiers are unique per namespace. A second registration under the same
//! identifier is rejected and the first stays active.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use switchboard_core::{
    CommandData, Connection, GuildId, InteractionKind, PermissionRules, SwitchboardError,
};

use crate::dispatch::TextCommandHandler;
use crate::types::{InteractionCallback, InteractionCommand, TextCommand};

/// A validated text command.
pub struct RegisteredText<C: Connection> {
    pub name: String,
    pub permissions: Option<PermissionRules>,
    pub handler: Arc<dyn TextCommandHandler<C>>,
}

/// A validated interaction command.
pub struct RegisteredInteraction<C: Connection> {
    pub id: String,
    pub kind: InteractionKind,
    pub data: Option<CommandData>,
    pub guild_id: Option<GuildId>,
    pub permissions: Option<PermissionRules>,
    pub callback: InteractionCallback<C>,
}

impl<C: Connection> fmt::Debug for RegisteredText<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredText")
            .field("name", &self.name)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

impl<C: Connection> fmt::Debug for RegisteredInteraction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredInteraction")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("guild_id", &self.guild_id)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

pub struct CommandRegistry<C: Connection> {
    text: RwLock<HashMap<String, Arc<RegisteredText<C>>>>,
    interactions: RwLock<HashMap<String, Arc<RegisteredInteraction<C>>>>,
}

impl<C: Connection> CommandRegistry<C> {
    pub fn new() -> Self {
        Self {
            text: RwLock::new(HashMap::new()),
            interactions: RwLock::new(HashMap::new()),
        }
    }

    /// Validate and insert a text command.
    pub fn insert_text(
        &self,
        def: TextCommand<C>,
    ) -> Result<Arc<RegisteredText<C>>, SwitchboardError> {
        let TextCommand { name, permissions, handler } = def;
        let Some(handler) = handler else {
            return Err(SwitchboardError::MissingCallback(name));
        };

        let mut text = self.text.write();
        match text.entry(name) {
            Entry::Occupied(e) => Err(SwitchboardError::DuplicateCommand {
                namespace: "text",
                id: e.key().clone(),
            }),
            Entry::Vacant(e) => {
                let entry = Arc::new(RegisteredText {
                    name: e.key().clone(),
                    permissions,
                    handler,
                });
                e.insert(Arc::clone(&entry));
                Ok(entry)
            }
        }
    }

    /// Validate and insert an interaction command.
    pub fn insert_interaction(
        &self,
        def: InteractionCommand<C>,
    ) -> Result<Arc<RegisteredInteraction<C>>, SwitchboardError> {
        let InteractionCommand { id, kind, data, guild_id, permissions, callback } = def;
        let Some(callback) = callback else {
            return Err(SwitchboardError::MissingCallback(id));
        };
        if !callback.accepts(kind) {
            return Err(SwitchboardError::CallbackMismatch {
                id,
                declared: kind.to_string(),
                callback: callback.label().to_string(),
            });
        }

        let mut interactions = self.interactions.write();
        match interactions.entry(id) {
            Entry::Occupied(e) => Err(SwitchboardError::DuplicateCommand {
                namespace: "interaction",
                id: e.key().clone(),
            }),
            Entry::Vacant(e) => {
                let entry = Arc::new(RegisteredInteraction {
                    id: e.key().clone(),
                    kind,
                    data,
                    guild_id,
                    permissions,
                    callback,
                });
                e.insert(Arc::clone(&entry));
                Ok(entry)
            }
        }
    }

    pub fn lookup_text(&self, name: &str) -> Option<Arc<RegisteredText<C>>> {
        self.text.read().get(name).cloned()
    }

    pub fn lookup_interaction(&self, id: &str) -> Option<Arc<RegisteredInteraction<C>>> {
        self.interactions.read().get(id).cloned()
    }

    /// Registered text command names, sorted.
    pub fn text_commands(&self) -> Vec<String> {
        let mut names: Vec<String> = self.text.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered interaction identifiers with their kinds, sorted by id.
    pub fn interaction_commands(&self) -> Vec<(String, InteractionKind)> {
        let mut ids: Vec<(String, InteractionKind)> = self
            .interactions
            .read()
            .values()
            .map(|e| (e.id.clone(), e.kind))
            .collect();
        ids.sort_by(|a, b| a.0.cmp(&b.0));
        ids
    }
}

impl<C: Connection> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
