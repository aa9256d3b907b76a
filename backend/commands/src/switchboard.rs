//! Registration facade.
//!
//! `Switchboard` owns the registry, the outbound queue and the prefix, and
//! hands out [`Router`]s that share them. Registration is insert-then-forward:
//! a definition reaches the outbound queue only after the registry accepted
//! it, so a duplicate can never produce a second upload.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use switchboard_core::{Connection, SwitchboardError, DEFAULT_PREFIX};

use crate::outbound::OutboundQueue;
use crate::registry::CommandRegistry;
use crate::router::{Router, RouterSettings};
use crate::types::{InteractionCommand, TextCommand};

pub struct Switchboard<C: Connection> {
    registry: Arc<CommandRegistry<C>>,
    outbound: Arc<OutboundQueue>,
    prefix: Arc<RwLock<String>>,
    settings: RouterSettings,
}

impl<C: Connection> Switchboard<C> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(CommandRegistry::new()),
            outbound: Arc::new(OutboundQueue::new()),
            prefix: Arc::new(RwLock::new(DEFAULT_PREFIX.to_string())),
            settings: RouterSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RouterSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register a prefix text command. Returns `false`, after logging why,
    /// if the name is taken or no handler is attached.
    pub fn register_text(&self, def: TextCommand<C>) -> bool {
        match self.registry.insert_text(def) {
            Ok(entry) => {
                info!(command = %entry.name, "[Switchboard] Registered text command");
                true
            }
            Err(e) => {
                warn!(error = %e, "[Switchboard] Rejected text command");
                false
            }
        }
    }

    /// Register an interaction command. Slash commands and context menus are
    /// then queued for upload, scoped to their guild if one was given.
    pub fn register_interaction(&self, def: InteractionCommand<C>) -> bool {
        let entry = match self.registry.insert_interaction(def) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "[Switchboard] Rejected interaction command");
                return false;
            }
        };

        if entry.kind.is_declarative() {
            if let Some(data) = entry.data.clone() {
                match entry.guild_id {
                    Some(guild_id) => {
                        self.outbound.queue_guild(guild_id, data, entry.permissions.clone())
                    }
                    None => self.outbound.queue_global(data),
                }
            }
        }

        info!(command = %entry.id, kind = %entry.kind, "[Switchboard] Registered interaction command");
        true
    }

    /// Replace the text-command prefix. Takes effect for the next message.
    pub fn set_prefix(&self, prefix: impl Into<String>) -> Result<(), SwitchboardError> {
        let prefix = prefix.into();
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(SwitchboardError::InvalidPrefix(prefix));
        }
        info!(prefix = %prefix, "[Switchboard] Prefix changed");
        *self.prefix.write() = prefix;
        Ok(())
    }

    pub fn prefix(&self) -> String {
        self.prefix.read().clone()
    }

    pub fn registry(&self) -> &CommandRegistry<C> {
        &self.registry
    }

    pub fn outbound(&self) -> &OutboundQueue {
        &self.outbound
    }

    /// A router sharing this switchboard's registry, queue and prefix.
    pub fn router(&self) -> Router<C> {
        Router {
            registry: Arc::clone(&self.registry),
            outbound: Arc::clone(&self.outbound),
            prefix: Arc::clone(&self.prefix),
            settings: self.settings,
        }
    }
}

impl<C: Connection> Default for Switchboard<C> {
    fn default() -> Self {
        Self::new()
    }
}
