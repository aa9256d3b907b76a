//! Handler traits and the fire-and-forget invocation used by the router.

use std::future::Future;

use anyhow::Result;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::warn;

use switchboard_core::{CommandOption, Connection, Interaction, Message, Target};

// ---------------------------------------------------------------------------
// Handler traits
// ---------------------------------------------------------------------------

/// Handles a prefix text command. `args` are the whitespace-separated tokens
/// after the command token.
#[async_trait]
pub trait TextCommandHandler<C: Connection>: Send + Sync {
    async fn handle(&self, conn: C, message: Message, args: Vec<String>) -> Result<()>;
}

/// Handles a slash command with its parsed options.
#[async_trait]
pub trait SlashCommandHandler<C: Connection>: Send + Sync {
    async fn handle(&self, conn: C, interaction: Interaction, options: Vec<CommandOption>)
        -> Result<()>;
}

/// Handles a button press or select-menu interaction.
#[async_trait]
pub trait ComponentHandler<C: Connection>: Send + Sync {
    async fn handle(&self, conn: C, interaction: Interaction) -> Result<()>;
}

/// Handles a context-menu command. `target` is `None` when the user or
/// message it was invoked on is not in the connection's cache.
#[async_trait]
pub trait ContextMenuHandler<C: Connection>: Send + Sync {
    async fn handle(&self, conn: C, interaction: Interaction, target: Option<Target>)
        -> Result<()>;
}

// ---------------------------------------------------------------------------
// Closure adapter
// ---------------------------------------------------------------------------

/// Wraps an async closure so it can be used as any of the handler traits.
/// The closure's arguments select which trait applies.
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

#[async_trait]
impl<C, F, Fut> TextCommandHandler<C> for HandlerFn<F>
where
    C: Connection,
    F: Fn(C, Message, Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn handle(&self, conn: C, message: Message, args: Vec<String>) -> Result<()> {
        (self.f)(conn, message, args).await
    }
}

#[async_trait]
impl<C, F, Fut> SlashCommandHandler<C> for HandlerFn<F>
where
    C: Connection,
    F: Fn(C, Interaction, Vec<CommandOption>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn handle(
        &self,
        conn: C,
        interaction: Interaction,
        options: Vec<CommandOption>,
    ) -> Result<()> {
        (self.f)(conn, interaction, options).await
    }
}

#[async_trait]
impl<C, F, Fut> ComponentHandler<C> for HandlerFn<F>
where
    C: Connection,
    F: Fn(C, Interaction) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn handle(&self, conn: C, interaction: Interaction) -> Result<()> {
        (self.f)(conn, interaction).await
    }
}

#[async_trait]
impl<C, F, Fut> ContextMenuHandler<C> for HandlerFn<F>
where
    C: Connection,
    F: Fn(C, Interaction, Option<Target>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn handle(
        &self,
        conn: C,
        interaction: Interaction,
        target: Option<Target>,
    ) -> Result<()> {
        (self.f)(conn, interaction, target).await
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Why an event did not reach a handler. None of these are surfaced to the
/// invoking user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// The message does not start with the prefix.
    NotACommand,
    /// No handler is registered under the identifier.
    UnknownCommand,
    /// The identifier belongs to a different interaction kind.
    KindMismatch,
    /// The author could not be resolved as a guild member.
    NoMember,
    /// The author is a bot or webhook.
    AutomatedAuthor,
    /// The permission check failed.
    Denied,
}

/// What the router did with one event.
#[derive(Debug)]
pub enum Dispatch {
    /// A handler was spawned. The router never awaits it.
    Fired(JoinHandle<()>),
    Skipped(Skip),
}

impl Dispatch {
    pub fn is_fired(&self) -> bool {
        matches!(self, Self::Fired(_))
    }

    pub fn skip_reason(&self) -> Option<Skip> {
        match self {
            Self::Fired(_) => None,
            Self::Skipped(reason) => Some(*reason),
        }
    }

    /// Wait for the spawned handler, if any. Returns whether one ran.
    pub async fn finished(self) -> bool {
        match self {
            Self::Fired(handle) => {
                if let Err(e) = handle.await {
                    warn!(error = %e, "[Router] Handler task panicked or was cancelled");
                }
                true
            }
            Self::Skipped(_) => false,
        }
    }
}

/// Spawn a handler future without supervising it beyond logging its error.
pub(crate) fn fire<F>(command: String, fut: F) -> Dispatch
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    Dispatch::Fired(tokio::spawn(async move {
        if let Err(e) = fut.await {
            warn!(command = %command, error = %format!("{e:#}"), "[Router] Handler returned error");
        }
    }))
}
