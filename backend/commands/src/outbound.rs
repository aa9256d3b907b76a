//! Pending outbound registrations.
//!
//! Structured-command definitions are queued here as they are registered and
//! handed to the platform's [`CommandSink`] in one batch when the connection
//! signals ready. The queue flushes at most once.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use switchboard_core::{
    CommandData, CommandSink, GuildCommand, GuildId, PermissionRules, SwitchboardError,
};

/// Counts from a flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Global commands uploaded.
    pub global: usize,
    /// Guild-scoped commands uploaded, across all guilds.
    pub guild: usize,
    /// Sink calls that returned an error.
    pub failed_batches: usize,
}

#[derive(Default)]
struct Pending {
    global: Vec<CommandData>,
    guilds: BTreeMap<GuildId, Vec<GuildCommand>>,
    flushed: bool,
}

#[derive(Default)]
pub struct OutboundQueue {
    pending: Mutex<Pending>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_global(&self, data: CommandData) {
        let mut pending = self.pending.lock();
        if pending.flushed {
            warn!(command = %data.name, "[Outbound] Queued after ready; it will not be uploaded");
        }
        debug!(command = %data.name, "[Outbound] Queued global command");
        pending.global.push(data);
    }

    pub fn queue_guild(
        &self,
        guild_id: GuildId,
        data: CommandData,
        permissions: Option<PermissionRules>,
    ) {
        let mut pending = self.pending.lock();
        if pending.flushed {
            warn!(command = %data.name, guild = %guild_id, "[Outbound] Queued after ready; it will not be uploaded");
        }
        debug!(command = %data.name, guild = %guild_id, "[Outbound] Queued guild command");
        pending
            .guilds
            .entry(guild_id)
            .or_default()
            .push(GuildCommand { data, permissions });
    }

    /// Number of queued global commands and of queued guild commands.
    pub fn pending(&self) -> (usize, usize) {
        let pending = self.pending.lock();
        let guild = pending.guilds.values().map(Vec::len).sum();
        (pending.global.len(), guild)
    }

    pub fn is_flushed(&self) -> bool {
        self.pending.lock().flushed
    }

    /// Upload everything queued so far. Only the first call does any work.
    ///
    /// One sink call is made for the global batch (skipped when empty) and one
    /// per guild. A failing batch is logged and does not stop the others.
    pub async fn flush(&self, sink: &dyn CommandSink) -> FlushReport {
        let (global, guilds) = {
            let mut pending = self.pending.lock();
            if pending.flushed {
                debug!("[Outbound] Already flushed; ignoring");
                return FlushReport::default();
            }
            pending.flushed = true;
            (
                std::mem::take(&mut pending.global),
                std::mem::take(&mut pending.guilds),
            )
        };

        let mut report = FlushReport::default();

        if !global.is_empty() {
            let count = global.len();
            match sink.register_global(global).await {
                Ok(()) => {
                    info!(count, "[Outbound] Registered global commands");
                    report.global = count;
                }
                Err(e) => {
                    let err = SwitchboardError::SinkFailed {
                        scope: "global".into(),
                        message: format!("{e:#}"),
                    };
                    warn!(error = %err, "[Outbound] Batch failed");
                    report.failed_batches += 1;
                }
            }
        }

        for (guild_id, commands) in guilds {
            let count = commands.len();
            match sink.register_guild(guild_id, commands).await {
                Ok(()) => {
                    info!(count, guild = %guild_id, "[Outbound] Registered guild commands");
                    report.guild += count;
                }
                Err(e) => {
                    let err = SwitchboardError::SinkFailed {
                        scope: format!("guild {guild_id}"),
                        message: format!("{e:#}"),
                    };
                    warn!(error = %err, "[Outbound] Batch failed");
                    report.failed_batches += 1;
                }
            }
        }

        report
    }
}
