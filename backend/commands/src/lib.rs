pub mod detection;
pub mod dispatch;
pub mod outbound;
pub mod permissions;
pub mod registry;
pub mod router;
pub mod switchboard;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use detection::{parse_invocation, TextInvocation};
pub use dispatch::{
    handler_fn, ComponentHandler, ContextMenuHandler, Dispatch, HandlerFn, Skip,
    SlashCommandHandler, TextCommandHandler,
};
pub use outbound::{FlushReport, OutboundQueue};
pub use permissions::{evaluate, Access};
pub use registry::{CommandRegistry, RegisteredInteraction, RegisteredText};
pub use router::{Router, RouterSettings};
pub use switchboard::Switchboard;
pub use switchboard_core::DEFAULT_PREFIX;
pub use types::{InteractionCallback, InteractionCommand, TextCommand};
