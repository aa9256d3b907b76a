//! Discord transport for Switchboard, built on serenity.
//!
//! Translates gateway events into the platform model, feeds them to a
//! [`Router`](switchboard_commands::Router), and uploads queued structured
//! commands once the gateway reports ready.

pub mod context;
pub mod convert;
pub mod handler;
pub mod intents;

pub use context::DiscordContext;
pub use handler::{cache_settings, run, SwitchboardHandler};
pub use intents::parse_intents;
