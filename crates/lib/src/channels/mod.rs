//! Messaging channel plumbing.
//!
//! Inbound messages come from the provider webhook; replies go out through a
//! [`ReplySender`], implemented for the Evolution-style HTTP API by [`EvolutionClient`].

mod evolution;
mod inbound;
mod sender;

pub use evolution::{EvolutionClient, SendTextRequest};
pub use inbound::InboundMessage;
pub use sender::{ReplySender, SendError};
