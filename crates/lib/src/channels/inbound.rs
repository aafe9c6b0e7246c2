//! Inbound message from the provider webhook: delivered to the gateway for an automatic reply.

/// An incoming chat message. Either field may be absent in the provider payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Sender address (`remoteJid`), used as the reply destination.
    pub conversation_id: Option<String>,
    pub text: Option<String>,
}
