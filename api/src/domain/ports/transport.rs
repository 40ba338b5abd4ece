//! Message transport port
//!
//! Delivers one message to one address. Failures are ordinary return values;
//! implementations must be safe to call concurrently.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::TransportError;

/// A single outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Port trait for sending messages (email)
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Check the transport can be reached at all before a fan-out starts.
    /// An error here is a total outage.
    async fn ensure_available(&self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Send one message
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}
