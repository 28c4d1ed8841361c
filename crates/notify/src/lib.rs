//! Notification Channels
//!
//! Delivers alert text to a fixed destination over email, webhook or SMS.
//! Channels format an [`Envelope`] and hand it to an injected [`Outbox`],
//! which performs the actual delivery (structured log, in-memory capture).

mod channel;
mod outbox;

pub use channel::{ChannelConfig, ChannelKind, EmailChannel, NotificationChannel, SmsChannel, WebhookChannel};
pub use outbox::{Envelope, LogOutbox, MemoryOutbox, Outbox};

use thiserror::Error;

/// Notification delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Destination refused the message
    #[error("{channel} delivery to {destination} rejected: {reason}")]
    Rejected {
        channel: ChannelKind,
        destination: String,
        reason: String,
    },

    /// Outbox could not accept the message
    #[error("Outbox unavailable: {0}")]
    Unavailable(String),
}
