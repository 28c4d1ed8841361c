//! Channel Implementations

use crate::outbox::{Envelope, Outbox};
use crate::DeliveryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Transport used by a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Webhook,
    Sms,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelKind::Email => "email",
            ChannelKind::Webhook => "webhook",
            ChannelKind::Sms => "sms",
        };
        f.write_str(name)
    }
}

/// Capability to deliver text to one fixed destination.
///
/// Delivery is fire-and-forget: no acknowledgement and no retry. An error
/// only reports that the message did not leave this process.
pub trait NotificationChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    /// Address, URL or phone number captured at construction
    fn destination(&self) -> &str;

    fn send(&self, message: &str) -> Result<(), DeliveryError>;
}

/// Destination plus the outbox that carries messages to it
struct Route {
    kind: ChannelKind,
    destination: String,
    outbox: Arc<dyn Outbox>,
}

impl Route {
    fn new(kind: ChannelKind, destination: String, outbox: Arc<dyn Outbox>) -> Self {
        Self {
            kind,
            destination,
            outbox,
        }
    }

    fn send(&self, message: &str) -> Result<(), DeliveryError> {
        let envelope = Envelope {
            kind: self.kind,
            destination: self.destination.clone(),
            body: message.to_string(),
        };
        self.outbox.deliver(&envelope)?;
        debug!(channel = %self.kind, destination = %self.destination, "Message handed to outbox");
        Ok(())
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("kind", &self.kind)
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

/// Email notification channel
#[derive(Debug)]
pub struct EmailChannel {
    route: Route,
}

impl EmailChannel {
    /// Create a channel for the given recipient (not validated)
    pub fn new(recipient: impl Into<String>, outbox: Arc<dyn Outbox>) -> Self {
        Self {
            route: Route::new(ChannelKind::Email, recipient.into(), outbox),
        }
    }
}

impl NotificationChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    fn destination(&self) -> &str {
        &self.route.destination
    }

    fn send(&self, message: &str) -> Result<(), DeliveryError> {
        self.route.send(message)
    }
}

/// Webhook notification channel
#[derive(Debug)]
pub struct WebhookChannel {
    route: Route,
}

impl WebhookChannel {
    /// Create a channel for the given URL (not validated)
    pub fn new(url: impl Into<String>, outbox: Arc<dyn Outbox>) -> Self {
        Self {
            route: Route::new(ChannelKind::Webhook, url.into(), outbox),
        }
    }
}

impl NotificationChannel for WebhookChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Webhook
    }

    fn destination(&self) -> &str {
        &self.route.destination
    }

    fn send(&self, message: &str) -> Result<(), DeliveryError> {
        self.route.send(message)
    }
}

/// SMS notification channel
#[derive(Debug)]
pub struct SmsChannel {
    route: Route,
}

impl SmsChannel {
    /// Create a channel for the given phone number (not validated)
    pub fn new(phone: impl Into<String>, outbox: Arc<dyn Outbox>) -> Self {
        Self {
            route: Route::new(ChannelKind::Sms, phone.into(), outbox),
        }
    }
}

impl NotificationChannel for SmsChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    fn destination(&self) -> &str {
        &self.route.destination
    }

    fn send(&self, message: &str) -> Result<(), DeliveryError> {
        self.route.send(message)
    }
}

/// Channel description, as found in configuration files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelConfig {
    Email { to: String },
    Webhook { url: String },
    Sms { phone: String },
}

impl ChannelConfig {
    /// Build the described channel on top of `outbox`
    pub fn build(&self, outbox: Arc<dyn Outbox>) -> Arc<dyn NotificationChannel> {
        match self {
            ChannelConfig::Email { to } => Arc::new(EmailChannel::new(to.clone(), outbox)),
            ChannelConfig::Webhook { url } => Arc::new(WebhookChannel::new(url.clone(), outbox)),
            ChannelConfig::Sms { phone } => Arc::new(SmsChannel::new(phone.clone(), outbox)),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig::Email {
            to: "default@email.com".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbox::MemoryOutbox;

    struct RefusingOutbox;

    impl Outbox for RefusingOutbox {
        fn deliver(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
            Err(DeliveryError::Rejected {
                channel: envelope.kind,
                destination: envelope.destination.clone(),
                reason: "mailbox full".to_string(),
            })
        }
    }

    #[test]
    fn test_channels_address_their_destination() {
        let outbox = Arc::new(MemoryOutbox::new());
        let email = EmailChannel::new("ops@example.com", outbox.clone());
        let webhook = WebhookChannel::new("https://hooks.example.com/a", outbox.clone());
        let sms = SmsChannel::new("+525500000000", outbox.clone());

        email.send("uno").unwrap();
        webhook.send("dos").unwrap();
        sms.send("tres").unwrap();

        let delivered = outbox.delivered();
        assert_eq!(delivered.len(), 3);
        assert_eq!(delivered[0].kind, ChannelKind::Email);
        assert_eq!(delivered[0].destination, "ops@example.com");
        assert_eq!(delivered[1].kind, ChannelKind::Webhook);
        assert_eq!(delivered[1].body, "dos");
        assert_eq!(delivered[2].to_string(), "[SMS a +525500000000] tres");
    }

    #[test]
    fn test_destination_not_validated() {
        let outbox = Arc::new(MemoryOutbox::new());
        let email = EmailChannel::new("not an address", outbox.clone());
        assert_eq!(email.destination(), "not an address");
        assert!(email.send("hola").is_ok());
    }

    #[test]
    fn test_outbox_error_surfaces() {
        let sms = SmsChannel::new("+1", Arc::new(RefusingOutbox));
        let err = sms.send("hola").unwrap_err();
        assert_eq!(
            err.to_string(),
            "sms delivery to +1 rejected: mailbox full"
        );
    }

    #[test]
    fn test_config_build() {
        let config: ChannelConfig =
            serde_json::from_str(r#"{"type":"webhook","url":"https://hooks.example.com/b"}"#).unwrap();
        let channel = config.build(Arc::new(MemoryOutbox::new()));
        assert_eq!(channel.kind(), ChannelKind::Webhook);
        assert_eq!(channel.destination(), "https://hooks.example.com/b");

        assert_eq!(
            ChannelConfig::default(),
            ChannelConfig::Email {
                to: "default@email.com".to_string()
            }
        );
    }
}
