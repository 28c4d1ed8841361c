//! Delivery Sinks

use crate::channel::ChannelKind;
use crate::DeliveryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// One message addressed to one destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub kind: ChannelKind,
    pub destination: String,
    pub body: String,
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ChannelKind::Email => write!(f, "[EMAIL a {}] {}", self.destination, self.body),
            ChannelKind::Webhook => write!(f, "[WEBHOOK {}] {}", self.destination, self.body),
            ChannelKind::Sms => write!(f, "[SMS a {}] {}", self.destination, self.body),
        }
    }
}

/// Sink that performs delivery of formatted envelopes
pub trait Outbox: Send + Sync {
    fn deliver(&self, envelope: &Envelope) -> Result<(), DeliveryError>;
}

/// Delivers envelopes as structured `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOutbox;

impl Outbox for LogOutbox {
    fn deliver(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        info!(
            target: "notify::delivery",
            channel = %envelope.kind,
            destination = %envelope.destination,
            "{}",
            envelope
        );
        Ok(())
    }
}

/// Captures envelopes in delivery order
#[derive(Debug, Default)]
pub struct MemoryOutbox {
    delivered: Mutex<Vec<Envelope>>,
}

impl MemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all envelopes delivered so far
    pub fn delivered(&self) -> Vec<Envelope> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.delivered.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return everything delivered so far
    pub fn drain(&self) -> Vec<Envelope> {
        std::mem::take(&mut *self.delivered.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Outbox for MemoryOutbox {
    fn deliver(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(envelope.clone());
        Ok(())
    }
}
