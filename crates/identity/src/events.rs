//! Typed webhook event schema
//!
//! Identity-provider events arrive as a JSON envelope of the form
//! `{"type": "user.created", "data": {...}}`. The payload is validated
//! into a tagged variant at the boundary; handlers never poke at raw
//! JSON.

use serde::Deserialize;

use crate::error::{IdentityError, IdentityResult};

/// Raw event envelope. The `data` shape depends on `type`, so it is
/// parsed in a second step once the type is known.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    data: serde_json::Value,
}

/// One entry of the `email_addresses` list on a `user.created` event.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub id: String,
    pub email_address: String,
}

/// Payload of a `user.created` event.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreated {
    /// Identity-provider subject id, used as our primary key.
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
}

impl UserCreated {
    /// Resolve the canonical email for the new user: the address whose id
    /// matches the primary pointer, falling back to the first address in
    /// the list when the pointer matches nothing.
    pub fn primary_email(&self) -> IdentityResult<&str> {
        self.primary_email_address_id
            .as_deref()
            .and_then(|primary_id| {
                self.email_addresses
                    .iter()
                    .find(|email| email.id == primary_id)
            })
            .or_else(|| self.email_addresses.first())
            .map(|email| email.email_address.as_str())
            .ok_or(IdentityError::NoEmailAddress)
    }
}

/// A verified, parsed identity-provider event.
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    UserCreated(UserCreated),
    /// Any event type we do not handle. Acknowledged without action so
    /// the provider does not retry.
    Unsupported(String),
}

impl WebhookEvent {
    pub fn from_payload(payload: &str) -> IdentityResult<Self> {
        let envelope: Envelope = serde_json::from_str(payload)
            .map_err(|e| IdentityError::Payload(e.to_string()))?;

        match envelope.event_type.as_str() {
            "user.created" => {
                let data: UserCreated = serde_json::from_value(envelope.data)
                    .map_err(|e| IdentityError::Payload(e.to_string()))?;
                Ok(Self::UserCreated(data))
            }
            other => Ok(Self::Unsupported(other.to_string())),
        }
    }
}
