// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Taskboard Identity Module
//!
//! Handles the identity-provider integration: verifying signed lifecycle
//! webhooks and provisioning user records from them.
//!
//! ## Features
//!
//! - **Webhook Verification**: svix-style HMAC signature checks with a
//!   timestamp tolerance window
//! - **Event Schema**: typed `user.created` payloads; every other event
//!   type is acknowledged without action
//! - **Provisioning**: create-only user inserts keyed by the provider's
//!   subject id

pub mod error;
pub mod events;
pub mod provisioning;
pub mod webhook;

// Error
pub use error::{IdentityError, IdentityResult};

// Events
pub use events::{EmailAddress, UserCreated, WebhookEvent};

// Provisioning
pub use provisioning::UserProvisioner;

// Webhook
pub use webhook::{SvixHeaders, WebhookVerifier, SIGNATURE_TOLERANCE_SECS};
