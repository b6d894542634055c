//! Application state

use sqlx::PgPool;
use taskboard_identity::{UserProvisioner, WebhookVerifier};

use crate::{config::Config, gateway::SessionVerifier};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub sessions: SessionVerifier,
    pub webhooks: WebhookVerifier,
    pub provisioner: UserProvisioner,
}

impl AppState {
    /// Build state from config. Fails when the webhook signing secret is
    /// unusable, which is a startup error rather than a request error.
    pub fn new(pool: PgPool, config: Config) -> anyhow::Result<Self> {
        let sessions = SessionVerifier::new(&config.session_jwt_secret);
        let webhooks = WebhookVerifier::new(&config.webhook_secret)?;
        let provisioner = UserProvisioner::new(pool.clone());

        Ok(Self {
            pool,
            config,
            sessions,
            webhooks,
            provisioner,
        })
    }
}
