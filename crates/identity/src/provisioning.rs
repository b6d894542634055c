//! User provisioning from identity-provider events

use sqlx::PgPool;

use crate::error::{IdentityError, IdentityResult};
use crate::events::UserCreated;

/// Inserts user records for `user.created` events.
///
/// Provisioning is create-only: a redelivered event hits the uniqueness
/// constraint and surfaces as [`IdentityError::AlreadyProvisioned`]
/// rather than silently succeeding.
#[derive(Clone)]
pub struct UserProvisioner {
    pool: PgPool,
}

impl UserProvisioner {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user row with the event's subject id and resolved
    /// primary email. New users always start unsubscribed.
    pub async fn provision(&self, event: &UserCreated) -> IdentityResult<()> {
        let email = event.primary_email()?;

        let result = sqlx::query(
            "INSERT INTO users (id, email, is_subscribed) VALUES ($1, $2, FALSE)",
        )
        .bind(&event.id)
        .bind(email)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(user_id = %event.id, "Provisioned user from identity webhook");
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::error!(
                    user_id = %event.id,
                    "Duplicate user.created delivery hit uniqueness constraint"
                );
                Err(IdentityError::AlreadyProvisioned(event.id.clone()))
            }
            Err(e) => {
                tracing::error!(user_id = %event.id, error = %e, "Failed to provision user");
                Err(e.into())
            }
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
