//! Identity-provider webhook route
//!
//! The provider delivers signed events to `/api/webhook/register`. The
//! body must be read raw so the signature is checked over the exact
//! bytes on the wire, before any JSON parsing.

use axum::{extract::State, http::HeaderMap, response::IntoResponse};
use taskboard_identity::{SvixHeaders, WebhookEvent};

use crate::{error::ApiResult, state::AppState};

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Verify and apply a registration event.
///
/// Unsupported event types are acknowledged with 200 so the provider
/// does not retry them.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<impl IntoResponse> {
    let svix = SvixHeaders::from_parts(
        header(&headers, "svix-id"),
        header(&headers, "svix-timestamp"),
        header(&headers, "svix-signature"),
    )?;

    state.webhooks.verify(&svix, &body)?;

    match WebhookEvent::from_payload(&body)? {
        WebhookEvent::UserCreated(event) => {
            state.provisioner.provision(&event).await?;
        }
        WebhookEvent::Unsupported(event_type) => {
            tracing::info!(event_type = %event_type, "Ignoring unsupported webhook event");
        }
    }

    Ok("Webhook received successfully")
}
