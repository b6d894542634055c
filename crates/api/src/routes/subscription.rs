//! Subscription status route

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    gateway::SessionUser,
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub is_subscribed: bool,
}

/// Report whether the caller's account is on the paid tier.
///
/// The user row is created by the registration webhook; a session whose
/// subject was never provisioned gets a 404 rather than a default.
pub async fn subscription_status(
    State(state): State<AppState>,
    user: SessionUser,
) -> ApiResult<Json<SubscriptionResponse>> {
    let is_subscribed: bool = sqlx::query_scalar("SELECT is_subscribed FROM users WHERE id = $1")
        .bind(&user.user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(SubscriptionResponse { is_subscribed }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_uses_camel_case_wire_name() {
        let json = serde_json::to_value(SubscriptionResponse { is_subscribed: true }).unwrap();
        assert_eq!(json["isSubscribed"], true);
        assert!(json.get("is_subscribed").is_none());
    }
}
