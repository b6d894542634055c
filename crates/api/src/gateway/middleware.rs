//! Gateway middleware for axum

use axum::{
    extract::{FromRequestParts, Request, State},
    http::header::{AUTHORIZATION, COOKIE},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::policy::{self, RouteDecision, ERROR_PATH};
use super::session::{SessionClaims, SESSION_COOKIE};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, inserted into request extensions for handlers.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl From<SessionClaims> for SessionUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Extractor over the extension the gateway inserts. The gateway fronts
/// every route, so a missing caller means the route was reached without
/// passing through it; that fails as 401, not a server error.
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

/// Extract the session token from the `__session` cookie.
fn extract_token_from_cookie(request: &Request) -> Option<String> {
    request
        .headers()
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            for cookie in cookies.split(';') {
                let cookie = cookie.trim();
                if let Some(token) = cookie.strip_prefix(SESSION_COOKIE) {
                    if let Some(token) = token.strip_prefix('=') {
                        return Some(token.to_string());
                    }
                }
            }
            None
        })
}

/// Extract the session token from the Authorization header or, failing
/// that, the session cookie.
fn extract_session_token(request: &Request) -> Option<String> {
    if let Some(header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    extract_token_from_cookie(request)
}

/// Gateway middleware: resolves the session, applies the redirect
/// policy, and makes the caller available to handlers on allow.
///
/// A token that fails verification redirects to the error page rather
/// than failing the request open.
pub async fn access_control(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if policy::is_static_asset(&path) {
        return next.run(request).await;
    }

    let session = match extract_session_token(&request) {
        Some(token) => match state.sessions.verify(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Session verification failed");
                return Redirect::temporary(ERROR_PATH).into_response();
            }
        },
        None => None,
    };

    match policy::decide(&path, session.as_ref()) {
        RouteDecision::Redirect(target) => {
            tracing::debug!(path = %path, target = %target, "Gateway redirect");
            Redirect::temporary(target).into_response()
        }
        RouteDecision::Allow => {
            if let Some(claims) = session {
                request.extensions_mut().insert(SessionUser::from(claims));
            }
            next.run(request).await
        }
    }
}
