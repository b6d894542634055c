//! Redirect policy
//!
//! Pure decision logic over (path, session). Every branch is idempotent:
//! the same inputs always produce the same decision, and nothing here
//! mutates state.

use super::session::SessionClaims;

pub const SIGN_IN_PATH: &str = "/sign-in";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
pub const ERROR_PATH: &str = "/error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

/// Paths reachable without a session: home, the webhook endpoint, and
/// the sign-in/up flows including their sub-paths.
pub fn is_public_route(path: &str) -> bool {
    path == "/"
        || path == "/api/webhook/register"
        || path == "/sign-in"
        || path.starts_with("/sign-in/")
        || path == "/sign-up"
        || path.starts_with("/sign-up/")
}

/// Static assets bypass the gateway entirely. A path whose final segment
/// carries a file extension is treated as an asset request.
pub fn is_static_asset(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .map(|segment| segment.contains('.'))
        .unwrap_or(false)
}

/// Apply the redirect policy, in priority order:
/// 1. no session + non-public path -> sign-in
/// 2. admin on the standard dashboard -> admin dashboard
/// 3. non-admin on any admin-prefixed path -> standard dashboard
/// 4. session on a public path -> role-appropriate dashboard
pub fn decide(path: &str, session: Option<&SessionClaims>) -> RouteDecision {
    let Some(session) = session else {
        if is_public_route(path) {
            return RouteDecision::Allow;
        }
        return RouteDecision::Redirect(SIGN_IN_PATH);
    };

    let admin = session.is_admin();

    if admin && path == DASHBOARD_PATH {
        return RouteDecision::Redirect(ADMIN_DASHBOARD_PATH);
    }

    if !admin && path.starts_with("/admin") {
        return RouteDecision::Redirect(DASHBOARD_PATH);
    }

    if is_public_route(path) {
        return RouteDecision::Redirect(if admin {
            ADMIN_DASHBOARD_PATH
        } else {
            DASHBOARD_PATH
        });
    }

    RouteDecision::Allow
}
