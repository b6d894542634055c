//! Access-control gateway
//!
//! Runs ahead of every matched route: resolves the caller's session and
//! role, then applies the redirect policy. The policy itself is a pure
//! function in [`policy`]; [`middleware`] wires it into axum.

pub mod middleware;
pub mod policy;
pub mod session;

pub use middleware::{access_control, SessionUser};
pub use policy::RouteDecision;
pub use session::{SessionClaims, SessionVerifier};
