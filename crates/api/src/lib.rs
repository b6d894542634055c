// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Taskboard API Library
//!
//! This crate contains the HTTP server components for the taskboard
//! service: configuration, the access-control gateway, and the todo,
//! subscription, and webhook routes.

pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
