//! Page routes
//!
//! The real UI is served by the frontend; these handlers exist so the
//! gateway has concrete paths to protect and redirect between, and they
//! return minimal placeholder markup when hit directly.

use axum::response::Html;

pub async fn home() -> Html<&'static str> {
    Html("<h1>Taskboard</h1>")
}

pub async fn dashboard() -> Html<&'static str> {
    Html("<h1>Dashboard</h1>")
}

pub async fn admin_dashboard() -> Html<&'static str> {
    Html("<h1>Admin Dashboard</h1>")
}

pub async fn sign_in() -> Html<&'static str> {
    Html("<h1>Sign in</h1>")
}

pub async fn sign_up() -> Html<&'static str> {
    Html("<h1>Sign up</h1>")
}

pub async fn subscribe() -> Html<&'static str> {
    Html("<h1>Subscribe</h1>")
}

pub async fn error_page() -> Html<&'static str> {
    Html("<h1>Something went wrong</h1>")
}
