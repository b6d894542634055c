//! Todo listing and mutation routes
//!
//! All operations are scoped to the authenticated owner. Mutations bind
//! `owner_id` alongside the todo id, so a todo that exists but belongs
//! to someone else is indistinguishable from one that does not exist.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    gateway::SessionUser,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListTodosQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
    pub current_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub completed: bool,
}

/// List the owner's todos, newest first, filtered by a case-insensitive
/// title substring and cut into fixed-size pages.
///
/// A page past the end comes back as an empty slice with the requested
/// page echoed, which is exactly what offset/limit produces.
pub async fn list_todos(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<ListTodosQuery>,
) -> ApiResult<Json<TodoListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let search = escape_like(&query.search.unwrap_or_default());
    let page_size = state.config.page_size;
    let offset = page_offset(page, page_size);

    let matching: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM todos WHERE owner_id = $1 AND title ILIKE '%' || $2 || '%'",
    )
    .bind(&user.user_id)
    .bind(&search)
    .fetch_one(&state.pool)
    .await?;

    let todos: Vec<Todo> = sqlx::query_as(
        r#"
        SELECT id, owner_id, title, completed, created_at
        FROM todos
        WHERE owner_id = $1 AND title ILIKE '%' || $2 || '%'
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(&user.user_id)
    .bind(&search)
    .bind(page_size)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(TodoListResponse {
        todos,
        current_page: page,
        total_pages: total_pages(matching, page_size),
    }))
}

/// Create a todo for the caller.
///
/// The free-tier cap is enforced here, not just in the UI: once a
/// non-subscribed owner holds the limit, further creates are refused.
pub async fn create_todo(
    State(state): State<AppState>,
    user: SessionUser,
    Json(body): Json<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }

    // The user row is locked for the whole check-then-insert so two
    // concurrent creates for the same owner cannot both pass the cap.
    let mut tx = state.pool.begin().await?;

    let is_subscribed: bool =
        sqlx::query_scalar("SELECT is_subscribed FROM users WHERE id = $1 FOR UPDATE")
            .bind(&user.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ApiError::NotFound)?;

    if !is_subscribed {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE owner_id = $1")
            .bind(&user.user_id)
            .fetch_one(&mut *tx)
            .await?;

        if count >= state.config.free_tier_todo_limit {
            return Err(ApiError::Forbidden(
                "Free todo limit reached. Subscribe to add more.".to_string(),
            ));
        }
    }

    let todo: Todo = sqlx::query_as(
        r#"
        INSERT INTO todos (id, owner_id, title, completed)
        VALUES ($1, $2, $3, FALSE)
        RETURNING id, owner_id, title, completed, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.user_id)
    .bind(title)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(owner_id = %user.user_id, todo_id = %todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Update the completed flag of an owned todo.
pub async fn update_todo(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTodoRequest>,
) -> ApiResult<Json<Todo>> {
    let todo: Todo = sqlx::query_as(
        r#"
        UPDATE todos SET completed = $1
        WHERE id = $2 AND owner_id = $3
        RETURNING id, owner_id, title, completed, created_at
        "#,
    )
    .bind(body.completed)
    .bind(id)
    .bind(&user.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(todo))
}

/// Delete an owned todo.
pub async fn delete_todo(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(&user.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(owner_id = %user.user_id, todo_id = %id, "Todo deleted");

    Ok(StatusCode::OK)
}

fn total_pages(matching: i64, page_size: i64) -> i64 {
    if matching == 0 {
        0
    } else {
        (matching + page_size - 1) / page_size
    }
}

// Saturates so an absurd page value stays a valid (empty) page instead
// of overflowing the offset.
fn page_offset(page: i64, page_size: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Escape LIKE metacharacters so the search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
