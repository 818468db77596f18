// SPDX-License-Identifier: MIT

//! User directory routes.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::models::user::UserSummary;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", get(list_users))
}

#[derive(Serialize)]
struct UserListResponse {
    success: bool,
    data: Vec<UserSummary>,
}

/// List all registered users as public profile summaries.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<UserListResponse>> {
    let users = state.db.list_users().await?;
    let summaries: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();

    Ok(Json(UserListResponse {
        success: true,
        data: summaries,
    }))
}
