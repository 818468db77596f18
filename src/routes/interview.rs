// SPDX-License-Identifier: MIT

//! Owner-gated interview session routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::interview::{default_language, Interview, Performance, Scenario, Status};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/interview", post(create_interview).get(list_interviews))
        .route(
            "/api/interview/{id}",
            get(get_interview)
                .put(update_interview)
                .delete(delete_interview),
        )
}

#[derive(Serialize)]
struct InterviewResponse {
    success: bool,
    data: Interview,
}

#[derive(Serialize)]
struct InterviewListResponse {
    success: bool,
    count: usize,
    data: Vec<Interview>,
}

#[derive(Serialize)]
struct DeleteResponse {
    success: bool,
    data: serde_json::Value,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateInterviewPayload {
    scenario: Option<Scenario>,
    meeting_link: Option<String>,
    position: Option<String>,
    company: Option<String>,
    language: Option<String>,
    scheduled_time: Option<DateTime<Utc>>,
}

/// Create a new interview session owned by the caller.
async fn create_interview(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateInterviewPayload>,
) -> Result<(StatusCode, Json<InterviewResponse>)> {
    let (Some(scenario), Some(meeting_link), Some(position), Some(company), Some(scheduled_time)) = (
        payload.scenario,
        payload.meeting_link,
        payload.position,
        payload.company,
        payload.scheduled_time,
    ) else {
        return Err(AppError::BadRequest(
            "Please provide all required fields".to_string(),
        ));
    };

    let interview = Interview {
        id: Uuid::new_v4(),
        user_id: user.id,
        scenario,
        meeting_link,
        position,
        company,
        language: payload.language.unwrap_or_else(default_language),
        status: Status::default(),
        performance: None,
        scheduled_time,
        created_at: Utc::now(),
    };

    state.db.upsert_interview(&interview).await?;

    tracing::info!(
        interview_id = %interview.id,
        user_id = %user.id,
        "Created interview session"
    );

    Ok((
        StatusCode::CREATED,
        Json(InterviewResponse {
            success: true,
            data: interview,
        }),
    ))
}

/// List the caller's interview sessions, most recently scheduled first.
async fn list_interviews(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<InterviewListResponse>> {
    let sessions = state.db.get_interviews_for_user(user.id).await?;

    Ok(Json(InterviewListResponse {
        success: true,
        count: sessions.len(),
        data: sessions,
    }))
}

/// Fetch one interview session, then verify the caller owns it.
///
/// Existence is checked before ownership, so a stranger probing a real ID
/// gets 403 rather than 404.
async fn load_owned(
    state: &AppState,
    id: Uuid,
    caller: Uuid,
    action: &str,
) -> Result<Interview> {
    let interview = state
        .db
        .get_interview(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;

    interview.ensure_owned_by(caller, action)?;
    Ok(interview)
}

/// Get a single interview session.
async fn get_interview(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewResponse>> {
    let interview = load_owned(&state, id, user.id, "access").await?;

    Ok(Json(InterviewResponse {
        success: true,
        data: interview,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateInterviewPayload {
    scenario: Option<Scenario>,
    meeting_link: Option<String>,
    position: Option<String>,
    company: Option<String>,
    language: Option<String>,
    status: Option<Status>,
    performance: Option<Performance>,
    scheduled_time: Option<DateTime<Utc>>,
}

/// Partially update an interview session; absent fields are left unchanged.
async fn update_interview(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInterviewPayload>,
) -> Result<Json<InterviewResponse>> {
    let mut interview = load_owned(&state, id, user.id, "update").await?;

    if let Some(scenario) = payload.scenario {
        interview.scenario = scenario;
    }
    if let Some(meeting_link) = payload.meeting_link {
        interview.meeting_link = meeting_link;
    }
    if let Some(position) = payload.position {
        interview.position = position;
    }
    if let Some(company) = payload.company {
        interview.company = company;
    }
    if let Some(language) = payload.language {
        interview.language = language;
    }
    if let Some(status) = payload.status {
        interview.status = status;
    }
    if let Some(performance) = payload.performance {
        interview.performance = Some(performance);
    }
    if let Some(scheduled_time) = payload.scheduled_time {
        interview.scheduled_time = scheduled_time;
    }

    state.db.upsert_interview(&interview).await?;

    tracing::info!(interview_id = %interview.id, user_id = %user.id, "Updated interview session");

    Ok(Json(InterviewResponse {
        success: true,
        data: interview,
    }))
}

/// Delete an interview session.
async fn delete_interview(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    load_owned(&state, id, user.id, "delete").await?;
    state.db.delete_interview(id).await?;

    tracing::info!(interview_id = %id, user_id = %user.id, "Deleted interview session");

    Ok(Json(DeleteResponse {
        success: true,
        data: serde_json::json!({}),
        message: "Interview deleted successfully".to_string(),
    }))
}
