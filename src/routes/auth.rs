// SPDX-License-Identifier: MIT

//! Authentication and profile routes.

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::error::{AppError, Result};
use crate::middleware::auth::{issue_session_token, CurrentUser};
use crate::models::user::{User, UserResponse};
use crate::services::upload::ResumeFile;
use crate::services::OidcError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/google", post(google_sign_in))
}

/// Routes below require authentication (layered in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", get(logout))
        .route("/api/auth/update-profile", put(update_profile))
        .route("/api/auth/change-password", put(change_password))
}

#[derive(Serialize)]
struct TokenResponse {
    success: bool,
    token: String,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct UserDataResponse {
    success: bool,
    data: UserResponse,
}

#[derive(Serialize)]
struct ProfileUpdateResponse {
    success: bool,
    message: String,
    data: UserResponse,
}

// ─── Registration & Login ────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload {
    full_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
}

/// Register a new local-credential user and issue a session token.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let (Some(full_name), Some(email), Some(password)) =
        (payload.full_name, payload.email, payload.password)
    else {
        return Err(AppError::BadRequest(
            "Please provide all required fields".to_string(),
        ));
    };

    if payload.confirm_password.as_deref() != Some(password.as_str()) {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }

    let full_name = full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::BadRequest(
            "Please provide all required fields".to_string(),
        ));
    }
    if full_name.chars().count() > 50 {
        return Err(AppError::BadRequest(
            "Name cannot be more than 50 characters".to_string(),
        ));
    }

    if !email.validate_email() {
        return Err(AppError::BadRequest("Please add a valid email".to_string()));
    }

    if password.chars().count() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    if state.db.get_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let user = User::new_local(&email, &full_name, &password)?;
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "Registered new user");

    let token = issue_session_token(
        user.id,
        &state.config.jwt_signing_key,
        state.config.jwt_ttl_days,
    )
    .map_err(AppError::Internal)?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            success: true,
            token,
        }),
    ))
}

#[derive(Deserialize)]
struct LoginPayload {
    email: Option<String>,
    password: Option<String>,
}

/// Log in with local credentials and issue a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<TokenResponse>> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AppError::BadRequest(
            "Please provide email and password".to_string(),
        ));
    };

    // Unknown email and wrong password are indistinguishable to the caller.
    let user = state
        .db
        .get_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !user.verify_password(&password) {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.id, "User logged in");

    let token = issue_session_token(
        user.id,
        &state.config.jwt_signing_key,
        state.config.jwt_ttl_days,
    )
    .map_err(AppError::Internal)?;

    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

// ─── Google Sign-In ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleSignInPayload {
    id_token: Option<String>,
}

/// Sign in with a Google ID token, creating the user on first sign-in.
async fn google_sign_in(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GoogleSignInPayload>,
) -> Result<Json<TokenResponse>> {
    let Some(id_token) = payload.id_token else {
        return Err(AppError::BadRequest(
            "Please provide an ID token".to_string(),
        ));
    };

    let identity = state
        .oidc
        .verify_id_token(&id_token)
        .await
        .map_err(|e| match e {
            OidcError::Rejected(msg) => {
                tracing::debug!(reason = %msg, "Rejected Google ID token");
                AppError::InvalidToken
            }
            OidcError::Transient(msg) => {
                AppError::Internal(anyhow::anyhow!("OIDC verification failed: {msg}"))
            }
        })?;

    let user = match state.db.get_user_by_email(&identity.email).await? {
        Some(user) => user,
        None => {
            let full_name = display_name_for(&identity.full_name, &identity.email);
            let user = User::new_google(&identity.email, &full_name, &identity.subject);
            state.db.upsert_user(&user).await?;
            tracing::info!(user_id = %user.id, "Created user from Google sign-in");
            user
        }
    };

    let token = issue_session_token(
        user.id,
        &state.config.jwt_signing_key,
        state.config.jwt_ttl_days,
    )
    .map_err(AppError::Internal)?;

    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

/// Pick a display name from the Google profile, falling back to the email
/// local part, clamped to the 50-character profile limit.
fn display_name_for(claim: &Option<String>, email: &str) -> String {
    let name = claim
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email));

    name.chars().take(50).collect()
}

// ─── Current User ────────────────────────────────────────────

/// Get the authenticated user's profile.
async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserDataResponse> {
    Json(UserDataResponse {
        success: true,
        data: UserResponse::from(&user),
    })
}

/// Logout acknowledgement.
///
/// Sessions are reconstructed from the bearer token on every request, so
/// there is no server-side state to clear; the client drops its token. No
/// store write, idempotent.
async fn logout(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<MessageResponse> {
    tracing::debug!(user_id = %user.id, "User logged out");
    Json(MessageResponse {
        success: true,
        message: "User logged out successfully".to_string(),
    })
}

// ─── Password Change ─────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordPayload {
    current_password: Option<String>,
    new_password: Option<String>,
}

/// Change the caller's password, re-verifying the current one.
///
/// Single pass; every terminal failure short-circuits with a distinct
/// message, and the final store write is the only mutation.
async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<Json<MessageResponse>> {
    let (Some(current_password), Some(new_password)) =
        (payload.current_password, payload.new_password)
    else {
        return Err(AppError::BadRequest(
            "Current password and new password are required".to_string(),
        ));
    };

    if new_password.chars().count() < 6 {
        return Err(AppError::BadRequest(
            "New password must be at least 6 characters long".to_string(),
        ));
    }

    // Re-fetch so the check-and-set runs against the stored credential, not
    // the middleware's snapshot.
    let mut user = state
        .db
        .get_user(caller.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.provider() != "local" {
        return Err(AppError::BadRequest(
            "Password change is not available for Google accounts. \
             Please manage your password through your Google account settings."
                .to_string(),
        ));
    }

    if !user.verify_password(&current_password) {
        return Err(AppError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    if user.verify_password(&new_password) {
        return Err(AppError::BadRequest(
            "New password must be different from current password".to_string(),
        ));
    }

    user.set_password(&new_password)?;
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "Password changed");

    Ok(Json(MessageResponse {
        success: true,
        message: "Password updated successfully".to_string(),
    }))
}

// ─── Profile Update ──────────────────────────────────────────

/// Profile fields accepted by update-profile, common to both the JSON and
/// multipart request variants.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ProfilePatch {
    #[validate(length(max = 50, message = "Name cannot be more than 50 characters"))]
    full_name: Option<String>,
    #[validate(length(max = 500, message = "Bio cannot be more than 500 characters"))]
    bio: Option<String>,
    #[validate(length(max = 20, message = "Phone number cannot be more than 20 characters"))]
    phone: Option<String>,
    #[validate(length(max = 100, message = "Location cannot be more than 100 characters"))]
    location: Option<String>,
    #[validate(custom(function = validate_skills))]
    skills: Option<Vec<String>>,
}

fn validate_skills(skills: &Vec<String>) -> std::result::Result<(), ValidationError> {
    for skill in skills {
        if skill.chars().count() > 50 {
            let mut err = ValidationError::new("skill_length");
            err.message = Some("Skill name cannot be more than 50 characters".into());
            return Err(err);
        }
    }
    Ok(())
}

fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// Update the authenticated user's profile.
///
/// Accepts either a JSON body or a multipart form (with an optional resume
/// file), switched on Content-Type; both decode into [`ProfilePatch`] before
/// validation.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(mut user)): Extension<CurrentUser>,
    request: Request,
) -> Result<Json<ProfileUpdateResponse>> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let (patch, resume) = if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {e}")))?;
        decode_multipart_patch(multipart).await?
    } else {
        let Json(patch) = Json::<ProfilePatch>::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?;
        (patch, None)
    };

    patch
        .validate()
        .map_err(|e| AppError::BadRequest(first_validation_message(&e)))?;

    if let Some(full_name) = &patch.full_name {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::BadRequest(
                "Please provide a valid name".to_string(),
            ));
        }
        user.full_name = full_name.to_string();
    }
    if let Some(bio) = patch.bio {
        user.bio = Some(bio);
    }
    if let Some(phone) = patch.phone {
        user.phone = Some(phone);
    }
    if let Some(location) = patch.location {
        user.location = Some(location);
    }
    if let Some(skills) = patch.skills {
        user.skills = skills;
    }

    if let Some(file) = resume {
        let url = state.resumes.save(user.id, &file).await?;
        user.resume_url = Some(url);
    }

    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(Json(ProfileUpdateResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
        data: UserResponse::from(&user),
    }))
}

/// Decode a multipart update-profile form into the common patch value.
///
/// Skills arrive comma-separated in form fields; the resume field carries
/// the file.
async fn decode_multipart_patch(
    mut multipart: Multipart,
) -> Result<(ProfilePatch, Option<ResumeFile>)> {
    let mut patch = ProfilePatch::default();
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "resume" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read resume: {e}")))?;
                resume = Some(ResumeFile {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "fullName" => patch.full_name = Some(read_text_field(field).await?),
            "bio" => patch.bio = Some(read_text_field(field).await?),
            "phone" => patch.phone = Some(read_text_field(field).await?),
            "location" => patch.location = Some(read_text_field(field).await?),
            "skills" => {
                let raw = read_text_field(field).await?;
                patch.skills = Some(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
            _ => {}
        }
    }

    Ok((patch, resume))
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {e}")))
}
