// SPDX-License-Identifier: MIT

use interview_tracker::config::Config;
use interview_tracker::db::Db;
use interview_tracker::models::user::User;
use interview_tracker::routes::create_router;
use interview_tracker::services::{GoogleOidcVerifier, ResumeStore};
use interview_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection (emulator).
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create an in-memory database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> Db {
    Db::new_in_memory()
}

/// Create a test app over the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let oidc = Arc::new(GoogleOidcVerifier::new(&config).expect("OIDC verifier"));
    let resumes = ResumeStore::new(&config.upload_dir);

    let state = Arc::new(AppState {
        config,
        db,
        oidc,
        resumes,
    });

    (create_router(state.clone()), state)
}

/// Create a test app whose OIDC verifier trusts a static RS256 key.
#[allow(dead_code)]
pub fn create_test_app_with_oidc_key(
    kid: &str,
    decoding_key: jsonwebtoken::DecodingKey,
) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let oidc = Arc::new(
        GoogleOidcVerifier::new_with_static_key(&config, kid, decoding_key)
            .expect("static-key OIDC verifier"),
    );
    let resumes = ResumeStore::new(&config.upload_dir);

    let state = Arc::new(AppState {
        config,
        db,
        oidc,
        resumes,
    });

    (create_router(state.clone()), state)
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 2 * 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("parse JSON body")
}

/// Issue a session token for a seeded user.
#[allow(dead_code)]
pub fn session_token_for(state: &AppState, user: &User) -> String {
    interview_tracker::middleware::auth::issue_session_token(
        user.id,
        &state.config.jwt_signing_key,
        state.config.jwt_ttl_days,
    )
    .expect("issue token")
}

/// Insert a local-credential user directly into the store.
#[allow(dead_code)]
pub async fn seed_local_user(state: &AppState, email: &str, password: &str) -> User {
    let user = User::new_local(email, "Test User", password).expect("hash password");
    state.db.upsert_user(&user).await.expect("seed user");
    user
}

/// Insert a Google-credential user directly into the store.
#[allow(dead_code)]
pub async fn seed_google_user(state: &AppState, email: &str) -> User {
    let user = User::new_google(email, "Google User", "google-subject-1");
    state.db.upsert_user(&user).await.expect("seed user");
    user
}
