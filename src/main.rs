// SPDX-License-Identifier: MIT

//! Interview-Tracker API Server
//!
//! Backend for scheduling and tracking mock job interviews: accounts with
//! local or Google credentials, profiles with resume uploads, and
//! owner-scoped interview session records.

use interview_tracker::{
    config::Config,
    db::Db,
    services::{GoogleOidcVerifier, ResumeStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Interview-Tracker API");

    // Initialize Firestore database
    let db = Db::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    let oidc = Arc::new(GoogleOidcVerifier::new(&config).expect("Failed to initialize OIDC verifier"));

    let resumes = ResumeStore::new(&config.upload_dir);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        oidc,
        resumes,
    });

    // Build router
    let app = interview_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("interview_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
