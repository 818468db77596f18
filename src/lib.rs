// SPDX-License-Identifier: MIT

//! Interview-Tracker: schedule and track mock job interviews
//!
//! This crate provides the backend API for user accounts, profiles with
//! resume uploads, and owner-scoped interview session records.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{GoogleOidcVerifier, ResumeStore};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub oidc: Arc<GoogleOidcVerifier>,
    pub resumes: ResumeStore,
}
