// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (credential and profile storage)
//! - Interviews (owner-scoped session records)
//!
//! Tests run against an in-memory backend with the same interface, so handler
//! flows can be exercised without an emulator.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Interview, User};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Database client.
#[derive(Clone)]
pub struct Db {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemStore>),
}

/// In-memory document collections used by the test backend.
#[derive(Default)]
struct MemStore {
    users: DashMap<Uuid, User>,
    interviews: DashMap<Uuid, Interview>,
}

impl Db {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create an in-memory database for testing.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemStore::default())),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::USERS)
                .obj()
                .one(&id.to_string())
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => Ok(mem.users.get(&id).map(|u| u.clone())),
        }
    }

    /// Look up a user by email (query-layer filter, emails are unique).
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let email = email.to_string();
                let mut users: Vec<User> = client
                    .fluent()
                    .select()
                    .from(collections::USERS)
                    .filter(move |q| q.field("email").eq(email.clone()))
                    .limit(1)
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(users.pop())
            }
            Backend::Memory(mem) => Ok(mem
                .users
                .iter()
                .find(|entry| entry.email == email)
                .map(|entry| entry.clone())),
        }
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .document_id(user.id.to_string())
                    .object(user)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(mem) => {
                mem.users.insert(user.id, user.clone());
                Ok(())
            }
        }
    }

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .from(collections::USERS)
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => {
                let mut users: Vec<User> = mem.users.iter().map(|e| e.clone()).collect();
                users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                Ok(users)
            }
        }
    }

    // ─── Interview Operations ────────────────────────────────────

    /// Get an interview session by ID.
    pub async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::INTERVIEWS)
                .obj()
                .one(&id.to_string())
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => Ok(mem.interviews.get(&id).map(|i| i.clone())),
        }
    }

    /// Get all interview sessions owned by a user.
    ///
    /// Filters on `userId` at the query layer; never fetches the whole
    /// collection. Most recently scheduled first.
    pub async fn get_interviews_for_user(&self, user_id: Uuid) -> Result<Vec<Interview>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let owner = user_id.to_string();
                client
                    .fluent()
                    .select()
                    .from(collections::INTERVIEWS)
                    .filter(move |q| q.field("userId").eq(owner.clone()))
                    .order_by([(
                        "scheduledTime",
                        firestore::FirestoreQueryDirection::Descending,
                    )])
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(mem) => {
                let mut sessions: Vec<Interview> = mem
                    .interviews
                    .iter()
                    .filter(|entry| entry.user_id == user_id)
                    .map(|entry| entry.clone())
                    .collect();
                sessions.sort_by(|a, b| b.scheduled_time.cmp(&a.scheduled_time));
                Ok(sessions)
            }
        }
    }

    /// Create or update an interview session (single-document atomic write).
    pub async fn upsert_interview(&self, interview: &Interview) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::INTERVIEWS)
                    .document_id(interview.id.to_string())
                    .object(interview)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(mem) => {
                mem.interviews.insert(interview.id, interview.clone());
                Ok(())
            }
        }
    }

    /// Delete an interview session.
    pub async fn delete_interview(&self, id: Uuid) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                client
                    .fluent()
                    .delete()
                    .from(collections::INTERVIEWS)
                    .document_id(id.to_string())
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(mem) => {
                mem.interviews.remove(&id);
                Ok(())
            }
        }
    }
}
