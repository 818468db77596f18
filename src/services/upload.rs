// SPDX-License-Identifier: MIT

//! Resume file storage.

use crate::error::AppError;
use std::path::PathBuf;
use uuid::Uuid;

/// Maximum accepted resume size (10 MB).
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// An uploaded resume as received at the boundary.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Stores uploaded resumes on the local filesystem.
///
/// Files land at `<root>/resumes/<user_id>_<unix_ts>.pdf`; the returned URL
/// path is what gets persisted on the user profile.
#[derive(Clone)]
pub struct ResumeStore {
    root: PathBuf,
}

impl ResumeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Validate content type and size limits for an upload.
    pub fn validate(file: &ResumeFile) -> Result<(), AppError> {
        if file.content_type != "application/pdf" {
            return Err(AppError::BadRequest(
                "Resume must be a PDF file".to_string(),
            ));
        }

        if file.bytes.is_empty() {
            return Err(AppError::BadRequest("Resume file is empty".to_string()));
        }

        if file.bytes.len() > MAX_RESUME_BYTES {
            return Err(AppError::BadRequest(
                "Resume must be 10 MB or smaller".to_string(),
            ));
        }

        Ok(())
    }

    /// Persist a validated resume and return its served URL path.
    pub async fn save(&self, user_id: Uuid, file: &ResumeFile) -> Result<String, AppError> {
        Self::validate(file)?;

        let dir = self.root.join("resumes");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create upload dir: {e}")))?;

        let filename = format!("{}_{}.pdf", user_id, chrono::Utc::now().timestamp());
        let path = dir.join(&filename);

        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to store resume: {e}")))?;

        tracing::info!(user_id = %user_id, path = %path.display(), "Stored resume upload");

        Ok(format!("/uploads/resumes/{}", filename))
    }
}
