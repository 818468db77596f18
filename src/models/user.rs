// SPDX-License-Identifier: MIT

//! User model for storage and API.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cost factor for bcrypt password hashing.
const BCRYPT_COST: u32 = 10;

/// Authentication credential owning a user's identity.
///
/// Tagged by `provider` so a local user always carries a password hash and a
/// Google user never does. The hash stays server-side; API responses go
/// through [`UserResponse`], which omits the credential entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum Credential {
    Local {
        #[serde(rename = "passwordHash")]
        password_hash: String,
    },
    Google {
        #[serde(rename = "googleId")]
        subject: String,
    },
}

/// User profile document (document ID is the `id` field).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Unique email address (case-sensitive as stored)
    pub email: String,
    /// Display name, 1-50 characters
    pub full_name: String,
    #[serde(flatten)]
    pub credential: Credential,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    /// Creation timestamp, immutable after registration
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a local-credential user with a freshly hashed password.
    pub fn new_local(email: &str, full_name: &str, password: &str) -> Result<Self, AppError> {
        let password_hash = hash_password(password)?;
        Ok(Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            credential: Credential::Local { password_hash },
            bio: None,
            phone: None,
            location: None,
            skills: Vec::new(),
            resume_url: None,
            created_at: Utc::now(),
        })
    }

    /// Create a user from a verified Google identity.
    pub fn new_google(email: &str, full_name: &str, subject: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            credential: Credential::Google {
                subject: subject.to_string(),
            },
            bio: None,
            phone: None,
            location: None,
            skills: Vec::new(),
            resume_url: None,
            created_at: Utc::now(),
        }
    }

    /// Provider name as exposed in API responses.
    pub fn provider(&self) -> &'static str {
        match self.credential {
            Credential::Local { .. } => "local",
            Credential::Google { .. } => "google",
        }
    }

    /// Compare a candidate password against the stored hash.
    ///
    /// Google users have no password, so this is always false for them.
    pub fn verify_password(&self, candidate: &str) -> bool {
        match &self.credential {
            Credential::Local { password_hash } => {
                bcrypt::verify(candidate, password_hash).unwrap_or(false)
            }
            Credential::Google { .. } => false,
        }
    }

    /// Replace the stored password hash with a hash of `plaintext`.
    ///
    /// This is the only code path that writes the hash, so plaintext never
    /// reaches the store and existing hashes are never re-hashed.
    pub fn set_password(&mut self, plaintext: &str) -> Result<(), AppError> {
        self.credential = Credential::Local {
            password_hash: hash_password(plaintext)?,
        };
        Ok(())
    }
}

fn hash_password(plaintext: &str) -> Result<String, AppError> {
    bcrypt::hash(plaintext, BCRYPT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// User profile as returned to clients. Never includes the credential.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub provider: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            provider: user.provider(),
            bio: user.bio.clone(),
            phone: user.phone.clone(),
            location: user.location.clone(),
            skills: user.skills.clone(),
            resume_url: user.resume_url.clone(),
            created_at: user.created_at,
        }
    }
}

/// Compact listing entry for `GET /api/users`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub provider: &'static str,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            provider: user.provider(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let user = User::new_local("a@x.com", "A B", "secret1").unwrap();

        assert!(user.verify_password("secret1"));
        assert!(!user.verify_password("secret2"));
        assert!(!user.verify_password(""));
    }

    #[test]
    fn test_google_user_never_matches_password() {
        let user = User::new_google("g@x.com", "G User", "google-sub-123");

        assert!(!user.verify_password("anything"));
        assert_eq!(user.provider(), "google");
    }

    #[test]
    fn test_set_password_replaces_hash() {
        let mut user = User::new_local("a@x.com", "A B", "oldpassword").unwrap();
        user.set_password("newpassword").unwrap();

        assert!(user.verify_password("newpassword"));
        assert!(!user.verify_password("oldpassword"));
    }

    #[test]
    fn test_credential_tag_round_trip() {
        let user = User::new_local("a@x.com", "A B", "secret1").unwrap();
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["provider"], "local");
        assert!(json["passwordHash"].is_string());

        let back: User = serde_json::from_value(json).unwrap();
        assert!(back.verify_password("secret1"));
    }

    #[test]
    fn test_created_at_serializes_rfc3339() {
        let user = User::new_local("a@x.com", "A B", "secret1").unwrap();
        let json = serde_json::to_value(&user).unwrap();

        let raw = json["createdAt"].as_str().unwrap();
        let parsed: DateTime<Utc> = raw.parse().unwrap();
        assert_eq!(parsed, user.created_at);
    }

    #[test]
    fn test_response_never_carries_hash() {
        let user = User::new_local("a@x.com", "A B", "secret1").unwrap();
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["provider"], "local");
        assert_eq!(json["fullName"], "A B");
    }
}
