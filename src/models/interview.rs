// SPDX-License-Identifier: MIT

//! Interview session model and ownership checks.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Interview scenario categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scenario {
    #[serde(rename = "Job Interview")]
    JobInterview,
    #[serde(rename = "Coding Interview")]
    CodingInterview,
    #[serde(rename = "Technical Interview")]
    TechnicalInterview,
    #[serde(rename = "Behavioral Interview")]
    BehavioralInterview,
    Other,
}

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

/// Post-interview performance rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Excellent,
    Good,
    Average,
    Poor,
    Worst,
}

/// Optional performance review attached after the interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Performance {
    pub rating: Rating,
    #[serde(default)]
    pub feedback: String,
}

/// Interview session document (document ID is the `id` field).
///
/// Every session has exactly one owner; only the owner may read, update, or
/// delete it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: Uuid,
    /// Owning user's ID
    pub user_id: Uuid,
    pub scenario: Scenario,
    pub meeting_link: String,
    pub position: String,
    pub company: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
    pub scheduled_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub fn default_language() -> String {
    "English".to_string()
}

impl Interview {
    /// Ownership guard: allow iff the caller created this session.
    ///
    /// `action` names the attempted operation for the denial message
    /// ("access", "update", "delete"). Denial maps to 403.
    pub fn ensure_owned_by(&self, user_id: Uuid, action: &str) -> Result<(), AppError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Not authorized to {} this interview",
                action
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_interview(user_id: Uuid) -> Interview {
        Interview {
            id: Uuid::new_v4(),
            user_id,
            scenario: Scenario::CodingInterview,
            meeting_link: "https://meet.example.com/abc".to_string(),
            position: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            language: default_language(),
            status: Status::default(),
            performance: None,
            scheduled_time: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_is_allowed() {
        let owner = Uuid::new_v4();
        let interview = test_interview(owner);

        assert!(interview.ensure_owned_by(owner, "access").is_ok());
        assert!(interview.ensure_owned_by(owner, "update").is_ok());
        assert!(interview.ensure_owned_by(owner, "delete").is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let interview = test_interview(Uuid::new_v4());
        let stranger = Uuid::new_v4();

        let err = interview.ensure_owned_by(stranger, "delete").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg)
            if msg == "Not authorized to delete this interview"));
    }

    #[test]
    fn test_scenario_wire_names() {
        let json = serde_json::to_value(Scenario::JobInterview).unwrap();
        assert_eq!(json, "Job Interview");

        let parsed: Scenario = serde_json::from_value("Coding Interview".into()).unwrap();
        assert_eq!(parsed, Scenario::CodingInterview);

        assert!(serde_json::from_value::<Scenario>("Pair Programming".into()).is_err());
    }

    #[test]
    fn test_status_defaults_to_scheduled() {
        assert_eq!(Status::default(), Status::Scheduled);
    }
}
