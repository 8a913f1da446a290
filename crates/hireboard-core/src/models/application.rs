use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Review status of an application
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "application_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::Accepted => write!(f, "accepted"),
            ApplicationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid application status: {}", s)),
        }
    }
}

/// Stored application row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub status: ApplicationStatus,
    pub resume_object_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application as returned by listings, joined with its job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ApplicationListing {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub user_id: Uuid,
    pub status: ApplicationStatus,
    pub resume_object_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for submitting an application
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateApplicationRequest {
    pub job_id: Uuid,
    /// Defaults to the caller; any other user is rejected
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Key returned by the upload endpoint
    #[validate(length(
        min = 1,
        max = 1024,
        message = "Resume object key must be between 1 and 1024 characters"
    ))]
    pub resume_object_key: String,
}

/// Application ready to be stored, owner already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub resume_object_key: String,
}
