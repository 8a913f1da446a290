use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "user_role", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Hr,
    Interviewer,
    Candidate,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Hr => write!(f, "hr"),
            Role::Interviewer => write!(f, "interviewer"),
            Role::Candidate => write!(f, "candidate"),
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hr" => Ok(Role::Hr),
            "interviewer" => Ok(Role::Interviewer),
            "candidate" => Ok(Role::Candidate),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

/// Registered user. Users are provisioned out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub role: Role,
    /// Base32 TOTP secret
    #[serde(skip_serializing)]
    pub totp_secret: String,
    /// Last accepted TOTP time step
    #[serde(skip_serializing)]
    pub totp_last_step: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
