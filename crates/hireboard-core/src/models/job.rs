use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Employment type of a job posting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "job_type"))]
pub enum JobType {
    #[serde(rename = "full-time")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "full-time"))]
    FullTime,
    #[serde(rename = "part-time")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "part-time"))]
    PartTime,
    #[serde(rename = "contract")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "contract"))]
    Contract,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            _ => Err(anyhow::anyhow!("Invalid job type: {}", s)),
        }
    }
}

/// Job posting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub job_type: JobType,
    pub salary_min: i64,
    pub salary_max: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a job posting
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[validate(schema(function = "validate_salary_range", skip_on_field_errors = false))]
pub struct JobInput {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Company must be between 1 and 255 characters"
    ))]
    pub company: String,
    pub job_type: JobType,
    #[validate(range(min = 0, message = "Salary must not be negative"))]
    pub salary_min: i64,
    #[validate(range(min = 0, message = "Salary must not be negative"))]
    pub salary_max: i64,
}

fn validate_salary_range(input: &JobInput) -> Result<(), ValidationError> {
    if input.salary_min > input.salary_max {
        let mut err = ValidationError::new("salary_range");
        err.message = Some("salary_min must not exceed salary_max".into());
        return Err(err);
    }
    Ok(())
}
