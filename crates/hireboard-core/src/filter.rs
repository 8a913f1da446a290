//! Listing filters
//!
//! Raw query parameters arrive as optional strings and are turned into typed
//! filters here. Normalization never fails: blank values are dropped, values
//! that do not parse impose no constraint, an unreadable cursor restarts
//! the listing from the first page, and a repeated parameter keeps its first
//! value.

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::{ApplicationStatus, JobType};

/// Page size bounds applied during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        PageLimits {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageLimits {
    /// Absent, unparseable or non-positive sizes fall back to the default;
    /// larger ones are clamped to the maximum.
    pub fn page_size(&self, raw: Option<&str>) -> i64 {
        match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
            Some(size) if size > 0 => size.min(self.max_page_size),
            _ => self.default_page_size,
        }
    }
}

fn non_empty(raw: &Option<String>) -> Option<String> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Keeps the first value of a repeated query parameter.
pub(crate) fn keep_first(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn parsed<T: std::str::FromStr>(raw: &Option<String>) -> Option<T> {
    non_empty(raw).and_then(|s| s.parse().ok())
}

/// Query parameters of `GET /api/jobs`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListJobsQuery {
    /// Full-text match over title and company
    pub keyword: Option<String>,
    /// Lower bound on the posted minimum salary
    pub salary_min: Option<String>,
    /// Upper bound on the posted maximum salary
    pub salary_max: Option<String>,
    /// full-time, part-time or contract
    pub job_type: Option<String>,
    /// Cursor from the previous page
    pub next_token: Option<String>,
    pub page_size: Option<String>,
}

/// Query parameters of the application listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListApplicationsQuery {
    /// pending, accepted or rejected
    pub status: Option<String>,
    /// Full-text match over the job's title and company
    pub keyword: Option<String>,
    pub job_id: Option<String>,
    /// Owner filter; ignored for candidates
    pub user_id: Option<String>,
    /// Cursor from the previous page
    pub next_token: Option<String>,
    pub page_size: Option<String>,
}

/// Normalized job listing filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFilter {
    pub page_size: i64,
    pub next_token: Option<Uuid>,
    pub keyword: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub job_type: Option<JobType>,
}

/// Normalized application listing filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub page_size: i64,
    pub next_token: Option<Uuid>,
    pub status: Option<ApplicationStatus>,
    pub keyword: Option<String>,
    pub user_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
}

impl FromIterator<(String, String)> for ListJobsQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = ListJobsQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "keyword" => &mut query.keyword,
                "salary_min" => &mut query.salary_min,
                "salary_max" => &mut query.salary_max,
                "job_type" => &mut query.job_type,
                "next_token" => &mut query.next_token,
                "page_size" => &mut query.page_size,
                _ => continue,
            };
            keep_first(slot, value);
        }
        query
    }
}

impl FromIterator<(String, String)> for ListApplicationsQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = ListApplicationsQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "status" => &mut query.status,
                "keyword" => &mut query.keyword,
                "job_id" => &mut query.job_id,
                "user_id" => &mut query.user_id,
                "next_token" => &mut query.next_token,
                "page_size" => &mut query.page_size,
                _ => continue,
            };
            keep_first(slot, value);
        }
        query
    }
}

impl ListJobsQuery {
    pub fn normalize(&self, limits: &PageLimits) -> JobFilter {
        JobFilter {
            page_size: limits.page_size(self.page_size.as_deref()),
            next_token: parsed(&self.next_token),
            keyword: non_empty(&self.keyword),
            salary_min: parsed(&self.salary_min),
            salary_max: parsed(&self.salary_max),
            job_type: parsed(&self.job_type),
        }
    }
}

impl ListApplicationsQuery {
    pub fn normalize(&self, limits: &PageLimits) -> ApplicationFilter {
        ApplicationFilter {
            page_size: limits.page_size(self.page_size.as_deref()),
            next_token: parsed(&self.next_token),
            status: parsed(&self.status),
            keyword: non_empty(&self.keyword),
            user_id: parsed(&self.user_id),
            job_id: parsed(&self.job_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_page_size_defaults_and_clamps() {
        let limits = PageLimits::default();
        assert_eq!(limits.page_size(None), 20);
        assert_eq!(limits.page_size(Some("")), 20);
        assert_eq!(limits.page_size(Some("0")), 20);
        assert_eq!(limits.page_size(Some("-3")), 20);
        assert_eq!(limits.page_size(Some("ten")), 20);
        assert_eq!(limits.page_size(Some(" 7 ")), 7);
        assert_eq!(limits.page_size(Some("1000")), 100);
    }

    #[test]
    fn test_empty_query_has_no_constraints() {
        let filter = ListJobsQuery::default().normalize(&PageLimits::default());
        assert_eq!(
            filter,
            JobFilter {
                page_size: 20,
                next_token: None,
                keyword: None,
                salary_min: None,
                salary_max: None,
                job_type: None,
            }
        );
    }

    #[test]
    fn test_job_query_trims_and_parses() {
        let cursor = Uuid::now_v7();
        let query = ListJobsQuery {
            keyword: some("  software engineer "),
            salary_min: some("1000"),
            salary_max: some("abc"),
            job_type: some("contract"),
            next_token: Some(cursor.to_string()),
            page_size: some("5"),
        };
        let filter = query.normalize(&PageLimits::default());
        assert_eq!(filter.keyword.as_deref(), Some("software engineer"));
        assert_eq!(filter.salary_min, Some(1000));
        assert_eq!(filter.salary_max, None);
        assert_eq!(filter.job_type, Some(JobType::Contract));
        assert_eq!(filter.next_token, Some(cursor));
        assert_eq!(filter.page_size, 5);
    }

    #[test]
    fn test_blank_and_unknown_values_are_dropped() {
        let query = ListJobsQuery {
            keyword: some("   "),
            job_type: some("internship"),
            next_token: some("not-a-cursor"),
            ..Default::default()
        };
        let filter = query.normalize(&PageLimits::default());
        assert_eq!(filter.keyword, None);
        assert_eq!(filter.job_type, None);
        assert_eq!(filter.next_token, None);
    }

    #[test]
    fn test_repeated_parameters_keep_first_value() {
        let pairs = [
            ("keyword", "software"),
            ("keyword", "engineer"),
            ("page_size", "2"),
            ("page_size", "50"),
            ("utm_source", "newsletter"),
        ]
        .map(|(k, v)| (k.to_string(), v.to_string()));

        let query: ListJobsQuery = pairs.into_iter().collect();
        assert_eq!(query.keyword.as_deref(), Some("software"));
        assert_eq!(query.page_size.as_deref(), Some("2"));

        let query: ListApplicationsQuery = [
            ("status".to_string(), "rejected".to_string()),
            ("status".to_string(), "pending".to_string()),
        ]
        .into_iter()
        .collect();
        let filter = query.normalize(&PageLimits::default());
        assert_eq!(filter.status, Some(ApplicationStatus::Rejected));
    }

    #[test]
    fn test_application_query_normalizes() {
        let job_id = Uuid::now_v7();
        let query = ListApplicationsQuery {
            status: some("Accepted"),
            job_id: Some(job_id.to_string()),
            user_id: some("nobody"),
            ..Default::default()
        };
        let limits = PageLimits {
            default_page_size: 3,
            max_page_size: 10,
        };
        let filter = query.normalize(&limits);
        assert_eq!(filter.status, Some(ApplicationStatus::Accepted));
        assert_eq!(filter.job_id, Some(job_id));
        assert_eq!(filter.user_id, None);
        assert_eq!(filter.page_size, 3);
    }
}
