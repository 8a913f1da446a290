//! In-memory store for testing
//!
//! Implements the store traits without PostgreSQL. Listings follow the same
//! keyset rules as the SQL repositories (newest first, `id < next_token`,
//! total counted before the cursor). Keyword matching approximates the
//! `simple` text search configuration: lowercase word tokens, every query
//! token must appear in the title or company.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use hireboard_core::{
    AppError, Application, ApplicationFilter, ApplicationListing, ApplicationStatus, Identified,
    Job, JobFilter, JobInput, NewApplication, Page, Role, User,
};
use uuid::Uuid;

use crate::db::{ApplicationStore, JobStore, UserStore};

#[derive(Default)]
struct State {
    jobs: HashMap<Uuid, Job>,
    applications: HashMap<Uuid, Application>,
    users: HashMap<Uuid, User>,
}

/// Mock store backing all three store traits
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// True when every word of `keyword` occurs in `title` or `company`.
pub fn keyword_matches(keyword: &str, title: &str, company: &str) -> bool {
    let document = tokens(&format!("{} {}", title, company));
    let query = tokens(keyword);
    !query.is_empty() && query.iter().all(|t| document.contains(t))
}

fn paginate<T: Identified>(
    mut rows: Vec<T>,
    page_size: i64,
    next_token: Option<Uuid>,
) -> Page<T> {
    rows.sort_by_key(|row| std::cmp::Reverse(row.id()));
    let total = rows.len() as i64;
    let items: Vec<T> = rows
        .into_iter()
        .filter(|row| next_token.map_or(true, |cursor| row.id() < cursor))
        .take(page_size.max(0) as usize + 1)
        .collect();
    Page::from_rows(total, items, page_size)
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a user with a fresh id and returns it
    pub fn add_user(&self, role: Role, totp_secret: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            role,
            totp_secret: totp_secret.to_string(),
            totp_last_step: None,
            created_at: now,
            updated_at: now,
        };
        self.lock().users.insert(user.id, user.clone());
        user
    }

    pub fn add_job(&self, job: Job) {
        self.lock().jobs.insert(job.id, job);
    }

    pub fn application_count(&self) -> usize {
        self.lock().applications.len()
    }
}

#[async_trait]
impl JobStore for InMemoryStore {
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Page<Job>, AppError> {
        if filter.page_size <= 0 {
            return Err(AppError::Internal("page size must be positive".to_string()));
        }
        let rows: Vec<Job> = self
            .lock()
            .jobs
            .values()
            .filter(|job| {
                filter
                    .keyword
                    .as_deref()
                    .map_or(true, |kw| keyword_matches(kw, &job.title, &job.company))
                    && filter.salary_min.map_or(true, |min| job.salary_min >= min)
                    && filter.salary_max.map_or(true, |max| job.salary_max <= max)
                    && filter.job_type.map_or(true, |jt| job.job_type == jt)
            })
            .cloned()
            .collect();

        Ok(paginate(rows, filter.page_size, filter.next_token))
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        Ok(self.lock().jobs.get(&id).cloned())
    }

    async fn create_job(&self, input: &JobInput) -> Result<Job, AppError> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::now_v7(),
            title: input.title.clone(),
            company: input.company.clone(),
            job_type: input.job_type,
            salary_min: input.salary_min,
            salary_max: input.salary_max,
            created_at: now,
            updated_at: now,
        };
        self.lock().jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn update_job(&self, id: Uuid, input: &JobInput) -> Result<Option<Job>, AppError> {
        let mut state = self.lock();
        let Some(job) = state.jobs.get_mut(&id) else {
            return Ok(None);
        };
        job.title = input.title.clone();
        job.company = input.company.clone();
        job.job_type = input.job_type;
        job.salary_min = input.salary_min;
        job.salary_max = input.salary_max;
        job.updated_at = Utc::now();
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.lock();
        if state.jobs.remove(&id).is_none() {
            return Ok(false);
        }
        state.applications.retain(|_, application| application.job_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ApplicationStore for InMemoryStore {
    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Page<ApplicationListing>, AppError> {
        if filter.page_size <= 0 {
            return Err(AppError::Internal("page size must be positive".to_string()));
        }
        let state = self.lock();
        let rows: Vec<ApplicationListing> = state
            .applications
            .values()
            .filter_map(|application| {
                let job = state.jobs.get(&application.job_id)?;
                Some(ApplicationListing {
                    id: application.id,
                    job_id: application.job_id,
                    job_title: job.title.clone(),
                    company: job.company.clone(),
                    user_id: application.user_id,
                    status: application.status,
                    resume_object_key: application.resume_object_key.clone(),
                    created_at: application.created_at,
                    updated_at: application.updated_at,
                })
            })
            .filter(|listing| {
                filter.status.map_or(true, |s| listing.status == s)
                    && filter.keyword.as_deref().map_or(true, |kw| {
                        keyword_matches(kw, &listing.job_title, &listing.company)
                    })
                    && filter.user_id.map_or(true, |u| listing.user_id == u)
                    && filter.job_id.map_or(true, |j| listing.job_id == j)
            })
            .collect();

        Ok(paginate(rows, filter.page_size, filter.next_token))
    }

    async fn create_application(&self, input: &NewApplication) -> Result<Application, AppError> {
        let mut state = self.lock();
        if !state.jobs.contains_key(&input.job_id) {
            return Err(AppError::BadRequest(format!(
                "job {} does not exist",
                input.job_id
            )));
        }
        if !state.users.contains_key(&input.user_id) {
            return Err(AppError::BadRequest(format!(
                "user {} does not exist",
                input.user_id
            )));
        }
        let now = Utc::now();
        let application = Application {
            id: Uuid::now_v7(),
            job_id: input.job_id,
            user_id: input.user_id,
            status: ApplicationStatus::Pending,
            resume_object_key: input.resume_object_key.clone(),
            created_at: now,
            updated_at: now,
        };
        state
            .applications
            .insert(application.id, application.clone());
        Ok(application)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn claim_totp_step(&self, id: Uuid, step: i64) -> Result<bool, AppError> {
        let mut state = self.lock();
        let Some(user) = state.users.get_mut(&id) else {
            return Ok(false);
        };
        if user.totp_last_step.is_some_and(|last| last >= step) {
            return Ok(false);
        }
        user.totp_last_step = Some(step);
        user.updated_at = Utc::now();
        Ok(true)
    }
}
