//! Store traits shared by the PostgreSQL repositories and test doubles

use async_trait::async_trait;
use hireboard_core::{
    AppError, Application, ApplicationFilter, ApplicationListing, Job, JobFilter, JobInput,
    NewApplication, Page, User,
};
use uuid::Uuid;

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Page<Job>, AppError>;

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, AppError>;

    async fn create_job(&self, input: &JobInput) -> Result<Job, AppError>;

    /// Replaces every editable field. `None` when the job does not exist.
    async fn update_job(&self, id: Uuid, input: &JobInput) -> Result<Option<Job>, AppError>;

    /// Deletes the job and its applications. `false` when nothing was deleted.
    async fn delete_job(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Page<ApplicationListing>, AppError>;

    /// Stores a pending application. Unknown jobs or users are `BadRequest`.
    async fn create_application(&self, input: &NewApplication) -> Result<Application, AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Records `step` as the user's last accepted TOTP step.
    ///
    /// Succeeds only if `step` is newer than the stored one, so a step can be
    /// claimed at most once.
    async fn claim_totp_step(&self, id: Uuid, step: i64) -> Result<bool, AppError>;
}
