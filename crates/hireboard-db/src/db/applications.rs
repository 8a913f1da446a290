use async_trait::async_trait;
use hireboard_core::{
    AppError, Application, ApplicationFilter, ApplicationListing, NewApplication, Page,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::cursor::{fetch_page, CursorFilter, ListingSource};
use super::store::ApplicationStore;

const APPLICATION_LISTING: ListingSource = ListingSource {
    columns: "applications.id, applications.job_id, jobs.title AS job_title, \
              jobs.company AS company, applications.user_id, applications.status, \
              applications.resume_object_key, applications.created_at, applications.updated_at",
    from: "applications JOIN jobs ON jobs.id = applications.job_id",
    id_column: "applications.id",
};

impl CursorFilter for ApplicationFilter {
    fn page_size(&self) -> i64 {
        self.page_size
    }

    fn next_token(&self) -> Option<Uuid> {
        self.next_token
    }

    fn push_predicates(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if let Some(status) = self.status {
            builder.push(" AND applications.status = ").push_bind(status);
        }
        if let Some(keyword) = &self.keyword {
            builder
                .push(" AND to_tsvector('simple', jobs.title || ' ' || jobs.company) @@ plainto_tsquery('simple', ")
                .push_bind(keyword.clone())
                .push(")");
        }
        if let Some(user_id) = self.user_id {
            builder.push(" AND applications.user_id = ").push_bind(user_id);
        }
        if let Some(job_id) = self.job_id {
            builder.push(" AND applications.job_id = ").push_bind(job_id);
        }
    }
}

/// Repository for job applications
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for ApplicationRepository {
    #[tracing::instrument(skip(self), fields(db.table = "applications", db.operation = "select"))]
    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Page<ApplicationListing>, AppError> {
        fetch_page(&self.pool, &APPLICATION_LISTING, filter).await
    }

    #[tracing::instrument(skip(self, input), fields(db.table = "applications", db.operation = "insert", job_id = %input.job_id))]
    async fn create_application(&self, input: &NewApplication) -> Result<Application, AppError> {
        let result = sqlx::query_as::<Postgres, Application>(
            r#"
            INSERT INTO applications (id, job_id, user_id, resume_object_key)
            VALUES ($1, $2, $3, $4)
            RETURNING id, job_id, user_id, status, resume_object_key, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.job_id)
        .bind(input.user_id)
        .bind(&input.resume_object_key)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(application) => {
                tracing::info!(application_id = %application.id, "Application created");
                Ok(application)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                tracing::debug!(error = %db_err, "Application references a missing row");
                Err(AppError::BadRequest(format!(
                    "job {} does not exist",
                    input.job_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}
