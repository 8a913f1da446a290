use async_trait::async_trait;
use hireboard_core::{AppError, Job, JobFilter, JobInput, Page};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::cursor::{fetch_page, CursorFilter, ListingSource};
use super::store::JobStore;

const JOB_COLUMNS: &str =
    "id, title, company, job_type, salary_min, salary_max, created_at, updated_at";

const JOB_LISTING: ListingSource = ListingSource {
    columns: JOB_COLUMNS,
    from: "jobs",
    id_column: "jobs.id",
};

impl CursorFilter for JobFilter {
    fn page_size(&self) -> i64 {
        self.page_size
    }

    fn next_token(&self) -> Option<Uuid> {
        self.next_token
    }

    fn push_predicates(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if let Some(keyword) = &self.keyword {
            builder
                .push(" AND to_tsvector('simple', title || ' ' || company) @@ plainto_tsquery('simple', ")
                .push_bind(keyword.clone())
                .push(")");
        }
        if let Some(salary_min) = self.salary_min {
            builder.push(" AND salary_min >= ").push_bind(salary_min);
        }
        if let Some(salary_max) = self.salary_max {
            builder.push(" AND salary_max <= ").push_bind(salary_max);
        }
        if let Some(job_type) = self.job_type {
            builder.push(" AND job_type = ").push_bind(job_type);
        }
    }
}

/// Repository for job postings
#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for JobRepository {
    #[tracing::instrument(skip(self), fields(db.table = "jobs", db.operation = "select"))]
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Page<Job>, AppError> {
        fetch_page(&self.pool, &JOB_LISTING, filter).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "jobs", db.operation = "select", db.record_id = %id))]
    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<Postgres, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = $1",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    #[tracing::instrument(skip(self, input), fields(db.table = "jobs", db.operation = "insert"))]
    async fn create_job(&self, input: &JobInput) -> Result<Job, AppError> {
        let job = sqlx::query_as::<Postgres, Job>(&format!(
            r#"
            INSERT INTO jobs (id, title, company, job_type, salary_min, salary_max)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(&input.title)
        .bind(&input.company)
        .bind(input.job_type)
        .bind(input.salary_min)
        .bind(input.salary_max)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(job_id = %job.id, "Job created");
        Ok(job)
    }

    #[tracing::instrument(skip(self, input), fields(db.table = "jobs", db.operation = "update", db.record_id = %id))]
    async fn update_job(&self, id: Uuid, input: &JobInput) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<Postgres, Job>(&format!(
            r#"
            UPDATE jobs
            SET title = $2, company = $3, job_type = $4, salary_min = $5, salary_max = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.company)
        .bind(input.job_type)
        .bind(input.salary_min)
        .bind(input.salary_max)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    #[tracing::instrument(skip(self), fields(db.table = "jobs", db.operation = "delete", db.record_id = %id))]
    async fn delete_job(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::cursor::{count_query, page_query};
    use hireboard_core::JobType;

    #[test]
    fn test_job_predicates_are_conjunctive() {
        let filter = JobFilter {
            page_size: 20,
            next_token: None,
            keyword: Some("software engineer".to_string()),
            salary_min: Some(1000),
            salary_max: Some(2000),
            job_type: Some(JobType::FullTime),
        };
        let count = count_query(&JOB_LISTING, &filter);
        assert_eq!(
            count.sql(),
            "SELECT COUNT(*) FROM jobs WHERE TRUE \
             AND to_tsvector('simple', title || ' ' || company) @@ plainto_tsquery('simple', $1) \
             AND salary_min >= $2 AND salary_max <= $3 AND job_type = $4"
        );
    }

    #[test]
    fn test_job_page_query_uses_cursor() {
        let filter = JobFilter {
            page_size: 2,
            next_token: Some(Uuid::now_v7()),
            keyword: None,
            salary_min: None,
            salary_max: None,
            job_type: None,
        };
        let page = page_query(&JOB_LISTING, &filter, 2);
        assert!(page
            .sql()
            .ends_with("WHERE TRUE AND jobs.id < $1 ORDER BY jobs.id DESC LIMIT $2"));
    }
}
