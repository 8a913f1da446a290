use async_trait::async_trait;
use hireboard_core::{AppError, User};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::store::UserStore;

/// Repository for users
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select", db.record_id = %id))]
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(
            "SELECT id, role, totp_secret, totp_last_step, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    async fn claim_totp_step(&self, id: Uuid, step: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET totp_last_step = $2, updated_at = NOW()
            WHERE id = $1 AND (totp_last_step IS NULL OR totp_last_step < $2)
            "#,
        )
        .bind(id)
        .bind(step)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
