//! Keyset pagination over UUIDv7 ids
//!
//! A listing is a predicate conjunction over one table expression, ordered by
//! id descending. The total is counted over the predicates alone; the cursor
//! (`id < next_token`) only bounds the rows returned. One row beyond the page
//! is fetched to tell whether another page exists. Both statements run in one
//! read-only snapshot so the total matches the rows.

use hireboard_core::{AppError, Identified, Page};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Where a paged listing reads from
#[derive(Debug, Clone, Copy)]
pub struct ListingSource {
    pub columns: &'static str,
    /// Table expression, joins included
    pub from: &'static str,
    /// Qualified id column used for ordering and the cursor bound
    pub id_column: &'static str,
}

/// A normalized filter that can restrict a listing
pub trait CursorFilter {
    fn page_size(&self) -> i64;

    fn next_token(&self) -> Option<Uuid>;

    /// Appends one ` AND ...` clause per constraint.
    fn push_predicates(&self, builder: &mut QueryBuilder<'_, Postgres>);
}

fn checked_page_size(page_size: i64) -> Result<i64, AppError> {
    if page_size <= 0 {
        return Err(AppError::Internal(format!(
            "page size must be positive, got {}",
            page_size
        )));
    }
    Ok(page_size)
}

pub(crate) fn count_query<F: CursorFilter + ?Sized>(
    source: &ListingSource,
    filter: &F,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
    builder.push(source.from).push(" WHERE TRUE");
    filter.push_predicates(&mut builder);
    builder
}

pub(crate) fn page_query<F: CursorFilter + ?Sized>(
    source: &ListingSource,
    filter: &F,
    page_size: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT ");
    builder
        .push(source.columns)
        .push(" FROM ")
        .push(source.from)
        .push(" WHERE TRUE");
    filter.push_predicates(&mut builder);

    if let Some(cursor) = filter.next_token() {
        builder
            .push(" AND ")
            .push(source.id_column)
            .push(" < ")
            .push_bind(cursor);
    }

    builder
        .push(" ORDER BY ")
        .push(source.id_column)
        .push(" DESC LIMIT ")
        .push_bind(page_size + 1);
    builder
}

/// Runs the count and page queries and assembles the page.
pub async fn fetch_page<T, F>(
    pool: &PgPool,
    source: &ListingSource,
    filter: &F,
) -> Result<Page<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Identified + Send + Unpin,
    F: CursorFilter + Sync + ?Sized,
{
    let page_size = checked_page_size(filter.page_size())?;

    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let total: i64 = count_query(source, filter)
        .build_query_scalar()
        .fetch_one(&mut *tx)
        .await?;

    let rows: Vec<T> = page_query(source, filter, page_size)
        .build_query_as()
        .fetch_all(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Page::from_rows(total, rows, page_size))
}
