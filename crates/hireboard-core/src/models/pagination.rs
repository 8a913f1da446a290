use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{ApplicationListing, Job};

/// Rows that can be paged by id.
pub trait Identified {
    fn id(&self) -> Uuid;
}

impl Identified for Job {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identified for ApplicationListing {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// One page of a cursor-paginated listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    /// Rows matching the filter, regardless of paging
    pub total: i64,
    /// Newest first
    pub items: Vec<T>,
    /// Cursor for the next page; empty on the last page
    #[serde(default)]
    pub next_token: String,
}

impl<T: Identified> Page<T> {
    /// Builds a page from rows fetched with `LIMIT page_size + 1`.
    ///
    /// The extra row only signals that another page exists; it is dropped and
    /// the last kept row's id becomes the cursor. Anything shorter ends the
    /// listing.
    pub fn from_rows(total: i64, mut rows: Vec<T>, page_size: i64) -> Self {
        let page_size = page_size.max(0) as usize;
        let has_more = rows.len() > page_size;
        rows.truncate(page_size);

        let next_token = match rows.last() {
            Some(last) if has_more => last.id().to_string(),
            _ => String::new(),
        };

        Page {
            total,
            items: rows,
            next_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row(Uuid);

    impl Identified for Row {
        fn id(&self) -> Uuid {
            self.0
        }
    }

    #[test]
    fn test_look_ahead_row_yields_cursor() {
        let rows = vec![Row(Uuid::now_v7()), Row(Uuid::now_v7()), Row(Uuid::now_v7())];
        let last_kept = rows[1].0;
        let page = Page::from_rows(5, rows, 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_token, last_kept.to_string());
    }

    #[test]
    fn test_exactly_full_final_page_ends_listing() {
        let rows = vec![Row(Uuid::now_v7()), Row(Uuid::now_v7())];
        let page = Page::from_rows(2, rows, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.next_token.is_empty());
    }

    #[test]
    fn test_short_page_ends_listing() {
        let page = Page::from_rows(1, vec![Row(Uuid::now_v7())], 2);
        assert!(page.next_token.is_empty());

        let empty: Page<Row> = Page::from_rows(0, Vec::new(), 20);
        assert!(empty.next_token.is_empty());
        assert!(empty.items.is_empty());
    }
}
