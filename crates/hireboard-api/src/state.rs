//! Application state shared by every handler.

use std::sync::Arc;

use hireboard_core::{Config, PageLimits};
use hireboard_db::{ApplicationStore, JobStore, UserStore};
use sqlx::PgPool;

use crate::services::file_transfer::FileTransferService;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub applications: Arc<dyn ApplicationStore>,
    pub users: Arc<dyn UserStore>,
    pub files: FileTransferService,
    pub page_limits: PageLimits,
    /// Present when backed by PostgreSQL; used by the health check
    pub db_pool: Option<PgPool>,
    pub config: Config,
}
