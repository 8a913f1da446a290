//! Wiring of repositories and services into [`AppState`]

use std::sync::Arc;

use hireboard_core::Config;
use hireboard_db::{ApplicationRepository, JobRepository, UserRepository};
use hireboard_storage::{PresignCache, Presigner};
use sqlx::PgPool;

use crate::services::file_transfer::{FileTransferService, TransferSettings};
use crate::state::AppState;

pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    presigner: Arc<dyn Presigner>,
    cache: Arc<dyn PresignCache>,
) -> Arc<AppState> {
    let users = Arc::new(UserRepository::new(pool.clone()));
    let files = FileTransferService::new(
        presigner,
        cache,
        users.clone(),
        TransferSettings::from_config(config),
    );

    Arc::new(AppState {
        jobs: Arc::new(JobRepository::new(pool.clone())),
        applications: Arc::new(ApplicationRepository::new(pool.clone())),
        users,
        files,
        page_limits: config.page_limits(),
        db_pool: Some(pool),
        config: config.clone(),
    })
}
