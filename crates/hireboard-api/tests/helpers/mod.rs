//! Test helpers: build AppState and router for integration tests.
//!
//! Everything runs in-process: the in-memory store stands in for PostgreSQL,
//! `FakePresigner` for S3 and the in-memory presign cache for Redis.

pub mod presigner;
pub mod totp;

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use hireboard_api::services::{FileTransferService, TransferSettings};
use hireboard_api::setup::routes;
use hireboard_api::state::AppState;
use hireboard_core::config::LogFormat;
use hireboard_core::constants::{
    DEFAULT_PAGE_SIZE, DEFAULT_PRESIGN_CACHE_TTL_SECS, DEFAULT_PRESIGN_EXPIRY_SECS,
    MAX_PAGE_SIZE, MAX_RESUME_SIZE_BYTES,
};
use hireboard_core::{BaseConfig, Config, Job, JobInput, JobType, OtelConfig, Role, User};
use hireboard_db::memory::InMemoryStore;
use hireboard_db::JobStore;
use hireboard_storage::{InMemoryPresignCache, PresignCache};

pub use hireboard_core::constants::PRINCIPAL_HEADER;
use presigner::FakePresigner;

pub const HR_SECRET: &str = "UGLOBAFSYEIDW52JGKUEFEQFEB3RZFYL";
pub const INTERVIEWER_SECRET: &str = "7KIHH3TKGHNS67UHG4JLS5QPYN4SKTQC";
pub const CANDIDATE_SECRET: &str = "TXMJIAOMR42PQP2A5JWC7SPOIHEKI3X2";

/// Test application: server plus handles on the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: InMemoryStore,
    pub presigner: Arc<FakePresigner>,
    pub hr: User,
    pub interviewer: User,
    pub candidate: User,
    pub jobs: Vec<Job>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Registers another candidate
    pub fn add_candidate(&self) -> User {
        self.store.add_user(Role::Candidate, CANDIDATE_SECRET)
    }
}

pub struct TestOptions {
    pub cache: Arc<dyn PresignCache>,
    pub cache_ttl: Duration,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            cache: Arc::new(InMemoryPresignCache::new()),
            cache_ttl: Duration::from_secs(DEFAULT_PRESIGN_CACHE_TTL_SECS),
        }
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let config = create_test_config();
    let store = InMemoryStore::new();
    let presigner = Arc::new(FakePresigner::new());

    let hr = store.add_user(Role::Hr, HR_SECRET);
    let interviewer = store.add_user(Role::Interviewer, INTERVIEWER_SECRET);
    let candidate = store.add_user(Role::Candidate, CANDIDATE_SECRET);
    let jobs = seed_jobs(&store).await;

    let mut settings = TransferSettings::from_config(&config);
    settings.cache_ttl = options.cache_ttl;

    let state = Arc::new(AppState {
        jobs: Arc::new(store.clone()),
        applications: Arc::new(store.clone()),
        users: Arc::new(store.clone()),
        files: FileTransferService::new(
            presigner.clone(),
            options.cache,
            Arc::new(store.clone()),
            settings,
        ),
        page_limits: config.page_limits(),
        db_pool: None,
        config: config.clone(),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        store,
        presigner,
        hr,
        interviewer,
        candidate,
        jobs,
    }
}

/// The seven postings of the default data set; five mention "Software Engineer".
async fn seed_jobs(store: &InMemoryStore) -> Vec<Job> {
    let postings = [
        ("Software Engineer", "Google", 100_000, 200_000),
        ("Software Engineer", "Facebook", 100_000, 200_000),
        ("Software Engineer", "Amazon", 100_000, 200_000),
        ("Software Engineer", "Apple", 100_000, 200_000),
        ("Sr. Software Engineer", "Google", 200_000, 300_000),
        ("Infrastructure Engineer", "Facebook", 150_000, 200_000),
        ("Designer Manager", "Amazon", 100_000, 200_000),
    ];

    let mut jobs = Vec::new();
    for (title, company, salary_min, salary_max) in postings {
        let job = store
            .create_job(&JobInput {
                title: title.to_string(),
                company: company.to_string(),
                job_type: JobType::FullTime,
                salary_min,
                salary_max,
            })
            .await
            .expect("Failed to seed job");
        jobs.push(job);
    }
    jobs
}

pub fn create_test_config() -> Config {
    Config {
        base: BaseConfig {
            server_port: 3000,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 5,
            db_timeout_seconds: 30,
            environment: "test".to_string(),
            log_format: LogFormat::Compact,
        },
        database_url: "postgresql://localhost/hireboard_test".to_string(),
        s3_bucket: "resumes".to_string(),
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        presign_expiry_secs: DEFAULT_PRESIGN_EXPIRY_SECS,
        presign_cache_ttl_secs: DEFAULT_PRESIGN_CACHE_TTL_SECS,
        redis_url: None,
        max_resume_size_bytes: MAX_RESUME_SIZE_BYTES,
        default_page_size: DEFAULT_PAGE_SIZE,
        max_page_size: MAX_PAGE_SIZE,
        otel: OtelConfig::default(),
    }
}
