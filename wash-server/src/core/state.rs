//! Server State
//!
//! Shared handles for every request handler. Cloning is shallow; the pool
//! and mirror are reference-counted internally.

use std::sync::Arc;

use anyhow::Context;

use crate::core::Config;
use crate::db::DbService;
use crate::store::{RecordMirror, RecordStore};

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: sqlx::SqlitePool,
    pub mirror: Arc<RecordMirror>,
    pub store: RecordStore,
}

impl ServerState {
    /// Open the database and mirror under `work_dir` and wire the store.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .with_context(|| format!("creating work dir {}", config.work_dir))?;

        let db = DbService::new(&config.database_path())
            .await
            .context("opening sqlite database")?;
        let mirror = Arc::new(
            RecordMirror::open(config.mirror_path()).context("opening record mirror")?,
        );
        let store = RecordStore::new(db.pool.clone(), Arc::clone(&mirror));

        tracing::info!(work_dir = %config.work_dir, "server state initialized");
        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            mirror,
            store,
        })
    }

    /// In-memory state for tests: private SQLite plus ephemeral mirror.
    pub async fn for_tests() -> anyhow::Result<Self> {
        let db = DbService::in_memory().await?;
        let mirror = Arc::new(RecordMirror::open_in_memory()?);
        let store = RecordStore::new(db.pool.clone(), Arc::clone(&mirror));
        Ok(Self {
            config: Config {
                work_dir: String::new(),
                http_port: 0,
                environment: "test".into(),
                log_level: "debug".into(),
            },
            pool: db.pool,
            mirror,
            store,
        })
    }
}
