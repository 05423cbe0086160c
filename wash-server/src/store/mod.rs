//! Record Store
//!
//! Orchestrates the authoritative SQLite table and the local redb mirror.
//! Every write goes to SQLite first; the mirror is updated only after the
//! write succeeds, so a remote failure never leaves a phantom record in the
//! local snapshot.

pub mod mirror;

use std::sync::Arc;

use shared::models::{DuplicateOptionError, WashRecord};
use shared::util::invoice_code;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::repository::{self, RepoError};
pub use mirror::{MirrorError, RecordMirror, DEFAULT_TEMPLATE_KEY};

/// Which record set an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    Active,
    Archived,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invoice number already in use: {0}")]
    DuplicateInvoice(String),
    #[error(transparent)]
    DuplicateOption(#[from] DuplicateOptionError),
    #[error("user does not belong to an organization")]
    NoOrganization,
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("remote store failure: {0}")]
    Remote(String),
    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

impl From<RepoError> for StoreError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => StoreError::NotFound(what),
            RepoError::Duplicate(what) => StoreError::DuplicateInvoice(what),
            other => StoreError::Remote(other.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of an archive request; archiving twice is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Archived,
    AlreadyArchived,
}

#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
    mirror: Arc<RecordMirror>,
}

impl RecordStore {
    pub fn new(pool: SqlitePool, mirror: Arc<RecordMirror>) -> Self {
        Self { pool, mirror }
    }

    // ========== Reads ==========

    /// Authoritative list; refreshes the mirror snapshot as a side effect.
    pub async fn list(&self, scope: RecordScope) -> StoreResult<Vec<WashRecord>> {
        let records = repository::record::list(&self.pool, scope == RecordScope::Archived).await?;
        if let Err(err) = self.mirror.store(scope, &records) {
            warn!(error = %err, "mirror refresh failed, continuing with remote data");
        }
        Ok(records)
    }

    /// Last-known snapshot from the mirror, for when the remote is down.
    pub fn list_cached(&self, scope: RecordScope) -> StoreResult<Vec<WashRecord>> {
        Ok(self.mirror.load(scope)?)
    }

    pub async fn get(&self, id: &str) -> StoreResult<WashRecord> {
        repository::record::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    // ========== Invoice Numbers ==========

    /// A code unused by any record, active or archived. Re-rolls on
    /// collision.
    pub async fn generate_invoice_no(&self) -> StoreResult<String> {
        let taken = repository::record::all_invoice_numbers(&self.pool).await?;
        loop {
            let candidate = invoice_code();
            if !taken.contains(&candidate) {
                return Ok(candidate);
            }
            debug!(candidate, "invoice code collision, re-rolling");
        }
    }

    // ========== Writes ==========

    /// Validate, gate on organization membership, enforce invoice
    /// uniqueness among active records, then persist remote-first.
    pub async fn save(&self, record: WashRecord, user_id: &str) -> StoreResult<WashRecord> {
        record.validate()?;

        let profile = repository::profile::get_profile(&self.pool, user_id).await?;
        let organization_id = profile
            .and_then(|p| p.organization_id)
            .ok_or(StoreError::NoOrganization)?;

        if repository::record::invoice_exists_active(&self.pool, &record.invoice_no).await? {
            return Err(StoreError::DuplicateInvoice(record.invoice_no));
        }

        let record = WashRecord {
            organization_id: Some(organization_id),
            ..record
        };
        repository::record::insert(&self.pool, &record, user_id).await?;
        self.mirror.upsert(RecordScope::Active, &record)?;
        Ok(record)
    }

    pub async fn update(&self, record: WashRecord) -> StoreResult<WashRecord> {
        record.validate()?;

        let Some((_, archived)) =
            repository::record::find_with_state(&self.pool, &record.id).await?
        else {
            return Err(StoreError::NotFound(record.id));
        };
        if !repository::record::update(&self.pool, &record).await? {
            return Err(StoreError::NotFound(record.id));
        }
        let scope = if archived {
            RecordScope::Archived
        } else {
            RecordScope::Active
        };
        self.mirror.upsert(scope, &record)?;
        Ok(record)
    }

    // ========== Lifecycle ==========

    pub async fn archive(&self, id: &str) -> StoreResult<ArchiveOutcome> {
        let Some((record, archived)) = repository::record::find_with_state(&self.pool, id).await?
        else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        if archived {
            return Ok(ArchiveOutcome::AlreadyArchived);
        }
        repository::record::set_archived(&self.pool, id, true).await?;
        self.mirror
            .move_between(RecordScope::Active, RecordScope::Archived, &record)?;
        Ok(ArchiveOutcome::Archived)
    }

    pub async fn unarchive(&self, id: &str) -> StoreResult<WashRecord> {
        let Some((record, archived)) = repository::record::find_with_state(&self.pool, id).await?
        else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        if archived {
            repository::record::set_archived(&self.pool, id, false).await?;
            self.mirror
                .move_between(RecordScope::Archived, RecordScope::Active, &record)?;
        }
        Ok(record)
    }

    /// Permanent removal; also drops the record's template binding.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let Some((_, archived)) = repository::record::find_with_state(&self.pool, id).await?
        else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        repository::record::delete(&self.pool, id).await?;
        let scope = if archived {
            RecordScope::Archived
        } else {
            RecordScope::Active
        };
        self.mirror.remove(scope, id)?;
        self.mirror.unbind_template(id)?;
        Ok(())
    }

    // ========== Template Bindings ==========

    pub fn template_for(&self, record_id: &str) -> StoreResult<Option<String>> {
        Ok(self.mirror.template_for(record_id)?)
    }

    pub fn bind_template(&self, record_id: &str, template_id: &str) -> StoreResult<()> {
        Ok(self.mirror.bind_template(record_id, template_id)?)
    }

    pub fn default_template(&self) -> StoreResult<Option<String>> {
        Ok(self.mirror.binding(DEFAULT_TEMPLATE_KEY)?)
    }

    pub fn set_default_template(&self, template_id: &str) -> StoreResult<()> {
        Ok(self.mirror.bind_template(DEFAULT_TEMPLATE_KEY, template_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{Profile, RecordInit};

    async fn store_with_user(user_id: &str, organization_id: Option<&str>) -> RecordStore {
        let db = DbService::in_memory().await.unwrap();
        let mirror = Arc::new(RecordMirror::open_in_memory().unwrap());
        repository::profile::upsert_profile(
            &db.pool,
            &Profile {
                user_id: user_id.to_string(),
                display_name: "Tester".to_string(),
                organization_id: organization_id.map(str::to_string),
            },
        )
        .await
        .unwrap();
        RecordStore::new(db.pool, mirror)
    }

    fn draft(invoice_no: &str) -> WashRecord {
        WashRecord::create_with(RecordInit {
            invoice_no: Some(invoice_no.to_string()),
            timestamp: Some("2024-05-02T08:00:00+00:00".to_string()),
        })
        .set_field("driver_name", "Okafor")
    }

    #[tokio::test]
    async fn test_save_requires_organization() {
        let store = store_with_user("user-1", None).await;
        let err = store.save(draft("INV-TEST01"), "user-1").await.unwrap_err();
        assert!(matches!(err, StoreError::NoOrganization));
        // Unknown user behaves the same as a user without an organization
        let err = store.save(draft("INV-TEST01"), "ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NoOrganization));
    }

    #[tokio::test]
    async fn test_save_stamps_organization_and_mirrors() {
        let store = store_with_user("user-1", Some("org-7")).await;
        let saved = store.save(draft("INV-TEST02"), "user-1").await.unwrap();
        assert_eq!(saved.organization_id.as_deref(), Some("org-7"));

        let cached = store.list_cached(RecordScope::Active).unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].id, saved.id);
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_active_invoice() {
        let store = store_with_user("user-1", Some("org-7")).await;
        store.save(draft("INV-TEST03"), "user-1").await.unwrap();
        let err = store.save(draft("INV-TEST03"), "user-1").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateInvoice(_)));

        // Archiving the holder frees the number for new active records
        let held = store.list(RecordScope::Active).await.unwrap()[0].clone();
        store.archive(&held.id).await.unwrap();
        store.save(draft("INV-TEST03"), "user-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_archive_is_idempotent_and_moves_mirror_sets() {
        let store = store_with_user("user-1", Some("org-7")).await;
        let saved = store.save(draft("INV-TEST04"), "user-1").await.unwrap();

        assert_eq!(store.archive(&saved.id).await.unwrap(), ArchiveOutcome::Archived);
        assert_eq!(
            store.archive(&saved.id).await.unwrap(),
            ArchiveOutcome::AlreadyArchived
        );
        assert!(store.list_cached(RecordScope::Active).unwrap().is_empty());
        assert_eq!(store.list_cached(RecordScope::Archived).unwrap().len(), 1);

        let restored = store.unarchive(&saved.id).await.unwrap();
        assert_eq!(restored.id, saved.id);
        assert_eq!(store.list_cached(RecordScope::Active).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_row_mirror_and_binding() {
        let store = store_with_user("user-1", Some("org-7")).await;
        let saved = store.save(draft("INV-TEST05"), "user-1").await.unwrap();
        store.bind_template(&saved.id, "compact").unwrap();
        store.set_default_template("classic").unwrap();

        store.delete(&saved.id).await.unwrap();
        assert!(matches!(
            store.get(&saved.id).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(store.list_cached(RecordScope::Active).unwrap().is_empty());
        // Per-record binding gone, default binding untouched
        assert_eq!(store.template_for(&saved.id).unwrap().as_deref(), Some("classic"));

        let err = store.delete(&saved.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_generate_invoice_no_shape() {
        let store = store_with_user("user-1", Some("org-7")).await;
        let code = store.generate_invoice_no().await.unwrap();
        assert!(code.starts_with("INV-"));
        assert_eq!(code.len(), 10);
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_id() {
        let store = store_with_user("user-1", Some("org-7")).await;
        let err = store.update(draft("INV-TEST06")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
