//! Record Mirror
//!
//! Local redb snapshot of the authoritative record table. Each record set
//! (active / archived) is stored whole as a JSON array under one key, so a
//! load always sees a consistent snapshot even if a past writer appended a
//! duplicate. Duplicate ids are resolved on every load: the last occurrence
//! wins, placed at the first occurrence's position.

use std::collections::HashMap;
use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::WashRecord;
use thiserror::Error;
use tracing::warn;

use super::RecordScope;

const RECORD_SETS: TableDefinition<&str, &[u8]> = TableDefinition::new("record_sets");
const TEMPLATE_BINDINGS: TableDefinition<&str, &str> = TableDefinition::new("template_bindings");

/// Binding key for the tenant-wide default template.
pub const DEFAULT_TEMPLATE_KEY: &str = "__default";

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("mirror database error: {0}")]
    Database(#[from] redb::DatabaseError),
    #[error("mirror transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),
    #[error("mirror table error: {0}")]
    Table(#[from] redb::TableError),
    #[error("mirror storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("mirror commit error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("mirror serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type MirrorResult<T> = Result<T, MirrorError>;

pub struct RecordMirror {
    db: Database,
}

impl RecordScope {
    fn set_key(self) -> &'static str {
        match self {
            RecordScope::Active => "active_records",
            RecordScope::Archived => "archived_records",
        }
    }
}

impl RecordMirror {
    pub fn open<P: AsRef<Path>>(path: P) -> MirrorResult<Self> {
        let db = Database::create(path)?;
        Self::with_database(db)
    }

    /// Backed by memory only; state is lost on drop.
    pub fn open_in_memory() -> MirrorResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::with_database(db)
    }

    fn with_database(db: Database) -> MirrorResult<Self> {
        // Ensure tables exist so reads never race table creation
        let txn = db.begin_write()?;
        {
            txn.open_table(RECORD_SETS)?;
            txn.open_table(TEMPLATE_BINDINGS)?;
        }
        txn.commit()?;
        Ok(Self { db })
    }

    // ========== Record Sets ==========

    /// Load one set. Unreadable or corrupt payloads degrade to empty.
    pub fn load(&self, scope: RecordScope) -> MirrorResult<Vec<WashRecord>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(RECORD_SETS)?;
        let Some(guard) = table.get(scope.set_key())? else {
            return Ok(Vec::new());
        };
        let records: Vec<WashRecord> = match serde_json::from_slice(guard.value()) {
            Ok(records) => records,
            Err(err) => {
                warn!(set = scope.set_key(), error = %err, "discarding unreadable mirror set");
                return Ok(Vec::new());
            }
        };
        Ok(dedup_last_wins(records))
    }

    /// Replace one set wholesale with a fresh snapshot.
    pub fn store(&self, scope: RecordScope, records: &[WashRecord]) -> MirrorResult<()> {
        let payload = serde_json::to_vec(records)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(RECORD_SETS)?;
            table.insert(scope.set_key(), payload.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Insert or replace one record within a set.
    pub fn upsert(&self, scope: RecordScope, record: &WashRecord) -> MirrorResult<()> {
        let mut records = self.load(scope)?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record.clone(),
            None => records.push(record.clone()),
        }
        self.store(scope, &records)
    }

    /// Remove one record from a set. Returns the record when it was present.
    pub fn remove(&self, scope: RecordScope, id: &str) -> MirrorResult<Option<WashRecord>> {
        let mut records = self.load(scope)?;
        let Some(position) = records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let removed = records.remove(position);
        self.store(scope, &records)?;
        Ok(Some(removed))
    }

    /// Move a record between sets, e.g. active → archived.
    pub fn move_between(
        &self,
        from: RecordScope,
        to: RecordScope,
        record: &WashRecord,
    ) -> MirrorResult<()> {
        self.remove(from, &record.id)?;
        self.upsert(to, record)
    }

    // ========== Template Bindings ==========

    /// Template bound to a record id, falling back to the default binding.
    pub fn template_for(&self, record_id: &str) -> MirrorResult<Option<String>> {
        if let Some(bound) = self.binding(record_id)? {
            return Ok(Some(bound));
        }
        self.binding(DEFAULT_TEMPLATE_KEY)
    }

    pub fn binding(&self, key: &str) -> MirrorResult<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TEMPLATE_BINDINGS)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    pub fn bind_template(&self, key: &str, template_id: &str) -> MirrorResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TEMPLATE_BINDINGS)?;
            table.insert(key, template_id)?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn unbind_template(&self, key: &str) -> MirrorResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TEMPLATE_BINDINGS)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }
}

/// Last occurrence wins, kept at the first occurrence's position.
fn dedup_last_wins(records: Vec<WashRecord>) -> Vec<WashRecord> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<WashRecord> = Vec::with_capacity(records.len());
    for record in records {
        match seen.get(&record.id) {
            Some(&index) => out[index] = record,
            None => {
                seen.insert(record.id.clone(), out.len());
                out.push(record);
            }
        }
    }
    out
}
