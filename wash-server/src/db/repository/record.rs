//! Record Repository
//!
//! CRUD over the authoritative `record` table. Archive state lives in the
//! `archived` flag; the id never changes across archive/unarchive.

use super::RepoResult;
use shared::models::{CustomField, WashRecord};
use shared::util::now_millis;
use sqlx::{FromRow, SqlitePool};

const SELECT_COLUMNS: &str = "id, user_id, invoice_no, timestamp, driver_name, horse_reg, company_name, wash_type, other_wash_type, custom_fields, signature, removed_fields, removed_custom_fields, organization_id, archived";

/// Raw row shape; text columns are coalesced to empty strings and JSON
/// columns parsed leniently when converting to the model.
#[derive(Debug, Clone, FromRow)]
struct RecordRow {
    id: String,
    #[allow(dead_code)]
    user_id: String,
    invoice_no: String,
    timestamp: String,
    driver_name: Option<String>,
    horse_reg: Option<String>,
    company_name: Option<String>,
    wash_type: Option<String>,
    other_wash_type: Option<String>,
    custom_fields: Option<String>,
    signature: Option<String>,
    removed_fields: Option<String>,
    removed_custom_fields: Option<String>,
    organization_id: Option<String>,
    archived: bool,
}

impl RecordRow {
    fn into_record(self) -> WashRecord {
        WashRecord {
            id: self.id,
            invoice_no: self.invoice_no,
            timestamp: self.timestamp,
            driver_name: self.driver_name.unwrap_or_default(),
            horse_reg: self.horse_reg.unwrap_or_default(),
            company_name: self.company_name.unwrap_or_default(),
            wash_type: self.wash_type.unwrap_or_default(),
            other_wash_type: self.other_wash_type.unwrap_or_default(),
            custom_fields: parse_custom_fields(self.custom_fields.as_deref()),
            signature: self.signature.unwrap_or_default(),
            removed_fields: parse_strings(self.removed_fields.as_deref()),
            removed_custom_fields: parse_custom_fields(self.removed_custom_fields.as_deref()),
            organization_id: self.organization_id,
        }
    }
}

/// Lenient JSON array parse: invalid JSON → empty, malformed entries dropped.
fn parse_custom_fields(json: Option<&str>) -> Vec<CustomField> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(json.unwrap_or("[]")).unwrap_or_default();
    values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect()
}

fn parse_strings(json: Option<&str>) -> Vec<String> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(json.unwrap_or("[]")).unwrap_or_default();
    values
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

fn encode_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// All records in one set, ordered as the backing store returns them.
pub async fn list(pool: &SqlitePool, archived: bool) -> RepoResult<Vec<WashRecord>> {
    let rows = sqlx::query_as::<_, RecordRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM record WHERE archived = ?"
    ))
    .bind(archived)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(RecordRow::into_record).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<WashRecord>> {
    Ok(find_with_state(pool, id).await?.map(|(record, _)| record))
}

/// Record plus its current archive flag.
pub async fn find_with_state(
    pool: &SqlitePool,
    id: &str,
) -> RepoResult<Option<(WashRecord, bool)>> {
    let row = sqlx::query_as::<_, RecordRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM record WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| {
        let archived = r.archived;
        (r.into_record(), archived)
    }))
}

/// Whether an active record already carries this invoice number.
pub async fn invoice_exists_active(pool: &SqlitePool, invoice_no: &str) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM record WHERE invoice_no = ? AND archived = 0",
    )
    .bind(invoice_no)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Every invoice number, active and archived — the generation-time
/// uniqueness set.
pub async fn all_invoice_numbers(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let numbers = sqlx::query_scalar::<_, String>("SELECT invoice_no FROM record")
        .fetch_all(pool)
        .await?;
    Ok(numbers)
}

pub async fn insert(pool: &SqlitePool, record: &WashRecord, user_id: &str) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query(
        "INSERT INTO record (id, user_id, invoice_no, timestamp, driver_name, horse_reg, company_name, wash_type, other_wash_type, custom_fields, signature, removed_fields, removed_custom_fields, organization_id, archived, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 0, ?15, ?15)",
    )
    .bind(&record.id)
    .bind(user_id)
    .bind(&record.invoice_no)
    .bind(&record.timestamp)
    .bind(&record.driver_name)
    .bind(&record.horse_reg)
    .bind(&record.company_name)
    .bind(&record.wash_type)
    .bind(&record.other_wash_type)
    .bind(encode_json(&record.custom_fields))
    .bind(&record.signature)
    .bind(encode_json(&record.removed_fields))
    .bind(encode_json(&record.removed_custom_fields))
    .bind(&record.organization_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Replace a record by id. Returns false when the id is absent.
pub async fn update(pool: &SqlitePool, record: &WashRecord) -> RepoResult<bool> {
    let now = now_millis();
    let result = sqlx::query(
        "UPDATE record SET invoice_no = ?1, timestamp = ?2, driver_name = ?3, horse_reg = ?4, company_name = ?5, wash_type = ?6, other_wash_type = ?7, custom_fields = ?8, signature = ?9, removed_fields = ?10, removed_custom_fields = ?11, organization_id = ?12, updated_at = ?13 WHERE id = ?14",
    )
    .bind(&record.invoice_no)
    .bind(&record.timestamp)
    .bind(&record.driver_name)
    .bind(&record.horse_reg)
    .bind(&record.company_name)
    .bind(&record.wash_type)
    .bind(&record.other_wash_type)
    .bind(encode_json(&record.custom_fields))
    .bind(&record.signature)
    .bind(encode_json(&record.removed_fields))
    .bind(encode_json(&record.removed_custom_fields))
    .bind(&record.organization_id)
    .bind(now)
    .bind(&record.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Flip the archive flag. Returns false when the id is absent.
pub async fn set_archived(pool: &SqlitePool, id: &str, archived: bool) -> RepoResult<bool> {
    let now = now_millis();
    let result = sqlx::query("UPDATE record SET archived = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(archived)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Permanently remove a record row. Returns false when the id is absent.
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM record WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{CustomFieldPatch, CustomFieldType, RecordInit};

    fn sample_record(invoice_no: &str) -> WashRecord {
        WashRecord::create_with(RecordInit {
            invoice_no: Some(invoice_no.to_string()),
            timestamp: Some("2024-03-01T09:30:00+00:00".to_string()),
        })
        .set_field("driver_name", "J. Mercer")
        .set_field("wash_type", "full_wash")
    }

    #[tokio::test]
    async fn test_insert_and_round_trip() {
        let db = DbService::in_memory().await.unwrap();
        let record = sample_record("INV-AAA001")
            .add_custom_field(CustomFieldType::Dropdown)
            .finalize("c2ln");
        let id = record.custom_fields[0].id.clone();
        let record = record.update_custom_field(
            &id,
            CustomFieldPatch {
                label: Some("Priority".into()),
                value: Some("High".into()),
                options: Some(vec!["Low".into(), "High".into()]),
            },
        );

        insert(&db.pool, &record, "user-1").await.unwrap();

        let loaded = find_by_id(&db.pool, &record.id).await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_malformed_custom_field_entries_are_dropped() {
        let db = DbService::in_memory().await.unwrap();
        let record = sample_record("INV-AAA002");
        insert(&db.pool, &record, "user-1").await.unwrap();

        // Corrupt one entry in the stored array; load must not fail
        sqlx::query("UPDATE record SET custom_fields = ? WHERE id = ?")
            .bind(r#"[{"id":"cf-1","type":"text","label":"Kept","value":"x","options":[]},{"bogus":true}]"#)
            .bind(&record.id)
            .execute(&db.pool)
            .await
            .unwrap();

        let loaded = find_by_id(&db.pool, &record.id).await.unwrap().unwrap();
        assert_eq!(loaded.custom_fields.len(), 1);
        assert_eq!(loaded.custom_fields[0].label, "Kept");
    }

    #[tokio::test]
    async fn test_archive_flag_partitions_lists() {
        let db = DbService::in_memory().await.unwrap();
        let record = sample_record("INV-AAA003");
        insert(&db.pool, &record, "user-1").await.unwrap();

        assert_eq!(list(&db.pool, false).await.unwrap().len(), 1);
        assert!(list(&db.pool, true).await.unwrap().is_empty());

        assert!(set_archived(&db.pool, &record.id, true).await.unwrap());
        assert!(list(&db.pool, false).await.unwrap().is_empty());
        assert_eq!(list(&db.pool, true).await.unwrap().len(), 1);

        let (_, archived) = find_with_state(&db.pool, &record.id)
            .await
            .unwrap()
            .unwrap();
        assert!(archived);
    }

    #[tokio::test]
    async fn test_invoice_uniqueness_queries() {
        let db = DbService::in_memory().await.unwrap();
        insert(&db.pool, &sample_record("INV-AAA004"), "user-1")
            .await
            .unwrap();
        let archived = sample_record("INV-AAA005");
        insert(&db.pool, &archived, "user-1").await.unwrap();
        set_archived(&db.pool, &archived.id, true).await.unwrap();

        assert!(invoice_exists_active(&db.pool, "INV-AAA004").await.unwrap());
        // Archived invoices are not an active conflict...
        assert!(!invoice_exists_active(&db.pool, "INV-AAA005").await.unwrap());
        // ...but still part of the generation-time set
        let all = all_invoice_numbers(&db.pool).await.unwrap();
        assert!(all.contains(&"INV-AAA005".to_string()));
    }

    #[tokio::test]
    async fn test_update_and_delete_report_missing_ids() {
        let db = DbService::in_memory().await.unwrap();
        let record = sample_record("INV-AAA006");

        assert!(!update(&db.pool, &record).await.unwrap());
        assert!(!delete(&db.pool, &record.id).await.unwrap());

        insert(&db.pool, &record, "user-1").await.unwrap();
        let changed = record.set_field("driver_name", "Reyes");
        assert!(update(&db.pool, &changed).await.unwrap());
        let loaded = find_by_id(&db.pool, &changed.id).await.unwrap().unwrap();
        assert_eq!(loaded.driver_name, "Reyes");

        assert!(delete(&db.pool, &changed.id).await.unwrap());
        assert!(find_by_id(&db.pool, &changed.id).await.unwrap().is_none());
    }
}
