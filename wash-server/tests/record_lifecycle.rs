//! End-to-end record lifecycle against a full in-memory server state.

use shared::models::{CustomFieldPatch, CustomFieldType, Profile, RecordInit, WashRecord};
use shared::{FilterSpec, filter};
use wash_server::{ArchiveOutcome, RecordScope, ServerState, StoreError};

async fn state_with_org_user() -> ServerState {
    let state = ServerState::for_tests().await.unwrap();
    wash_server::db::repository::profile::upsert_profile(
        &state.pool,
        &Profile {
            user_id: "user-1".to_string(),
            display_name: "Yard Manager".to_string(),
            organization_id: Some("org-1".to_string()),
        },
    )
    .await
    .unwrap();
    state
}

fn draft(invoice_no: &str, timestamp: &str) -> WashRecord {
    WashRecord::create_with(RecordInit {
        invoice_no: Some(invoice_no.to_string()),
        timestamp: Some(timestamp.to_string()),
    })
}

#[tokio::test]
async fn create_filter_archive_restore_delete() {
    let state = state_with_org_user().await;

    // Build a record with a dropdown custom field and save it
    let record = draft("INV-E2E001", "2024-04-05T10:00:00+00:00")
        .set_field("driver_name", "Lena Brandt")
        .set_field("wash_type", "full_wash")
        .add_custom_field(CustomFieldType::Dropdown);
    let field_id = record.custom_fields[0].id.clone();
    let record = record
        .update_custom_field(
            &field_id,
            CustomFieldPatch {
                label: Some("Priority".to_string()),
                value: Some("High".to_string()),
                options: Some(vec!["Low".to_string(), "High".to_string()]),
            },
        )
        .finalize("data:image/png;base64,AAAA");
    let saved = state.store.save(record, "user-1").await.unwrap();
    assert_eq!(saved.organization_id.as_deref(), Some("org-1"));

    // Second record on a different day, no custom fields
    let other = draft("INV-E2E002", "2024-04-20T16:30:00+00:00")
        .set_field("driver_name", "Marco Silva");
    state.store.save(other, "user-1").await.unwrap();

    let active = state.store.list(RecordScope::Active).await.unwrap();
    assert_eq!(active.len(), 2);

    // Case-insensitive label-value filter only matches the labelled record
    let mut spec = FilterSpec::default();
    spec.fields.insert("Priority".to_string(), "high".to_string());
    let hits = filter(&active, &spec);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].invoice_no, "INV-E2E001");

    // Inclusive date window catches only the April 5 record
    let spec = FilterSpec {
        date_from: chrono::NaiveDate::from_ymd_opt(2024, 4, 1),
        date_to: chrono::NaiveDate::from_ymd_opt(2024, 4, 5),
        ..FilterSpec::default()
    };
    let hits = filter(&active, &spec);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].invoice_no, "INV-E2E001");

    // Archive round trip keeps the id stable
    let outcome = state.store.archive(&saved.id).await.unwrap();
    assert_eq!(outcome, ArchiveOutcome::Archived);
    let archived = state.store.list(RecordScope::Archived).await.unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, saved.id);

    let restored = state.store.unarchive(&saved.id).await.unwrap();
    assert_eq!(restored.id, saved.id);
    assert_eq!(state.store.list(RecordScope::Active).await.unwrap().len(), 2);

    // Delete is permanent on both stores
    state.store.delete(&saved.id).await.unwrap();
    assert!(matches!(
        state.store.get(&saved.id).await.unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert_eq!(
        state.store.list_cached(RecordScope::Active).unwrap().len(),
        1
    );
}

#[tokio::test]
async fn duplicate_invoice_applies_to_active_set_only() {
    let state = state_with_org_user().await;

    let first = state
        .store
        .save(draft("INV-E2E100", "2024-01-01T09:00:00+00:00"), "user-1")
        .await
        .unwrap();

    let err = state
        .store
        .save(draft("INV-E2E100", "2024-01-02T09:00:00+00:00"), "user-1")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateInvoice(_)));

    // Once archived, the number can be reused by a new active record
    state.store.archive(&first.id).await.unwrap();
    state
        .store
        .save(draft("INV-E2E100", "2024-01-03T09:00:00+00:00"), "user-1")
        .await
        .unwrap();

    // Generation never hands out a number in use by either set
    let generated = state.store.generate_invoice_no().await.unwrap();
    assert_ne!(generated, "INV-E2E100");
}

#[tokio::test]
async fn validation_blocks_duplicate_dropdown_options() {
    let state = state_with_org_user().await;

    let record = draft("INV-E2E200", "2024-02-01T09:00:00+00:00")
        .add_custom_field(CustomFieldType::Dropdown);
    let field_id = record.custom_fields[0].id.clone();
    let record = record.update_custom_field(
        &field_id,
        CustomFieldPatch {
            label: Some("Bay".to_string()),
            value: None,
            options: Some(vec!["North".to_string(), "North".to_string()]),
        },
    );

    let err = state.store.save(record, "user-1").await.unwrap_err();
    match err {
        StoreError::DuplicateOption(e) => {
            assert_eq!(e.label, "Bay");
            assert_eq!(e.option, "North");
        }
        other => panic!("expected DuplicateOption, got {other:?}"),
    }
}

#[tokio::test]
async fn user_without_organization_cannot_save() {
    let state = ServerState::for_tests().await.unwrap();
    let err = state
        .store
        .save(draft("INV-E2E300", "2024-03-01T09:00:00+00:00"), "user-9")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NoOrganization));
    assert!(state.store.list(RecordScope::Active).await.unwrap().is_empty());
}

#[tokio::test]
async fn removed_field_semantics_survive_persistence() {
    let state = state_with_org_user().await;

    let record = draft("INV-E2E400", "2024-05-01T09:00:00+00:00")
        .set_field("driver_name", "Kim")
        .add_custom_field(CustomFieldType::Checkbox);
    let field_id = record.custom_fields[0].id.clone();
    let record = record
        .update_custom_field(
            &field_id,
            CustomFieldPatch {
                label: Some("Extras".to_string()),
                value: Some("Wax,Polish".to_string()),
                options: Some(vec!["Wax".to_string(), "Polish".to_string()]),
            },
        )
        .remove_fixed_field("driver_name")
        .remove_custom_field(&field_id);

    let saved = state.store.save(record, "user-1").await.unwrap();
    let loaded = state.store.get(&saved.id).await.unwrap();

    // Fixed removal hides the key and clears the value
    assert!(loaded.removed_fields.contains(&"driver_name".to_string()));
    assert!(loaded.driver_name.is_empty());

    // Custom removal keeps the full object for restore
    assert!(loaded.custom_fields.is_empty());
    assert_eq!(loaded.removed_custom_fields.len(), 1);
    let removed = loaded.removed_custom_fields[0].clone();
    assert_eq!(removed.value, "Wax,Polish");

    // Restore brings back value and options intact
    let restored = loaded
        .restore_custom_field(removed)
        .restore_fixed_field("driver_name");
    let updated = state.store.update(restored).await.unwrap();
    assert_eq!(updated.custom_fields.len(), 1);
    assert_eq!(updated.custom_fields[0].checkbox_values(), vec!["Wax", "Polish"]);
    assert!(updated.removed_custom_fields.is_empty());
    assert!(updated.removed_fields.is_empty());
}
