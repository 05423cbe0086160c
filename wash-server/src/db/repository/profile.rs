//! Profile Repository
//!
//! Per-user profile (organization membership) and company settings.

use super::RepoResult;
use shared::models::{CompanySettings, Profile};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
struct ProfileRow {
    user_id: String,
    display_name: Option<String>,
    organization_id: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct CompanySettingsRow {
    company_name: Option<String>,
    address: Option<String>,
    terms_and_conditions: Option<String>,
}

pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> RepoResult<Option<Profile>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT user_id, display_name, organization_id FROM profile WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| Profile {
        user_id: r.user_id,
        display_name: r.display_name.unwrap_or_default(),
        organization_id: r.organization_id.filter(|id| !id.is_empty()),
    }))
}

pub async fn upsert_profile(pool: &SqlitePool, profile: &Profile) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO profile (user_id, display_name, organization_id) VALUES (?1, ?2, ?3) ON CONFLICT(user_id) DO UPDATE SET display_name = excluded.display_name, organization_id = excluded.organization_id",
    )
    .bind(&profile.user_id)
    .bind(&profile.display_name)
    .bind(&profile.organization_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Settings for a user, empty defaults when none are stored yet.
pub async fn get_company_settings(
    pool: &SqlitePool,
    user_id: &str,
) -> RepoResult<CompanySettings> {
    let row = sqlx::query_as::<_, CompanySettingsRow>(
        "SELECT company_name, address, terms_and_conditions FROM company_settings WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row
        .map(|r| CompanySettings {
            company_name: r.company_name.unwrap_or_default(),
            address: r.address.unwrap_or_default(),
            terms_and_conditions: r.terms_and_conditions.unwrap_or_default(),
        })
        .unwrap_or_default())
}

pub async fn upsert_company_settings(
    pool: &SqlitePool,
    user_id: &str,
    settings: &CompanySettings,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO company_settings (user_id, company_name, address, terms_and_conditions) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(user_id) DO UPDATE SET company_name = excluded.company_name, address = excluded.address, terms_and_conditions = excluded.terms_and_conditions",
    )
    .bind(user_id)
    .bind(&settings.company_name)
    .bind(&settings.address)
    .bind(&settings.terms_and_conditions)
    .execute(pool)
    .await?;
    Ok(())
}
