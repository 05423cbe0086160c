//! Company Settings and User Profile Models

use serde::{Deserialize, Serialize};

/// Per-user company settings consumed by the receipt renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySettings {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub terms_and_conditions: String,
}

/// Creator profile. Records can only be created when the profile carries an
/// organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub organization_id: Option<String>,
}
