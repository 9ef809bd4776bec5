use serde::{Deserialize, Deserializer, Serialize};

use super::enums::Role;
use super::Id;

/// Minimal profile link returned with the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRef {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialite: Option<String>,
}

/// Account record. Owned by the backend; mutated only via auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// `None` when absent, null or unrecognized: role checks fail closed.
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub praticien_profile: Option<ProfileRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_profile: Option<ProfileRef>,
}

fn default_active() -> bool {
    true
}

fn lenient_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Role>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Two-letter avatar initials, e.g. "JD".
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect::<String>()
            .to_uppercase()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    pub fn praticien_id(&self) -> Option<Id> {
        self.praticien_profile.as_ref().map(|p| p.id)
    }

    pub fn patient_id(&self) -> Option<Id> {
        self.patient_profile.as_ref().map(|p| p.id)
    }

    /// Case-insensitive match on first or last name.
    pub(crate) fn name_contains(&self, needle_lower: &str) -> bool {
        self.first_name.to_lowercase().contains(needle_lower)
            || self.last_name.to_lowercase().contains(needle_lower)
    }
}
