use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;
use super::Id;

/// Audit record. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Id,
    #[serde(with = "super::datetime")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<User>,
    /// Full name of the actor, or "Système".
    #[serde(default)]
    pub user_display: String,
    pub action: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub table_cible: String,
    #[serde(default)]
    pub cible_id: Option<Id>,
    #[serde(default)]
    pub ip_address: Option<IpAddr>,
}
