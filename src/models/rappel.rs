use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::TypeRappel;
use super::rendez_vous::RendezVous;
use super::Id;

/// Scheduled reminder for an appointment. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rappel {
    pub id: Id,
    #[serde(default)]
    pub rdv: Option<RendezVous>,
    pub type_rappel: TypeRappel,
    #[serde(default)]
    pub envoye: bool,
    #[serde(with = "super::datetime")]
    pub date_envoi_prevue: DateTime<Utc>,
    #[serde(default, with = "super::datetime::option")]
    pub date_envoi_effectif: Option<DateTime<Utc>>,
    #[serde(default)]
    pub type_rappel_display: Option<String>,
}

impl Rappel {
    pub fn rdv_id(&self) -> Option<Id> {
        self.rdv.as_ref().map(|r| r.id)
    }
}
