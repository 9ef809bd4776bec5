use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::StatutAnnulation;
use super::rendez_vous::RendezVous;
use super::Id;

/// Cancellation request raised by a patient against one appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annulation {
    pub id: Id,
    pub rdv: RendezVous,
    pub motif: String,
    pub statut: StatutAnnulation,
    #[serde(with = "super::datetime")]
    pub date_demande: DateTime<Utc>,
    #[serde(default, with = "super::datetime::option")]
    pub date_traitement: Option<DateTime<Utc>>,
    #[serde(default)]
    pub statut_display: Option<String>,
}

impl Annulation {
    pub fn rdv_id(&self) -> Id {
        self.rdv.id
    }

    pub fn is_pending(&self) -> bool {
        self.statut == StatutAnnulation::EnAttente
    }
}

/// Body for `POST /annulations/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAnnulation {
    pub rdv_id: Id,
    pub motif: String,
}

/// Response of `POST /annulations/{id}/accepter|refuser/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnulationResolution {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub annulation: Option<Annulation>,
}
