use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::StatutRdv;
use super::patient::Patient;
use super::praticien::Praticien;
use super::Id;

/// Appointment (RDV). Exactly one patient and one practitioner for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendezVous {
    pub id: Id,
    pub patient: Patient,
    pub praticien: Praticien,
    #[serde(with = "super::datetime")]
    pub date_heure: DateTime<Utc>,
    pub motif: String,
    pub statut: StatutRdv,
    #[serde(default)]
    pub notes: String,
    #[serde(default, with = "super::datetime::option")]
    pub date_creation: Option<DateTime<Utc>>,
    #[serde(default, with = "super::datetime::option")]
    pub date_modification: Option<DateTime<Utc>>,
    #[serde(default)]
    pub statut_display: Option<String>,
    #[serde(default)]
    pub is_passe: Option<bool>,
}

impl RendezVous {
    pub fn patient_id(&self) -> Id {
        self.patient.id
    }

    pub fn praticien_id(&self) -> Id {
        self.praticien.id
    }

    /// Still expected to happen: pending or confirmed.
    pub fn is_active(&self) -> bool {
        matches!(self.statut, StatutRdv::EnAttente | StatutRdv::Confirme)
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date_heure < now
    }

    /// Calendar day of the appointment (UTC).
    pub fn day(&self) -> NaiveDate {
        self.date_heure.date_naive()
    }

    /// Case-insensitive match on patient/practitioner names or the motif.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.patient.user.name_contains(&needle)
            || self.praticien.user.name_contains(&needle)
            || self.motif.to_lowercase().contains(&needle)
    }
}

/// Body for `POST /rendez-vous/` and `PUT /rendez-vous/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RendezVousPayload {
    pub patient_id: Id,
    pub praticien_id: Id,
    #[serde(with = "super::datetime")]
    pub date_heure: DateTime<Utc>,
    pub motif: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<StatutRdv>,
}

impl RendezVousPayload {
    /// Full update body for an existing record with a new status.
    pub fn with_statut(rdv: &RendezVous, statut: StatutRdv) -> Self {
        Self {
            patient_id: rdv.patient_id(),
            praticien_id: rdv.praticien_id(),
            date_heure: rdv.date_heure,
            motif: rdv.motif.clone(),
            notes: rdv.notes.clone(),
            statut: Some(statut),
        }
    }
}
