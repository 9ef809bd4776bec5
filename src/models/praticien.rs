use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::CivilitePraticien;
use super::user::User;
use super::Id;

/// Practitioner profile, linked 1:1 to a `User`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Praticien {
    pub id: Id,
    pub user: User,
    pub civilite: CivilitePraticien,
    pub specialite: String,
    #[serde(default)]
    pub numero_rpps: Option<String>,
    #[serde(default)]
    pub telephone: String,
    #[serde(default = "default_actif")]
    pub actif: bool,
    #[serde(default, with = "super::datetime::option")]
    pub date_creation: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nom_complet: Option<String>,
}

fn default_actif() -> bool {
    true
}

impl Praticien {
    /// "Dr Jean Dupont"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.civilite, self.user.full_name())
    }

    /// "Dr Jean Dupont - Cardiologie", as shown in selectors.
    pub fn selector_label(&self) -> String {
        format!("{} - {}", self.display_name(), self.specialite)
    }
}

/// Weekly consultation slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horaire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub praticien: Id,
    /// 1 = lundi … 7 = dimanche
    pub jour_semaine: u8,
    pub heure_debut: NaiveTime,
    pub heure_fin: NaiveTime,
    #[serde(default, skip_serializing)]
    pub jour_semaine_display: Option<String>,
}

/// Leave or other unavailability window (inclusive dates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indisponibilite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub praticien: Id,
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    pub motif: String,
    #[serde(default, skip_serializing)]
    pub praticien_nom: Option<String>,
}

impl Indisponibilite {
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.date_debut <= day && day <= self.date_fin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;

    #[test]
    fn display_name_uses_civilite() {
        let p = fixtures::praticien(3, "Jean", "Dupont", "Cardiologie");
        assert_eq!(p.display_name(), "Dr Jean Dupont");
        assert_eq!(p.selector_label(), "Dr Jean Dupont - Cardiologie");
    }

    #[test]
    fn horaire_parses_backend_times() {
        let h: Horaire = serde_json::from_value(serde_json::json!({
            "id": 1, "praticien": 3, "jour_semaine": 2,
            "heure_debut": "09:00:00", "heure_fin": "12:30:00",
            "jour_semaine_display": "Mardi"
        }))
        .unwrap();
        assert_eq!(h.heure_fin, NaiveTime::from_hms_opt(12, 30, 0).unwrap());
    }

    #[test]
    fn indisponibilite_is_inclusive() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let conge = Indisponibilite {
            id: None,
            praticien: 3,
            date_debut: d("2026-08-01"),
            date_fin: d("2026-08-15"),
            motif: "Congés".into(),
            praticien_nom: None,
        };
        assert!(conge.covers(d("2026-08-01")));
        assert!(conge.covers(d("2026-08-15")));
        assert!(!conge.covers(d("2026-08-16")));
    }
}
