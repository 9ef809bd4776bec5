use serde::{Deserialize, Serialize};

use super::Id;

/// Aggregates served by `GET /statistiques/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistiques {
    pub total_rdv: u64,
    pub rdv_confirmes: u64,
    pub rdv_annules: u64,
    pub rdv_absences: u64,
    /// Percentage, 0..=100.
    #[serde(default)]
    pub taux_annulation: f64,
    #[serde(default)]
    pub rdv_par_praticien: Vec<RdvParPraticien>,
    #[serde(default)]
    pub rdv_par_specialite: Vec<RdvParSpecialite>,
    #[serde(default)]
    pub rdv_mois: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdvParPraticien {
    pub id: Id,
    #[serde(rename = "user__first_name")]
    pub first_name: String,
    #[serde(rename = "user__last_name")]
    pub last_name: String,
    pub specialite: String,
    pub nb_rdv: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdvParSpecialite {
    pub specialite: String,
    pub nb_rdv: u64,
}

impl Statistiques {
    /// "12.5%", one decimal as on the statistics screen.
    pub fn taux_annulation_display(&self) -> String {
        format!("{:.1}%", self.taux_annulation)
    }
}
