//! Client-side list filters. Each screen keeps the full fetched list and
//! re-applies its filter on every change; nothing here touches the network.

use chrono::{DateTime, NaiveDate, Utc};

use super::enums::{StatutAnnulation, StatutRdv, TypeRappel};
use super::{Annulation, LogEntry, Patient, Praticien, Rappel, RendezVous};

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RendezVousFilter {
    pub statut: Option<StatutRdv>,
    pub search: Option<String>,
    /// Inclusive, from 00:00 UTC.
    pub date_debut: Option<NaiveDate>,
    /// Inclusive, through the end of the day.
    pub date_fin: Option<NaiveDate>,
}

impl RendezVousFilter {
    pub fn is_active(&self) -> bool {
        self.statut.is_some()
            || non_blank(&self.search).is_some()
            || self.date_debut.is_some()
            || self.date_fin.is_some()
    }

    pub fn matches(&self, rdv: &RendezVous) -> bool {
        if let Some(statut) = self.statut {
            if rdv.statut != statut {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            if !rdv.matches_search(search) {
                return false;
            }
        }
        if let Some(debut) = self.date_debut {
            if rdv.day() < debut {
                return false;
            }
        }
        if let Some(fin) = self.date_fin {
            if rdv.day() > fin {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, list: &'a [RendezVous]) -> Vec<&'a RendezVous> {
        list.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PraticienFilter {
    /// Name or specialite.
    pub search: Option<String>,
    pub actif: Option<bool>,
}

impl PraticienFilter {
    pub fn matches(&self, p: &Praticien) -> bool {
        if let Some(actif) = self.actif {
            if p.actif != actif {
                return false;
            }
        }
        match non_blank(&self.search) {
            Some(search) => {
                let needle = search.to_lowercase();
                p.user.name_contains(&needle) || p.specialite.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    pub fn apply<'a>(&self, list: &'a [Praticien]) -> Vec<&'a Praticien> {
        list.iter().filter(|p| self.matches(p)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientFilter {
    /// Name (case-insensitive) or telephone (verbatim).
    pub search: Option<String>,
}

impl PatientFilter {
    pub fn matches(&self, p: &Patient) -> bool {
        match non_blank(&self.search) {
            Some(search) => {
                p.user.name_contains(&search.to_lowercase()) || p.telephone.contains(search)
            }
            None => true,
        }
    }

    pub fn apply<'a>(&self, list: &'a [Patient]) -> Vec<&'a Patient> {
        list.iter().filter(|p| self.matches(p)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnulationFilter {
    pub statut: Option<StatutAnnulation>,
}

impl AnnulationFilter {
    pub fn apply<'a>(&self, list: &'a [Annulation]) -> Vec<&'a Annulation> {
        list.iter()
            .filter(|a| self.statut.map_or(true, |s| a.statut == s))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RappelFilter {
    /// Patient or practitioner name.
    pub search: Option<String>,
    pub envoye: Option<bool>,
    pub type_rappel: Option<TypeRappel>,
}

impl RappelFilter {
    pub fn matches(&self, r: &Rappel) -> bool {
        if let Some(envoye) = self.envoye {
            if r.envoye != envoye {
                return false;
            }
        }
        if let Some(t) = self.type_rappel {
            if r.type_rappel != t {
                return false;
            }
        }
        match non_blank(&self.search) {
            Some(search) => {
                let needle = search.to_lowercase();
                r.rdv.as_ref().is_some_and(|rdv| {
                    rdv.patient.user.name_contains(&needle)
                        || rdv.praticien.user.name_contains(&needle)
                })
            }
            None => true,
        }
    }

    pub fn apply<'a>(&self, list: &'a [Rappel]) -> Vec<&'a Rappel> {
        list.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    /// Action, details or actor.
    pub search: Option<String>,
    /// Substring of the action, e.g. "création".
    pub action: Option<String>,
}

impl LogFilter {
    pub fn matches(&self, log: &LogEntry) -> bool {
        let action = log.action.to_lowercase();
        if let Some(wanted) = non_blank(&self.action) {
            if !action.contains(&wanted.to_lowercase()) {
                return false;
            }
        }
        match non_blank(&self.search) {
            Some(search) => {
                let needle = search.to_lowercase();
                action.contains(&needle)
                    || log.details.to_lowercase().contains(&needle)
                    || log.user_display.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    pub fn apply<'a>(&self, list: &'a [LogEntry]) -> Vec<&'a LogEntry> {
        list.iter().filter(|l| self.matches(l)).collect()
    }
}

/// Sort appointments by date, soonest first.
pub fn sort_by_date(list: &mut [RendezVous]) {
    list.sort_by_key(|r| r.date_heure);
}

/// Active appointments within `[from, to]`.
pub fn active_between(list: &[RendezVous], from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<RendezVous> {
    let mut out: Vec<RendezVous> = list
        .iter()
        .filter(|r| r.is_active() && r.date_heure >= from && r.date_heure <= to)
        .cloned()
        .collect();
    sort_by_date(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let list = vec![
            fixtures::rdv(1, StatutRdv::EnAttente, at(2026, 3, 1, 9)),
            fixtures::rdv(2, StatutRdv::Annule, at(2026, 3, 2, 9)),
        ];
        let filter = RendezVousFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&list).len(), 2);
    }

    #[test]
    fn statut_and_search_combine() {
        let mut other = fixtures::rdv(2, StatutRdv::EnAttente, at(2026, 3, 2, 9));
        other.motif = "Bilan sanguin".into();
        let list = vec![fixtures::rdv(1, StatutRdv::EnAttente, at(2026, 3, 1, 9)), other];

        let filter = RendezVousFilter {
            statut: Some(StatutRdv::EnAttente),
            search: Some("bilan".into()),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&list).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn date_range_is_inclusive_by_day() {
        let list = vec![
            fixtures::rdv(1, StatutRdv::Confirme, at(2026, 3, 1, 9)),
            fixtures::rdv(2, StatutRdv::Confirme, at(2026, 3, 5, 17)),
            fixtures::rdv(3, StatutRdv::Confirme, at(2026, 3, 6, 8)),
        ];
        let filter = RendezVousFilter {
            date_debut: NaiveDate::from_ymd_opt(2026, 3, 1),
            date_fin: NaiveDate::from_ymd_opt(2026, 3, 5),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&list).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn blank_search_is_ignored() {
        let list = vec![fixtures::rdv(1, StatutRdv::Confirme, at(2026, 3, 1, 9))];
        let filter = RendezVousFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&list).len(), 1);
    }

    #[test]
    fn praticien_search_and_actif() {
        let mut inactive = fixtures::praticien(4, "Anne", "Martin", "Dermatologie");
        inactive.actif = false;
        let list = vec![fixtures::praticien(3, "Jean", "Dupont", "Cardiologie"), inactive];

        let by_spec = PraticienFilter {
            search: Some("cardio".into()),
            actif: None,
        };
        assert_eq!(by_spec.apply(&list).len(), 1);

        let inactifs = PraticienFilter {
            search: None,
            actif: Some(false),
        };
        assert_eq!(inactifs.apply(&list)[0].id, 4);
    }

    #[test]
    fn patient_search_by_phone() {
        let list = vec![fixtures::patient(11, "Marie", "Curie")];
        let filter = PatientFilter {
            search: Some("0612".into()),
        };
        assert_eq!(filter.apply(&list).len(), 1);
    }

    #[test]
    fn log_action_category() {
        let list = vec![
            fixtures::log(1, "Création RDV", "RDV créé #4"),
            fixtures::log(2, "Connexion API", "Utilisateur admin connecté"),
        ];
        let filter = LogFilter {
            search: None,
            action: Some("connexion".into()),
        };
        let ids: Vec<_> = filter.apply(&list).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn rappel_filters() {
        let now = Utc::now();
        let mut sent = fixtures::rappel(1, TypeRappel::Email, now);
        sent.envoye = true;
        let pending = fixtures::rappel(2, TypeRappel::Sms, now);
        let list = vec![sent, pending];

        let unsent = RappelFilter {
            envoye: Some(false),
            ..Default::default()
        };
        assert_eq!(unsent.apply(&list)[0].id, 2);

        let by_name = RappelFilter {
            search: Some("curie".into()),
            type_rappel: Some(TypeRappel::Email),
            ..Default::default()
        };
        assert_eq!(by_name.apply(&list)[0].id, 1);
    }

    #[test]
    fn active_between_sorted_and_bounded() {
        let now = at(2026, 3, 1, 8);
        let list = vec![
            fixtures::rdv(1, StatutRdv::Confirme, now + Duration::days(3)),
            fixtures::rdv(2, StatutRdv::EnAttente, now + Duration::hours(2)),
            fixtures::rdv(3, StatutRdv::Annule, now + Duration::hours(3)),
            fixtures::rdv(4, StatutRdv::Confirme, now + Duration::days(9)),
        ];
        let ids: Vec<_> = active_between(&list, now, now + Duration::days(7))
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
