//! Landing screen: a role-specific summary.

use chrono::{DateTime, Duration, Utc};

use super::rendez_vous::{own_query, scope_to_actor};
use super::Screen;
use crate::api::{ApiClient, RdvQuery};
use crate::error::Error;
use crate::models::filters::{active_between, sort_by_date};
use crate::models::{RendezVous, Role, StatutAnnulation};

const PAST_SHOWN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardSummary {
    Admin {
        /// Active appointments on the current UTC day, soonest first.
        today: Vec<RendezVous>,
        total_rdv: usize,
        praticiens_actifs: usize,
        patients: usize,
        annulations_en_attente: usize,
    },
    Praticien {
        today: Vec<RendezVous>,
        /// Active appointments from now through the next seven days.
        week: Vec<RendezVous>,
    },
    Patient {
        upcoming: Vec<RendezVous>,
        /// The most recent past appointments, oldest first.
        past: Vec<RendezVous>,
    },
    /// No role: nothing to summarise.
    Empty,
}

pub struct DashboardView {
    client: ApiClient,
    screen: Screen<DashboardSummary>,
}

impl DashboardView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            screen: Screen::default(),
        }
    }

    pub fn screen(&self) -> &Screen<DashboardSummary> {
        &self.screen
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.screen.data()
    }

    pub async fn load(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        self.screen.begin();
        let result = self.fetch(now).await;
        self.screen
            .settle(result, "Erreur lors du chargement du tableau de bord")
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<DashboardSummary, Error> {
        let user = self.client.session().user();
        let Some(role) = user.as_ref().and_then(|u| u.role) else {
            return Ok(DashboardSummary::Empty);
        };

        if role == Role::Admin {
            let all = RdvQuery::default();
            let (rdv, praticiens, patients, annulations) = tokio::try_join!(
                self.client.list_rendez_vous(&all),
                self.client.list_praticiens(Some(true)),
                self.client.list_patients(),
                self.client.list_annulations(Some(StatutAnnulation::EnAttente)),
            )?;
            return Ok(DashboardSummary::Admin {
                today: today_active(&rdv, now),
                total_rdv: rdv.len(),
                praticiens_actifs: praticiens.len(),
                patients: patients.len(),
                annulations_en_attente: annulations.len(),
            });
        }

        let own = match own_query(user.as_ref()) {
            Some(query) => scope_to_actor(self.client.list_rendez_vous(&query).await?, user.as_ref()),
            None => Vec::new(),
        };
        Ok(match role {
            Role::Praticien => DashboardSummary::Praticien {
                today: today_active(&own, now),
                week: active_between(&own, now, now + Duration::days(7)),
            },
            _ => {
                let mut upcoming: Vec<RendezVous> = own
                    .iter()
                    .filter(|r| r.is_active() && !r.is_past(now))
                    .cloned()
                    .collect();
                sort_by_date(&mut upcoming);
                let mut past: Vec<RendezVous> =
                    own.into_iter().filter(|r| r.is_past(now)).collect();
                sort_by_date(&mut past);
                let skip = past.len().saturating_sub(PAST_SHOWN);
                past.drain(..skip);
                DashboardSummary::Patient { upcoming, past }
            }
        })
    }
}

fn today_active(list: &[RendezVous], now: DateTime<Utc>) -> Vec<RendezVous> {
    let today = now.date_naive();
    let mut out: Vec<RendezVous> = list
        .iter()
        .filter(|r| r.is_active() && r.day() == today)
        .cloned()
        .collect();
    sort_by_date(&mut out);
    out
}
