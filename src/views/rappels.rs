//! Reminder schedule (admin).

use chrono::NaiveDate;

use super::Screen;
use crate::api::ApiClient;
use crate::error::Error;
use crate::models::filters::RappelFilter;
use crate::models::Rappel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RappelCounters {
    pub envoyes: usize,
    pub en_attente: usize,
    /// Scheduled for the given UTC day, sent or not.
    pub aujourdhui: usize,
}

impl RappelCounters {
    pub fn of(list: &[Rappel], today: NaiveDate) -> Self {
        list.iter().fold(Self::default(), |mut c, r| {
            if r.envoye {
                c.envoyes += 1;
            } else {
                c.en_attente += 1;
            }
            if r.date_envoi_prevue.date_naive() == today {
                c.aujourdhui += 1;
            }
            c
        })
    }
}

pub struct RappelsView {
    client: ApiClient,
    screen: Screen<Vec<Rappel>>,
    pub filter: RappelFilter,
}

impl RappelsView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            screen: Screen::default(),
            filter: RappelFilter::default(),
        }
    }

    pub fn screen(&self) -> &Screen<Vec<Rappel>> {
        &self.screen
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let result = self
            .client
            .list_rappels(None)
            .await
            .map(|mut list| {
                list.sort_by_key(|r| r.date_envoi_prevue);
                list
            })
            .map_err(Error::from);
        self.screen.settle(result, "Erreur lors du chargement des rappels")
    }

    pub fn visible(&self) -> Vec<&Rappel> {
        self.screen
            .data()
            .map(|list| self.filter.apply(list))
            .unwrap_or_default()
    }

    /// Counters over the whole list, not the filtered view.
    pub fn counters(&self, today: NaiveDate) -> RappelCounters {
        self.screen
            .data()
            .map(|list| RappelCounters::of(list, today))
            .unwrap_or_default()
    }
}
