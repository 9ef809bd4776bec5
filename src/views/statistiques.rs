//! Platform statistics (admin).

use super::Screen;
use crate::api::ApiClient;
use crate::error::Error;
use crate::models::Statistiques;

pub struct StatistiquesView {
    client: ApiClient,
    screen: Screen<Statistiques>,
}

impl StatistiquesView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            screen: Screen::default(),
        }
    }

    pub fn screen(&self) -> &Screen<Statistiques> {
        &self.screen
    }

    pub fn stats(&self) -> Option<&Statistiques> {
        self.screen.data()
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let result = self.client.statistiques().await.map_err(Error::from);
        self.screen
            .settle(result, "Erreur lors du chargement des statistiques")
    }

    /// e.g. "12.5%"; `None` before the first successful load.
    pub fn taux_annulation(&self) -> Option<String> {
        self.stats().map(Statistiques::taux_annulation_display)
    }
}
