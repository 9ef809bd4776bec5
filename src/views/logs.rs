//! Audit log (admin).

use super::Screen;
use crate::api::ApiClient;
use crate::error::Error;
use crate::models::filters::LogFilter;
use crate::models::LogEntry;

/// How many entries the log screen asks for.
pub const LOG_LIMIT: u32 = 200;

/// Coarse kind of a logged action, used for badges and the action filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    Creation,
    Suppression,
    Modification,
    Connexion,
    Autre,
}

impl ActionCategory {
    pub const ALL: &'static [ActionCategory] = &[
        ActionCategory::Creation,
        ActionCategory::Modification,
        ActionCategory::Suppression,
        ActionCategory::Connexion,
        ActionCategory::Autre,
    ];

    /// First matching keyword wins, in this order.
    pub fn classify(action: &str) -> Self {
        if action.contains("Création") || action.contains("Inscription") {
            ActionCategory::Creation
        } else if action.contains("Suppression") || action.contains("Annulation") {
            ActionCategory::Suppression
        } else if action.contains("Modification") || action.contains("Mise à jour") {
            ActionCategory::Modification
        } else if action.contains("Connexion") {
            ActionCategory::Connexion
        } else {
            ActionCategory::Autre
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionCategory::Creation => "Créations",
            ActionCategory::Suppression => "Suppressions",
            ActionCategory::Modification => "Modifications",
            ActionCategory::Connexion => "Connexions",
            ActionCategory::Autre => "Autres",
        }
    }
}

pub struct LogsView {
    client: ApiClient,
    screen: Screen<Vec<LogEntry>>,
    pub filter: LogFilter,
    pub category: Option<ActionCategory>,
}

impl LogsView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            screen: Screen::default(),
            filter: LogFilter::default(),
            category: None,
        }
    }

    pub fn screen(&self) -> &Screen<Vec<LogEntry>> {
        &self.screen
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let result = self
            .client
            .list_logs(None, Some(LOG_LIMIT))
            .await
            .map_err(Error::from);
        self.screen.settle(result, "Erreur lors du chargement des logs")
    }

    pub fn visible(&self) -> Vec<&LogEntry> {
        let Some(list) = self.screen.data() else {
            return Vec::new();
        };
        self.filter
            .apply(list)
            .into_iter()
            .filter(|log| {
                self.category
                    .map_or(true, |c| ActionCategory::classify(&log.action) == c)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::navigation::Route;
    use crate::test_support::{fixtures, signed_in, MockBackend};
    use axum::http::Method;
    use serde_json::json;

    #[test]
    fn classification() {
        assert_eq!(ActionCategory::classify("Création RDV"), ActionCategory::Creation);
        assert_eq!(ActionCategory::classify("Inscription patient"), ActionCategory::Creation);
        assert_eq!(ActionCategory::classify("Annulation acceptée"), ActionCategory::Suppression);
        assert_eq!(ActionCategory::classify("Mise à jour praticien"), ActionCategory::Modification);
        assert_eq!(ActionCategory::classify("Connexion"), ActionCategory::Connexion);
        assert_eq!(ActionCategory::classify("Export"), ActionCategory::Autre);
    }

    #[tokio::test]
    async fn loads_with_limit_and_filters() {
        let backend = MockBackend::start().await;
        backend.on(
            Method::GET,
            "/logs/",
            200,
            json!([
                fixtures::log(1, "Création RDV", "RDV #4 pour Marie Curie"),
                fixtures::log(2, "Connexion", "Connexion réussie"),
                fixtures::log(3, "Modification patient", "Téléphone mis à jour"),
            ]),
        );
        let (client, _, _) = signed_in(&backend, Role::Admin, Route::Logs);
        let mut view = LogsView::new(client);

        view.load().await.unwrap();
        assert_eq!(
            backend.requests_to(Method::GET, "/logs/")[0].query.as_deref(),
            Some("limit=200")
        );

        view.category = Some(ActionCategory::Connexion);
        assert_eq!(view.visible().iter().map(|l| l.id).collect::<Vec<_>>(), vec![2]);

        view.category = None;
        view.filter.search = Some("marie".into());
        assert_eq!(view.visible().iter().map(|l| l.id).collect::<Vec<_>>(), vec![1]);
    }
}
