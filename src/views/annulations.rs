//! Cancellation requests awaiting (or past) staff review.

use std::sync::Arc;

use super::{Dialogs, Outcome, Screen};
use crate::api::{ApiClient, ApiError};
use crate::error::Error;
use crate::lifecycle::{self, AnnulationDecision};
use crate::models::filters::AnnulationFilter;
use crate::models::{Annulation, Id};

pub struct AnnulationsView {
    client: ApiClient,
    dialogs: Arc<dyn Dialogs>,
    screen: Screen<Vec<Annulation>>,
    pub filter: AnnulationFilter,
}

impl AnnulationsView {
    pub fn new(client: ApiClient, dialogs: Arc<dyn Dialogs>) -> Self {
        Self {
            client,
            dialogs,
            screen: Screen::default(),
            filter: AnnulationFilter::default(),
        }
    }

    pub fn screen(&self) -> &Screen<Vec<Annulation>> {
        &self.screen
    }

    /// Full list; the status filter is applied locally.
    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let result = self.client.list_annulations(None).await.map_err(Error::from);
        self.screen
            .settle(result, "Erreur lors du chargement des annulations")
    }

    pub fn visible(&self) -> Vec<&Annulation> {
        self.screen
            .data()
            .map(|list| self.filter.apply(list))
            .unwrap_or_default()
    }

    pub fn pending_count(&self) -> usize {
        self.screen
            .data()
            .map(|list| list.iter().filter(|a| a.is_pending()).count())
            .unwrap_or(0)
    }

    /// Whether accept/refuse buttons are shown for this request.
    pub fn can_resolve(&self, annulation: &Annulation) -> bool {
        lifecycle::can_resolve(annulation, self.client.session().role())
    }

    pub async fn accept(&mut self, id: Id) -> Result<Outcome, Error> {
        self.resolve(id, AnnulationDecision::Accept).await
    }

    pub async fn refuse(&mut self, id: Id) -> Result<Outcome, Error> {
        self.resolve(id, AnnulationDecision::Refuse).await
    }

    async fn resolve(&mut self, id: Id, decision: AnnulationDecision) -> Result<Outcome, Error> {
        let fallback = match decision {
            AnnulationDecision::Accept => "Erreur lors de l'acceptation",
            AnnulationDecision::Refuse => "Erreur lors du refus",
        };
        match self.send(id, decision).await {
            Ok(Outcome::Done) => {
                if let Err(e) = self.load().await {
                    tracing::warn!(annulation_id = id, error = %e, "refetch after resolution failed");
                }
                Ok(Outcome::Done)
            }
            Ok(Outcome::Declined) => Ok(Outcome::Declined),
            Err(e) => Err(self.screen.fail(e, fallback)),
        }
    }

    async fn send(&self, id: Id, decision: AnnulationDecision) -> Result<Outcome, Error> {
        let statut = self
            .screen
            .data()
            .and_then(|list| list.iter().find(|a| a.id == id))
            .map(|a| a.statut)
            .ok_or(ApiError::NotFound)?;
        lifecycle::resolve_cancellation(statut, decision, self.client.session().role())?;

        if !self.dialogs.confirm(decision.prompt()) {
            return Ok(Outcome::Declined);
        }
        let resolution = self.client.resolve_annulation(id, decision).await?;
        tracing::info!(
            annulation_id = id,
            decision = decision.as_str(),
            message = %resolution.message,
            "cancellation request resolved"
        );
        Ok(Outcome::Done)
    }
}
