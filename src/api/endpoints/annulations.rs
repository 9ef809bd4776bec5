//! Cancellation-request endpoints.

use reqwest::Method;

use crate::api::client::{ApiClient, AuthMode};
use crate::api::error::ApiError;
use crate::lifecycle::AnnulationDecision;
use crate::models::{Annulation, AnnulationResolution, Id, NewAnnulation, StatutAnnulation};

impl ApiClient {
    /// `GET /annulations/?statut=`
    pub async fn list_annulations(
        &self,
        statut: Option<StatutAnnulation>,
    ) -> Result<Vec<Annulation>, ApiError> {
        let mut query = Vec::new();
        if let Some(statut) = statut {
            query.push(("statut", statut.as_str().to_string()));
        }
        self.get_list("/annulations/", &query).await
    }

    /// Raise a pending request; the appointment status is untouched.
    pub async fn create_annulation(&self, request: &NewAnnulation) -> Result<Annulation, ApiError> {
        self.send_json(Method::POST, "/annulations/", request, AuthMode::Session)
            .await
    }

    /// Same request as `create_annulation`, any 2xx body accepted.
    pub async fn submit_annulation(&self, request: &NewAnnulation) -> Result<(), ApiError> {
        self.send_json_unit(Method::POST, "/annulations/", request).await
    }

    /// `POST /annulations/{id}/accepter/` or `/refuser/`.
    pub async fn resolve_annulation(
        &self,
        id: Id,
        decision: AnnulationDecision,
    ) -> Result<AnnulationResolution, ApiError> {
        self.post_action(&format!("/annulations/{id}/{}/", decision.as_str()))
            .await
    }
}
