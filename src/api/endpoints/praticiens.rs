//! Practitioner endpoints, including weekly hours and leave.

use reqwest::Method;

use super::bool_param;
use crate::api::client::{ApiClient, AuthMode};
use crate::api::error::ApiError;
use crate::models::{Horaire, Id, Indisponibilite, Praticien};
use crate::validation::PraticienForm;

impl ApiClient {
    /// `GET /praticiens/?actif=`
    pub async fn list_praticiens(&self, actif: Option<bool>) -> Result<Vec<Praticien>, ApiError> {
        let mut query = Vec::new();
        if let Some(actif) = actif {
            query.push(("actif", bool_param(actif)));
        }
        self.get_list("/praticiens/", &query).await
    }

    pub async fn get_praticien(&self, id: Id) -> Result<Praticien, ApiError> {
        self.get(&format!("/praticiens/{id}/"), &[]).await
    }

    pub async fn create_praticien(&self, form: &PraticienForm) -> Result<Praticien, ApiError> {
        self.send_json(Method::POST, "/praticiens/", form, AuthMode::Session)
            .await
    }

    pub async fn update_praticien(&self, id: Id, form: &PraticienForm) -> Result<Praticien, ApiError> {
        self.send_json(Method::PUT, &format!("/praticiens/{id}/"), form, AuthMode::Session)
            .await
    }

    pub async fn delete_praticien(&self, id: Id) -> Result<(), ApiError> {
        self.send_unit(Method::DELETE, &format!("/praticiens/{id}/")).await
    }

    pub async fn list_horaires(&self, praticien_id: Id) -> Result<Vec<Horaire>, ApiError> {
        self.get_list(&format!("/praticiens/{praticien_id}/horaires/"), &[])
            .await
    }

    pub async fn create_horaire(&self, praticien_id: Id, horaire: &Horaire) -> Result<Horaire, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/praticiens/{praticien_id}/horaires/"),
            horaire,
            AuthMode::Session,
        )
        .await
    }

    pub async fn list_indisponibilites(&self, praticien_id: Id) -> Result<Vec<Indisponibilite>, ApiError> {
        self.get_list(&format!("/praticiens/{praticien_id}/indisponibilites/"), &[])
            .await
    }

    pub async fn create_indisponibilite(
        &self,
        praticien_id: Id,
        indisponibilite: &Indisponibilite,
    ) -> Result<Indisponibilite, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/praticiens/{praticien_id}/indisponibilites/"),
            indisponibilite,
            AuthMode::Session,
        )
        .await
    }
}
