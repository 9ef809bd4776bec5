//! Patient endpoints.

use reqwest::Method;

use crate::api::client::{ApiClient, AuthMode};
use crate::api::error::ApiError;
use crate::models::{Id, Patient};
use crate::validation::PatientForm;

impl ApiClient {
    pub async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.get_list("/patients/", &[]).await
    }

    pub async fn get_patient(&self, id: Id) -> Result<Patient, ApiError> {
        self.get(&format!("/patients/{id}/"), &[]).await
    }

    pub async fn create_patient(&self, form: &PatientForm) -> Result<Patient, ApiError> {
        self.send_json(Method::POST, "/patients/", form, AuthMode::Session)
            .await
    }

    pub async fn update_patient(&self, id: Id, form: &PatientForm) -> Result<Patient, ApiError> {
        self.send_json(Method::PUT, &format!("/patients/{id}/"), form, AuthMode::Session)
            .await
    }

    pub async fn delete_patient(&self, id: Id) -> Result<(), ApiError> {
        self.send_unit(Method::DELETE, &format!("/patients/{id}/")).await
    }
}
