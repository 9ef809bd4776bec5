use super::bool_param;
use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::models::Rappel;

impl ApiClient {
    /// `GET /rappels/?envoye=` (read-only resource).
    pub async fn list_rappels(&self, envoye: Option<bool>) -> Result<Vec<Rappel>, ApiError> {
        let mut query = Vec::new();
        if let Some(envoye) = envoye {
            query.push(("envoye", bool_param(envoye)));
        }
        self.get_list("/rappels/", &query).await
    }
}
