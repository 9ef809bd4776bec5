use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::models::Statistiques;

impl ApiClient {
    pub async fn statistiques(&self) -> Result<Statistiques, ApiError> {
        self.get("/statistiques/", &[]).await
    }
}
