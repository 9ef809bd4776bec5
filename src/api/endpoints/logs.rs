use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::models::LogEntry;

impl ApiClient {
    /// `GET /logs/?action=&limit=`. The backend caps at 100 without `limit`.
    pub async fn list_logs(&self, action: Option<&str>, limit: Option<u32>) -> Result<Vec<LogEntry>, ApiError> {
        let mut query = Vec::new();
        if let Some(action) = action.map(str::trim).filter(|a| !a.is_empty()) {
            query.push(("action", action.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.get_list("/logs/", &query).await
    }
}
