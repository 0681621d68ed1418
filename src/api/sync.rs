//! Database sync service status.

use serde_json::Value;

use crate::endpoints::Endpoint;
use crate::errors::NormalizedError;
use crate::http::ApiClient;

impl ApiClient {
    /// Raw sync status report of a sync service (e.g. "sync-a").
    pub async fn sync_status(&self, service: &str) -> Result<Value, NormalizedError> {
        Ok(self
            .get(&Endpoint::SyncStatus(service.to_string()).path())
            .await?
            .body)
    }
}
