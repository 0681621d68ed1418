//! Role administration calls.

use crate::api::types::{Listing, Page, Role, RoleRequest};
use crate::endpoints::Endpoint;
use crate::errors::NormalizedError;
use crate::http::ApiClient;

pub struct RolesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn roles(&self) -> RolesApi<'_> {
        RolesApi { client: self }
    }
}

impl RolesApi<'_> {
    pub async fn list(&self) -> Result<Vec<Role>, NormalizedError> {
        let listing: Listing<Role> = self.client.get_json(&Endpoint::Roles.path()).await?;
        Ok(Page::from(listing).content)
    }

    pub async fn get(&self, id: &str) -> Result<Role, NormalizedError> {
        self.client.get_json(&Endpoint::Role(id.to_string()).path()).await
    }

    pub async fn create(&self, request: &RoleRequest) -> Result<Role, NormalizedError> {
        self.client.post(&Endpoint::Roles.path(), request).await?.json()
    }

    pub async fn update(&self, id: &str, request: &RoleRequest) -> Result<Role, NormalizedError> {
        self.client
            .put(&Endpoint::Role(id.to_string()).path(), request)
            .await?
            .json()
    }

    pub async fn delete(&self, id: &str) -> Result<(), NormalizedError> {
        self.client.delete(&Endpoint::Role(id.to_string()).path()).await?;
        Ok(())
    }
}
