//! User administration calls.

use crate::api::types::{
    CreateUserRequest, Listing, Page, UpdateUserRequest, User, UserStatus,
};
use crate::endpoints::Endpoint;
use crate::errors::NormalizedError;
use crate::http::{ApiClient, Method, RequestDescriptor};

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { client: self }
    }
}

impl UsersApi<'_> {
    pub async fn list(&self) -> Result<Page<User>, NormalizedError> {
        let listing: Listing<User> = self.client.get_json(&Endpoint::Users.path()).await?;
        Ok(listing.into())
    }

    pub async fn get(&self, id: &str) -> Result<User, NormalizedError> {
        self.client.get_json(&Endpoint::User(id.to_string()).path()).await
    }

    pub async fn create(&self, request: &CreateUserRequest) -> Result<User, NormalizedError> {
        self.client.post(&Endpoint::Users.path(), request).await?.json()
    }

    pub async fn update(&self, id: &str, request: &UpdateUserRequest) -> Result<User, NormalizedError> {
        self.client
            .put(&Endpoint::User(id.to_string()).path(), request)
            .await?
            .json()
    }

    /// The backend reads the new status from the query string, not a body.
    pub async fn set_status(&self, id: &str, status: UserStatus) -> Result<User, NormalizedError> {
        let request = RequestDescriptor::new(Method::Patch, Endpoint::UserStatus(id.to_string()).path())
            .with_query("status", status.as_str());
        self.client.send(request).await?.json()
    }

    /// The backend disables rather than erases.
    pub async fn delete(&self, id: &str) -> Result<(), NormalizedError> {
        self.client.delete(&Endpoint::User(id.to_string()).path()).await?;
        Ok(())
    }
}
