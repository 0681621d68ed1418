//! Session operations: sign in, sign up, sign out, validate, refresh.

use crate::api::types::{RegisterRequest, RegisterResponse, SignInRequest, SignInResponse, User};
use crate::auth::token_store::Credential;
use crate::endpoints::Endpoint;
use crate::errors::{ErrorKind, NormalizedError};
use crate::http::{ApiClient, RequestDescriptor};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    /// Exchange email/password for a credential and store it.
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse, NormalizedError> {
        let response: SignInResponse = self
            .client
            .post(&Endpoint::Login.path(), request)
            .await?
            .json()?;

        self.store(&response)?;
        tracing::info!(email = %request.email, "Signed in");
        Ok(response)
    }

    /// Register an account. No credential is stored; sign in afterwards.
    pub async fn sign_up(&self, request: &RegisterRequest) -> Result<RegisterResponse, NormalizedError> {
        let response: RegisterResponse = self
            .client
            .post(&Endpoint::Register.path(), request)
            .await?
            .json()?;

        if response.id.is_empty() {
            return Err(NormalizedError::new(
                ErrorKind::Unknown,
                "User ID not found in response",
            ));
        }
        Ok(response)
    }

    /// Tell the backend (best effort) and drop the local credential.
    pub async fn sign_out(&self) {
        if self.client.tokens().get().is_some() {
            if let Err(e) = self.client.send(RequestDescriptor::post(Endpoint::Logout.path())).await {
                tracing::warn!(error = %e, kind = e.kind.as_str(), "Backend sign-out failed");
            }
        }
        self.client.tokens().clear();
        tracing::info!("Signed out");
    }

    /// Ask the backend whether the stored credential is still valid.
    pub async fn validate(&self) -> Result<bool, NormalizedError> {
        self.client
            .send(RequestDescriptor::post(Endpoint::Validate.path()))
            .await?
            .json()
    }

    /// Rotate the credential. The new token replaces the stored one.
    pub async fn refresh(&self) -> Result<SignInResponse, NormalizedError> {
        let response: SignInResponse = self
            .client
            .send(RequestDescriptor::post(Endpoint::Refresh.path()))
            .await?
            .json()?;

        self.store(&response)?;
        Ok(response)
    }

    pub async fn current_user(&self) -> Result<User, NormalizedError> {
        self.client.get_json(&Endpoint::CurrentUser.path()).await
    }

    fn store(&self, response: &SignInResponse) -> Result<(), NormalizedError> {
        if response.access_token.is_empty() {
            return Err(NormalizedError::new(
                ErrorKind::Unknown,
                "Access token not found in response",
            ));
        }
        self.client
            .tokens()
            .set(Credential::new(response.access_token.clone()));
        Ok(())
    }
}
