//! User profiles (`/api/users`).

use reqwest::Method;
use tcc_core::models::user::Info;

use super::require_id;
use crate::api::ApiClient;
use crate::error::ClientError;

pub struct UserService<'a> {
    api: &'a ApiClient,
}

impl ApiClient {
    pub fn users(&self) -> UserService<'_> {
        UserService { api: self }
    }
}

impl UserService<'_> {
    /// The user directory used for role checks and examiner selection.
    pub async fn list(&self) -> Result<Vec<Info>, ClientError> {
        self.api.get_json("/api/users").await
    }

    pub async fn fetch(&self, id: &str) -> Result<Info, ClientError> {
        self.api.get_json(&format!("/api/users/{id}")).await
    }

    /// Profile of the account `auth_id`. A 404 means the profile has not
    /// been completed yet.
    pub async fn fetch_by_auth_id(&self, auth_id: &str) -> Result<Info, ClientError> {
        self.api.get_json(&format!("/api/users/auth/{auth_id}")).await
    }

    pub async fn create(&self, info: &Info) -> Result<Info, ClientError> {
        let created: Info = self.api.send_json(Method::POST, "/api/users", info).await?;
        tracing::info!(
            profile_id = created.id().unwrap_or_default(),
            auth_id = %created.auth_id,
            "Profile created"
        );
        Ok(created)
    }

    pub async fn update(&self, info: &Info) -> Result<Info, ClientError> {
        let id = require_id("Profile", info.id())?;
        self.api
            .send_json(Method::PUT, &format!("/api/users/{id}"), info)
            .await
    }

    pub async fn activate(&self, id: &str) -> Result<(), ClientError> {
        self.api
            .send_empty(Method::PATCH, &format!("/api/users/{id}/activate"))
            .await?;
        tracing::info!(profile_id = id, "Profile activated");
        Ok(())
    }

    pub async fn deactivate(&self, id: &str) -> Result<(), ClientError> {
        self.api
            .send_empty(Method::PATCH, &format!("/api/users/{id}/deactivate"))
            .await?;
        tracing::info!(profile_id = id, "Profile deactivated");
        Ok(())
    }
}
