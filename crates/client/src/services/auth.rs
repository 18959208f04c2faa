//! Authentication accounts (`/api/authentication`).

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tcc_core::forms::{LoginForm, PasswordResetForm};
use tcc_core::models::user::User;

use super::require_id;
use crate::api::ApiClient;
use crate::error::ClientError;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordBody<'a> {
    token: &'a str,
    new_password: &'a str,
    repeat_new_password: &'a str,
}

#[derive(Serialize)]
struct ChangeEmailBody<'a> {
    token: &'a str,
    email: &'a str,
}

pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthService<'_> {
        AuthService { api: self }
    }
}

impl AuthService<'_> {
    pub async fn list(&self) -> Result<Vec<User>, ClientError> {
        self.api.get_json("/api/authentication").await
    }

    pub async fn fetch(&self, id: &str) -> Result<User, ClientError> {
        self.api.get_json(&format!("/api/authentication/{id}")).await
    }

    pub async fn create(&self, user: &User) -> Result<User, ClientError> {
        let created: User = self
            .api
            .send_json(Method::POST, "/api/authentication", user)
            .await?;
        tracing::info!(email = %created.email, role = %created.role(), "Account created");
        Ok(created)
    }

    pub async fn update(&self, user: &User) -> Result<User, ClientError> {
        let id = require_id("Account", user.id.as_deref())?;
        self.api
            .send_json(Method::PUT, &format!("/api/authentication/{id}"), user)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.api
            .send_empty(Method::DELETE, &format!("/api/authentication/{id}"))
            .await?;
        tracing::info!(account_id = id, "Account deleted");
        Ok(())
    }

    /// Exchange credentials for a bearer token. The token is returned,
    /// not stored.
    pub async fn login(&self, form: &LoginForm) -> Result<LoginResponse, ClientError> {
        form.check()?;
        self.api
            .send_json(
                Method::POST,
                "/api/authentication/login",
                &LoginBody {
                    email: &form.email,
                    password: &form.password,
                },
            )
            .await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), ClientError> {
        self.api
            .get_empty_query("/api/authentication/forgot-password", &[("email", email)])
            .await
    }

    pub async fn reset_password(&self, form: &PasswordResetForm) -> Result<(), ClientError> {
        form.check()?;
        self.api
            .send_json_empty(
                Method::POST,
                "/api/authentication/reset-password",
                &ResetPasswordBody {
                    token: &form.token,
                    new_password: &form.new_password,
                    repeat_new_password: &form.repeat_new_password,
                },
            )
            .await
    }

    pub async fn change_email(&self, token: &str, email: &str) -> Result<(), ClientError> {
        self.api
            .send_json_empty(
                Method::POST,
                "/api/authentication/change-email",
                &ChangeEmailBody { token, email },
            )
            .await
    }
}
