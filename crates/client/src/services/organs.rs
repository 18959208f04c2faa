//! Organs (`/api/organ`) and their teacher rosters.

use reqwest::Method;
use tcc_core::error::CoreError;
use tcc_core::forms::{check_organ_member, OrganForm};
use tcc_core::models::course::Organ;
use tcc_core::models::user::Info;

use super::require_id;
use crate::api::ApiClient;
use crate::error::ClientError;

pub struct OrganService<'a> {
    api: &'a ApiClient,
}

impl ApiClient {
    pub fn organs(&self) -> OrganService<'_> {
        OrganService { api: self }
    }
}

impl OrganService<'_> {
    pub async fn list(&self) -> Result<Vec<Organ>, ClientError> {
        self.api.get_json("/api/organ").await
    }

    pub async fn fetch(&self, id: &str) -> Result<Organ, ClientError> {
        self.api.get_json(&format!("/api/organ/{id}")).await
    }

    pub async fn create(&self, form: OrganForm) -> Result<Organ, ClientError> {
        if let Err(errors) = form.check() {
            tracing::warn!(%errors, "Organ form rejected");
            return Err(errors.into());
        }
        let organ = form.into_organ(None, Vec::new());
        let created: Organ = self.api.send_json(Method::POST, "/api/organ", &organ).await?;
        tracing::info!(organ = %created.acronym, "Organ created");
        Ok(created)
    }

    /// Update name, acronym, and description. The roster is kept as the
    /// store has it.
    pub async fn update(&self, id: &str, form: OrganForm) -> Result<Organ, ClientError> {
        if let Err(errors) = form.check() {
            tracing::warn!(%errors, organ_id = id, "Organ form rejected");
            return Err(errors.into());
        }
        let current = self.fetch(id).await?;
        let organ = form.into_organ(Some(id.to_string()), current.teachers);
        let updated: Organ = self
            .api
            .send_json(Method::PUT, &format!("/api/organ/{id}"), &organ)
            .await?;
        tracing::info!(organ_id = id, "Organ updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.api
            .send_empty(Method::DELETE, &format!("/api/organ/{id}"))
            .await?;
        tracing::info!(organ_id = id, "Organ deleted");
        Ok(())
    }

    /// Add a teacher to `organ`'s roster. `users` is the directory the
    /// teacher must appear in with the Teacher role.
    pub async fn add_member(&self, organ: &Organ, teacher_id: &str, users: &[Info]) -> Result<(), ClientError> {
        let organ_id = require_id("Organ", organ.id.as_deref())?;
        if let Err(errors) = check_organ_member(organ, users, teacher_id) {
            tracing::warn!(%errors, organ_id, teacher_id, "Organ member rejected");
            return Err(errors.into());
        }
        self.api
            .send_empty(
                Method::POST,
                &format!("/api/organ/{organ_id}/member/{teacher_id}"),
            )
            .await?;
        tracing::info!(organ_id, teacher_id, "Organ member added");
        Ok(())
    }

    /// Remove a teacher from `organ`'s roster. Nothing is sent for a
    /// teacher who is not on it.
    pub async fn remove_member(&self, organ: &Organ, teacher_id: &str) -> Result<(), ClientError> {
        let organ_id = require_id("Organ", organ.id.as_deref())?;
        if !organ.has_member(teacher_id) {
            return Err(CoreError::NotFound {
                entity: "Organ member",
                id: teacher_id.to_string(),
            }
            .into());
        }
        self.api
            .send_empty(
                Method::DELETE,
                &format!("/api/organ/{organ_id}/member/{teacher_id}"),
            )
            .await?;
        tracing::info!(organ_id, teacher_id, "Organ member removed");
        Ok(())
    }
}
