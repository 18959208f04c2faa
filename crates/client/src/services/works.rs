//! Works (`/api/work`), their versions, boards, and status.

use reqwest::Method;
use tcc_core::board::Board;
use tcc_core::forms::{VersionForm, WorkForm};
use tcc_core::models::user::Info;
use tcc_core::models::work::{Version, Work};
use tcc_core::work_status::WorkStatus;

use super::require_id;
use crate::api::ApiClient;
use crate::error::ClientError;

pub struct WorkService<'a> {
    api: &'a ApiClient,
}

impl ApiClient {
    pub fn works(&self) -> WorkService<'_> {
        WorkService { api: self }
    }
}

impl WorkService<'_> {
    pub async fn list(&self) -> Result<Vec<Work>, ClientError> {
        self.api.get_json("/api/work").await
    }

    pub async fn fetch(&self, id: &str) -> Result<Work, ClientError> {
        self.api.get_json(&format!("/api/work/{id}")).await
    }

    /// Validate `form` and register the work. Participant roles are checked
    /// when `users` is given.
    pub async fn create(&self, form: WorkForm, users: Option<&[Info]>) -> Result<Work, ClientError> {
        if let Err(errors) = form.check(users) {
            tracing::warn!(%errors, "Work form rejected");
            return Err(errors.into());
        }
        let work = form.into_work();
        let created: Work = self.api.send_json(Method::POST, "/api/work", &work).await?;
        tracing::info!(
            work_id = created.id.as_deref().unwrap_or_default(),
            title = %created.title,
            "Work registered"
        );
        Ok(created)
    }

    /// Administrative full update. Not gated by the status table; this is
    /// how scores and concluded statuses are recorded.
    pub async fn update(&self, work: &Work) -> Result<Work, ClientError> {
        let id = require_id("Work", work.id.as_deref())?;
        let updated: Work = self
            .api
            .send_json(Method::PUT, &format!("/api/work/{id}"), work)
            .await?;
        tracing::info!(work_id = id, status = %updated.status, "Work updated");
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> Result<(), ClientError> {
        self.api
            .send_empty(Method::DELETE, &format!("/api/work/{id}"))
            .await?;
        tracing::info!(work_id = id, "Work removed");
        Ok(())
    }

    /// Append a version. Versions are never edited or removed.
    pub async fn add_version(&self, work_id: &str, form: VersionForm) -> Result<Version, ClientError> {
        if let Err(errors) = form.check() {
            tracing::warn!(%errors, work_id, "Version form rejected");
            return Err(errors.into());
        }
        let version = form.into_version();
        let added: Version = self
            .api
            .send_json(Method::POST, &format!("/api/work/{work_id}/version"), &version)
            .await?;
        tracing::info!(work_id, version = %added.name, "Version added");
        Ok(added)
    }

    pub async fn add_board(&self, work_id: &str, board: &Board) -> Result<Board, ClientError> {
        let added: Board = self
            .api
            .send_json(Method::POST, &format!("/api/work/{work_id}/board"), board)
            .await?;
        tracing::info!(work_id, members = added.members.len(), "Board added");
        Ok(added)
    }

    pub async fn update_board(&self, work_id: &str, board: &Board) -> Result<Board, ClientError> {
        let updated: Board = self
            .api
            .send_json(Method::PUT, &format!("/api/board/{work_id}"), board)
            .await?;
        tracing::info!(work_id, "Board updated");
        Ok(updated)
    }

    /// Submit a status action. Callers go through
    /// [`Session::change_work_status`](crate::workflow::Session::change_work_status),
    /// which checks the transition first.
    pub async fn change_status(&self, work_id: &str, status: WorkStatus) -> Result<(), ClientError> {
        self.api
            .send_empty(
                Method::PUT,
                &format!("/api/work/{work_id}/status/{}", status.id()),
            )
            .await?;
        tracing::info!(work_id, status = %status, code = status.id(), "Work status changed");
        Ok(())
    }

    /// Download the work's report document. One export at a time per
    /// client.
    pub async fn fetch_report(&self, work_id: &str) -> Result<Vec<u8>, ClientError> {
        let _guard = self.api.report_gate().try_acquire()?;
        let bytes = self
            .api
            .get_bytes(&format!("/api/work/{work_id}/report"))
            .await?;
        tracing::info!(work_id, size = bytes.len(), "Report exported");
        Ok(bytes)
    }
}
