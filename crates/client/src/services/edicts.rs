//! Edicts and their schedules.
//!
//! An edict and its four schedule phases travel as one payload. The
//! schedule is checked before every create or update and sorted into
//! display order on every read.

use reqwest::Method;
use tcc_core::models::edict::Edict;
use tcc_core::schedule::validate_schedule;

use super::require_id;
use crate::api::ApiClient;
use crate::error::ClientError;

pub struct EdictService<'a> {
    api: &'a ApiClient,
}

impl ApiClient {
    pub fn edicts(&self) -> EdictService<'_> {
        EdictService { api: self }
    }
}

impl EdictService<'_> {
    /// Fetch an edict with its schedule in display order.
    pub async fn fetch(&self, id: &str) -> Result<Edict, ClientError> {
        let mut edict: Edict = self.api.get_json(&format!("/api/edict/{id}")).await?;
        edict.sort_schedule();
        Ok(edict)
    }

    pub async fn create(&self, course_id: &str, edict: &Edict) -> Result<Edict, ClientError> {
        check_schedule(edict)?;
        let mut created: Edict = self
            .api
            .send_json(Method::POST, &format!("/api/course/{course_id}/edict"), edict)
            .await?;
        created.sort_schedule();
        tracing::info!(course_id, edict = %created.name, "Edict created");
        Ok(created)
    }

    pub async fn update(&self, edict: &Edict) -> Result<Edict, ClientError> {
        let id = require_id("Edict", edict.id.as_deref())?;
        check_schedule(edict)?;
        let mut updated: Edict = self
            .api
            .send_json(Method::PUT, &format!("/api/edict/{id}"), edict)
            .await?;
        updated.sort_schedule();
        tracing::info!(edict_id = id, "Edict updated");
        Ok(updated)
    }

    pub async fn delete(&self, course_id: &str, edict_id: &str) -> Result<(), ClientError> {
        self.api
            .send_empty(
                Method::DELETE,
                &format!("/api/course/{course_id}/edict/{edict_id}"),
            )
            .await?;
        tracing::info!(course_id, edict_id, "Edict deleted");
        Ok(())
    }
}

fn check_schedule(edict: &Edict) -> Result<(), ClientError> {
    validate_schedule(&edict.schedule).map_err(|e| {
        tracing::warn!(phase = %e.phase(), error = %e, "Schedule rejected");
        ClientError::from(e)
    })
}
