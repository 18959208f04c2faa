//! Work and version models.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::knowledge_area::KnowledgeArea;
use crate::types::EntityId;
use crate::work_status::WorkStatus;

/// A capstone project submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub title: String,
    pub knowledge_area: KnowledgeArea,
    pub r#abstract: String,
    pub keywords: String,
    pub advisor: EntityId,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub coadvisor: Option<EntityId>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub request_form: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub record_form: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub status: WorkStatus,
    pub student: EntityId,
    pub edict_id: EntityId,
    #[serde(default)]
    pub first_score: Option<f64>,
    #[serde(default)]
    pub second_score: Option<f64>,
    #[serde(default)]
    pub final_score: Option<f64>,
    /// Submission history, oldest first.
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
}

impl Work {
    /// The work's participants in board order: advisor, then co-advisor.
    pub fn supervisors(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.advisor.as_str()).chain(self.coadvisor.as_deref())
    }

    /// Whether `user_id` is the student, advisor, or co-advisor.
    pub fn involves(&self, user_id: &str) -> bool {
        self.student == user_id || self.supervisors().any(|id| id == user_id)
    }

    pub fn latest_version(&self) -> Option<&Version> {
        self.versions.last()
    }
}

/// Immutable snapshot of submitted work. Versions are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// URI returned by the file service.
    pub file: String,
}

/// The store sends an empty string for a missing co-advisor.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<EntityId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}
