//! Course and organ models.

use serde::{Deserialize, Serialize};

use crate::models::edict::Edict;
use crate::types::EntityId;

/// An undergraduate course; owns organs and edicts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    pub acronym: String,
    /// Teacher profile id of the course coordinator.
    pub coordinator: EntityId,
    /// Teacher profile id of the TCC coordinator.
    pub tcc_coordinator: EntityId,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub organs: Vec<Organ>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub edicts: Vec<Edict>,
}

impl Course {
    pub fn is_coordinated_by(&self, profile_id: &str) -> bool {
        self.coordinator == profile_id || self.tcc_coordinator == profile_id
    }
}

/// An academic unit under a course, with a roster of teachers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organ {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    pub acronym: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub description: String,
    /// Teacher profile ids.
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub teachers: Vec<EntityId>,
    pub course_id: EntityId,
}

impl Organ {
    pub fn has_member(&self, teacher_id: &str) -> bool {
        self.teachers.iter().any(|t| t == teacher_id)
    }
}
