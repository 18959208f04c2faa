//! Authentication accounts and role-specific profiles.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::{EntityId, Timestamp};

/// An authentication account (`/api/authentication`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub email: String,
    pub role: RoleField,
    /// Write-only; never returned by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<Info>,
}

impl User {
    pub fn role(&self) -> Role {
        self.role.role()
    }
}

/// Accounts carry the role either as a bare name or as the identity
/// framework's role record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleField {
    Name(Role),
    #[serde(rename_all = "camelCase")]
    Record {
        id: String,
        name: Role,
        #[serde(default)]
        normalized_name: Option<String>,
    },
}

impl RoleField {
    pub fn role(&self) -> Role {
        match self {
            RoleField::Name(role) => *role,
            RoleField::Record { name, .. } => *name,
        }
    }
}

impl From<Role> for RoleField {
    fn from(role: Role) -> Self {
        RoleField::Name(role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    #[serde(rename = "Non-binary")]
    NonBinary,
    Other,
    #[serde(rename = "Not-to-say")]
    NotToSay,
}

/// A user profile (`/api/users`). Works, boards, and organs reference
/// profile ids, not account ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Account id this profile belongs to.
    pub auth_id: EntityId,
    pub name: String,
    pub cpf: String,
    #[serde(with = "crate::types::timestamp")]
    pub birth_date: Timestamp,
    pub sex: Sex,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<TeacherProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalProfile>,
}

impl Info {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    /// Teacher or external member, eligible to advise or examine.
    pub fn can_advise(&self) -> bool {
        self.role.is_some_and(Role::can_advise)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub registration: String,
    pub course: String,
    #[serde(default, with = "crate::types::timestamp::option")]
    pub admission_date: Option<Timestamp>,
    #[serde(default, with = "crate::types::timestamp::option")]
    pub graduation_date: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    pub siape: String,
    pub area: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalProfile {
    pub institution: String,
    pub formation: String,
    pub area: String,
}
