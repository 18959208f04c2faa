//! Account roles.
//!
//! Names must match the role names issued by the authentication service
//! (`Student`, `Teacher`, `External`, `Admin`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_STUDENT: &str = "Student";
pub const ROLE_TEACHER: &str = "Teacher";
pub const ROLE_EXTERNAL: &str = "External";
pub const ROLE_ADMIN: &str = "Admin";

/// Closed set of account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Student,
    Teacher,
    External,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Teacher, Role::External, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Teacher => ROLE_TEACHER,
            Role::External => ROLE_EXTERNAL,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Whether users with this role may act as advisor, co-advisor, or
    /// board examiner.
    pub fn can_advise(self) -> bool {
        matches!(self, Role::Teacher | Role::External)
    }

    /// Admins have no role-specific profile.
    pub fn has_profile(self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    /// Case-insensitive; the profile screens lower-case role names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid role '{s}'. Must be one of: {ROLE_STUDENT}, {ROLE_TEACHER}, {ROLE_EXTERNAL}, {ROLE_ADMIN}"
                ))
            })
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}
