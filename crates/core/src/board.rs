//! Defense board model and the board formation rule.
//!
//! A board is the work's advisor, its co-advisor when there is one, and
//! exactly two more examiners drawn from teacher/external users who are not
//! otherwise involved in the work. Membership is fixed once the board
//! exists; updates only move the date, time, and place.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::forms::{FieldError, FormErrors};
use crate::models::user::Info;
use crate::models::work::Work;
use crate::types::{EntityId, Timestamp};

/// Examiners on top of the advisor and co-advisor.
pub const EXTRA_EXAMINERS: usize = 2;

/// Name given to the single file attached when a board is requested.
pub const BOARD_FILE_NAME: &str = "Final Work";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(with = "crate::types::timestamp")]
    pub date: Timestamp,
    pub time: String,
    pub place: String,
    /// Profile ids: advisor, co-advisor if any, then the two examiners.
    pub members: Vec<EntityId>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub files: Vec<BoardFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFile {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("work has no advisor")]
    MissingAdvisor,

    #[error("member {slot} is required")]
    MemberRequired { slot: usize },

    #[error("user {0} appears more than once")]
    DuplicateMember(EntityId),

    #[error("user {0} is the work's student, advisor, or co-advisor")]
    ExcludedMember(EntityId),

    #[error("user {0} does not exist")]
    UnknownMember(EntityId),

    #[error("user {0} is not a teacher or external member")]
    IneligibleMember(EntityId),

    #[error("board must have {expected} members, found {found}")]
    Composition { expected: usize, found: usize },

    #[error("board must start with the advisor and co-advisor")]
    SupervisorsFirst,
}

/// Users eligible as the two extra examiners, in directory order.
pub fn eligible_examiners<'a>(work: &Work, users: &'a [Info]) -> Vec<&'a Info> {
    users
        .iter()
        .filter(|user| user.can_advise())
        .filter(|user| user.id().is_some_and(|id| !work.involves(id)))
        .collect()
}

/// Build the member list `[advisor, coadvisor?, member1, member2]`.
pub fn form_members(work: &Work, member1: &str, member2: &str) -> Result<Vec<EntityId>, BoardError> {
    if work.advisor.trim().is_empty() {
        return Err(BoardError::MissingAdvisor);
    }

    let picks = [member1.trim(), member2.trim()];
    for (i, pick) in picks.iter().enumerate() {
        if pick.is_empty() {
            return Err(BoardError::MemberRequired { slot: i + 1 });
        }
        if work.involves(pick) {
            return Err(BoardError::ExcludedMember((*pick).to_string()));
        }
    }
    if picks[0] == picks[1] {
        return Err(BoardError::DuplicateMember(picks[1].to_string()));
    }

    Ok(work
        .supervisors()
        .chain(picks)
        .map(str::to_string)
        .collect())
}

/// Re-check a member list against the formation rule and a user directory.
pub fn validate_members(work: &Work, members: &[EntityId], users: &[Info]) -> Result<(), BoardError> {
    let supervisors: Vec<&str> = work.supervisors().collect();
    let expected = supervisors.len() + EXTRA_EXAMINERS;
    if members.len() != expected {
        return Err(BoardError::Composition {
            expected,
            found: members.len(),
        });
    }

    for (i, member) in members.iter().enumerate() {
        if members[..i].contains(member) {
            return Err(BoardError::DuplicateMember(member.clone()));
        }
    }

    let (head, examiners) = members.split_at(supervisors.len());
    if head.iter().map(String::as_str).ne(supervisors.iter().copied()) {
        return Err(BoardError::SupervisorsFirst);
    }
    if let Some(excluded) = examiners.iter().find(|m| work.involves(m)) {
        return Err(BoardError::ExcludedMember(excluded.clone()));
    }

    for member in members {
        let user = users
            .iter()
            .find(|u| u.id() == Some(member.as_str()))
            .ok_or_else(|| BoardError::UnknownMember(member.clone()))?;
        if !user.can_advise() {
            return Err(BoardError::IneligibleMember(member.clone()));
        }
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Request and update forms
-------------------------------------------------------------------------- */

/// Board request as filled in by the coordinator.
#[derive(Debug, Clone, Validate)]
pub struct BoardRequest {
    pub date: Timestamp,
    #[validate(length(min = 1, message = "Time is required"))]
    pub time: String,
    #[validate(length(min = 1, message = "Place is required"))]
    pub place: String,
    /// URI of the uploaded final work.
    #[validate(length(min = 1, message = "File is required"))]
    pub file_path: String,
    #[validate(length(min = 1, message = "Member 1 is required"))]
    pub member1: EntityId,
    #[validate(length(min = 1, message = "Member 2 is required"))]
    pub member2: EntityId,
}

impl BoardRequest {
    /// Field checks, plus the date having to be after `now`.
    pub fn validate_at(&self, now: Timestamp) -> Result<(), FormErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };
        if self.date <= now {
            errors.push(FieldError::new("date", "Date must be greater than today"));
        }
        errors.into_result()
    }

    /// Assemble the board for `work`. Call [`BoardRequest::validate_at`] first.
    pub fn into_board(self, work: &Work) -> Result<Board, BoardError> {
        let members = form_members(work, &self.member1, &self.member2)?;
        Ok(Board {
            id: None,
            date: self.date,
            time: self.time,
            place: self.place,
            members,
            files: vec![BoardFile {
                name: BOARD_FILE_NAME.to_string(),
                path: self.file_path,
            }],
            work_id: work.id.clone(),
        })
    }
}

/// Reschedule an existing board. Members and files carry over.
#[derive(Debug, Clone, Validate)]
pub struct BoardUpdate {
    pub date: Timestamp,
    #[validate(length(min = 1, message = "Time is required"))]
    pub time: String,
    #[validate(length(min = 1, message = "Place is required"))]
    pub place: String,
}

impl BoardUpdate {
    pub fn validate_at(&self, now: Timestamp) -> Result<(), FormErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };
        if self.date <= now {
            errors.push(FieldError::new("date", "Date must be greater than today"));
        }
        errors.into_result()
    }

    pub fn apply_to(self, existing: &Board) -> Board {
        Board {
            date: self.date,
            time: self.time,
            place: self.place,
            ..existing.clone()
        }
    }
}
