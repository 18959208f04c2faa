//! Edict schedule phases and the schedule validator.
//!
//! An edict's schedule has exactly four phases. Phases are presented and
//! validated in a fixed order no matter how the store returns them. Only
//! per-phase completeness and per-phase range are checked at save time;
//! phases may overlap or run out of order relative to each other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/* --------------------------------------------------------------------------
Phase names
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    TccRegister,
    PartialVersion,
    FinalVersion,
    TccDefense,
}

impl PhaseName {
    /// Display and validation order.
    pub const ORDER: [PhaseName; 4] = [
        PhaseName::TccRegister,
        PhaseName::PartialVersion,
        PhaseName::FinalVersion,
        PhaseName::TccDefense,
    ];

    pub fn ordinal(self) -> usize {
        match self {
            PhaseName::TccRegister => 0,
            PhaseName::PartialVersion => 1,
            PhaseName::FinalVersion => 2,
            PhaseName::TccDefense => 3,
        }
    }

    /// Wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseName::TccRegister => "tcc_register",
            PhaseName::PartialVersion => "partial_version",
            PhaseName::FinalVersion => "final_version",
            PhaseName::TccDefense => "tcc_defense",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PhaseName::TccRegister => "TCC Registration",
            PhaseName::PartialVersion => "Partial Version",
            PhaseName::FinalVersion => "Final Version",
            PhaseName::TccDefense => "TCC Defense",
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhaseName::ORDER
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid schedule phase '{s}'. Must be one of: tcc_register, partial_version, final_version, tcc_defense"
                ))
            })
    }
}

/* --------------------------------------------------------------------------
Phases
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePhase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: PhaseName,
    #[serde(default, with = "crate::types::timestamp::option")]
    pub start_date: Option<Timestamp>,
    #[serde(default, with = "crate::types::timestamp::option")]
    pub end_date: Option<Timestamp>,
}

impl SchedulePhase {
    pub fn undated(name: PhaseName) -> Self {
        Self {
            id: None,
            name,
            start_date: None,
            end_date: None,
        }
    }

    pub fn dated(name: PhaseName, start: Timestamp, end: Timestamp) -> Self {
        Self {
            id: None,
            name,
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    /// Whether `at` lies within a fully dated phase, bounds inclusive.
    pub fn contains(&self, at: Timestamp) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= at && at <= end,
            _ => false,
        }
    }
}

/// The four phases, undated, in display order. Starting point for a new
/// edict's schedule.
pub fn default_schedule() -> Vec<SchedulePhase> {
    PhaseName::ORDER.into_iter().map(SchedulePhase::undated).collect()
}

/// Sort phases into display order. Stable, so repeated calls agree.
pub fn sort_phases(phases: &mut [SchedulePhase]) {
    phases.sort_by_key(|p| p.name.ordinal());
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Schedule rejection, naming the offending phase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("phase {0} is missing")]
    MissingPhase(PhaseName),

    #[error("phase {0} appears more than once")]
    DuplicatePhase(PhaseName),

    #[error("phase {0} has no start date")]
    MissingStartDate(PhaseName),

    #[error("phase {0} has no end date")]
    MissingEndDate(PhaseName),

    #[error("phase {0} ends before it starts")]
    EndBeforeStart(PhaseName),

    #[error("phase {0} must start after today")]
    StartNotInFuture(PhaseName),

    #[error("phase {0} must end after today")]
    EndNotInFuture(PhaseName),
}

impl ScheduleError {
    pub fn phase(&self) -> PhaseName {
        match *self {
            ScheduleError::MissingPhase(p)
            | ScheduleError::DuplicatePhase(p)
            | ScheduleError::MissingStartDate(p)
            | ScheduleError::MissingEndDate(p)
            | ScheduleError::EndBeforeStart(p)
            | ScheduleError::StartNotInFuture(p)
            | ScheduleError::EndNotInFuture(p) => p,
        }
    }
}

/// Check that all four phases are present once and fully dated, with each
/// phase ending no earlier than it starts.
///
/// Phases are checked in display order, so the first incomplete phase in
/// that order is reported. Ordering between phases is not checked.
pub fn validate_schedule(phases: &[SchedulePhase]) -> Result<(), ScheduleError> {
    for name in PhaseName::ORDER {
        let mut matching = phases.iter().filter(|p| p.name == name);
        let phase = matching.next().ok_or(ScheduleError::MissingPhase(name))?;
        if matching.next().is_some() {
            return Err(ScheduleError::DuplicatePhase(name));
        }

        let start = phase.start_date.ok_or(ScheduleError::MissingStartDate(name))?;
        let end = phase.end_date.ok_or(ScheduleError::MissingEndDate(name))?;
        if end < start {
            return Err(ScheduleError::EndBeforeStart(name));
        }
    }
    Ok(())
}

/// Phase editor rule: both dates strictly after `now`, end not before start.
pub fn validate_phase_dates(
    name: PhaseName,
    start: Timestamp,
    end: Timestamp,
    now: Timestamp,
) -> Result<(), ScheduleError> {
    if start <= now {
        return Err(ScheduleError::StartNotInFuture(name));
    }
    if end <= now {
        return Err(ScheduleError::EndNotInFuture(name));
    }
    if end < start {
        return Err(ScheduleError::EndBeforeStart(name));
    }
    Ok(())
}

/// Set a phase's dates after checking them with [`validate_phase_dates`].
/// Adds the phase if the schedule lacks it; leaves the schedule in display
/// order.
pub fn set_phase_dates(
    phases: &mut Vec<SchedulePhase>,
    name: PhaseName,
    start: Timestamp,
    end: Timestamp,
    now: Timestamp,
) -> Result<(), ScheduleError> {
    validate_phase_dates(name, start, end, now)?;

    match phases.iter_mut().find(|p| p.name == name) {
        Some(phase) => {
            phase.start_date = Some(start);
            phase.end_date = Some(end);
        }
        None => phases.push(SchedulePhase::dated(name, start, end)),
    }
    sort_phases(phases);
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
