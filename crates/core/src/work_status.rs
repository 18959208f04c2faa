//! Work lifecycle status codes and the approval state machine.
//!
//! The status-action table lives here, independent of any rendering layer,
//! so the set of actions a client offers can be tested on its own. The
//! Entity Store re-checks every transition; this table is what a client
//! presents and submits.

use crate::models::course::Course;
use crate::models::work::Work;
use crate::roles::Role;

define_code_enum! {
    /// Work status, serialized as its numeric code.
    WorkStatus ("work status") {
        Pending = 0 => "Pending",
        ApprovedByAdvisor = 1 => "Approved by advisor",
        RejectedByAdvisor = 2 => "Reproved by advisor",
        /// Reserved: no client-triggered transition produces or consumes it.
        PendingCoordinator = 3 => "Pending coordinator",
        /// Reserved: no client-triggered transition produces or consumes it.
        ApprovedByCoordinator = 4 => "Approved by coordinator",
        RejectedByCoordinator = 5 => "Reproved by coordinator",
        InProgress = 6 => "In progress",
        ConcludedApproved = 7 => "Concluded approved",
        ConcludedReproved = 8 => "Concluded reproved",
    }
}

impl Default for WorkStatus {
    /// Every work starts out pending.
    fn default() -> Self {
        WorkStatus::Pending
    }
}

impl WorkStatus {
    /// Rejections and conclusions accept no further status action.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            WorkStatus::RejectedByAdvisor
                | WorkStatus::RejectedByCoordinator
                | WorkStatus::ConcludedApproved
                | WorkStatus::ConcludedReproved
        )
    }

    /// Codes declared by the Entity Store with no transition reachable from
    /// this client. Kept so fetched works carrying them still decode.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            WorkStatus::PendingCoordinator | WorkStatus::ApprovedByCoordinator
        )
    }

    /// Conclusions are only reached through an administrative update.
    pub fn is_concluded(self) -> bool {
        matches!(
            self,
            WorkStatus::ConcludedApproved | WorkStatus::ConcludedReproved
        )
    }
}

/// Rejected status change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Invalid transition: {from} ({}) -> {to} ({})", .from.id(), .to.id())]
    NotAllowed { from: WorkStatus, to: WorkStatus },

    #[error("Status {status} ({}) is reserved and cannot be set from this client", .status.id())]
    Reserved { status: WorkStatus },

    #[error("Only the work's advisor or a coordinator can change its status")]
    NoCapability,
}

/// What the caller may do with a work's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCapability {
    /// The caller is the work's advisor or co-advisor.
    Advisor,
    /// The caller coordinates the owning course, or is an admin.
    Coordinator,
    None,
}

impl StatusCapability {
    /// Resolve the caller's capability for `work`.
    ///
    /// `profile_id` is the caller's profile id (the id works reference, not
    /// the authentication id). `course` is the course owning the work's
    /// edict, when known.
    pub fn resolve(
        profile_id: Option<&str>,
        role: Option<Role>,
        work: &Work,
        course: Option<&Course>,
    ) -> Self {
        if role == Some(Role::Admin) {
            return StatusCapability::Coordinator;
        }
        let Some(profile_id) = profile_id else {
            return StatusCapability::None;
        };
        if work.advisor == profile_id || work.coadvisor.as_deref() == Some(profile_id) {
            return StatusCapability::Advisor;
        }
        match course {
            Some(course) if course.is_coordinated_by(profile_id) => StatusCapability::Coordinator,
            _ => StatusCapability::None,
        }
    }

    pub fn can_act(self) -> bool {
        !matches!(self, StatusCapability::None)
    }
}

pub mod state_machine {
    use super::{StatusCapability, TransitionError, WorkStatus};

    /// Status actions offered from `from`, in presentation order.
    ///
    /// Only Pending and ApprovedByAdvisor have outgoing actions. In-progress
    /// works move on through versions and the defense board; concluded
    /// states are set by administrative update, not by a status action.
    pub fn valid_transitions(from: WorkStatus) -> &'static [WorkStatus] {
        use WorkStatus::*;
        match from {
            // Pending -> ApprovedByAdvisor, RejectedByAdvisor
            Pending => &[ApprovedByAdvisor, RejectedByAdvisor],
            // ApprovedByAdvisor -> InProgress, RejectedByCoordinator
            ApprovedByAdvisor => &[InProgress, RejectedByCoordinator],
            RejectedByAdvisor | RejectedByCoordinator => &[],
            InProgress => &[],
            ConcludedApproved | ConcludedReproved => &[],
            PendingCoordinator | ApprovedByCoordinator => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is in the table.
    pub fn can_transition(from: WorkStatus, to: WorkStatus) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, naming both states on failure.
    pub fn validate_transition(from: WorkStatus, to: WorkStatus) -> Result<(), TransitionError> {
        if to.is_reserved() {
            return Err(TransitionError::Reserved { status: to });
        }
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed { from, to })
        }
    }

    /// Actions to present to a caller holding `capability`.
    pub fn offered_transitions(
        from: WorkStatus,
        capability: StatusCapability,
    ) -> &'static [WorkStatus] {
        if capability.can_act() {
            valid_transitions(from)
        } else {
            &[]
        }
    }

    /// Validate a status change requested by a caller holding `capability`.
    pub fn authorize_transition(
        from: WorkStatus,
        to: WorkStatus,
        capability: StatusCapability,
    ) -> Result<(), TransitionError> {
        if !capability.can_act() {
            return Err(TransitionError::NoCapability);
        }
        validate_transition(from, to)
    }
}
