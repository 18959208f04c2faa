//! Edict model.

use serde::{Deserialize, Serialize};

use crate::models::work::Work;
use crate::schedule::{self, PhaseName, SchedulePhase};
use crate::types::{EntityId, Timestamp};

/// A time-boxed call under which works are submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edict {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub description: String,
    #[serde(with = "crate::types::timestamp")]
    pub start_date: Timestamp,
    #[serde(with = "crate::types::timestamp")]
    pub end_date: Timestamp,
    pub course_id: EntityId,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub schedule: Vec<SchedulePhase>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub works: Vec<Work>,
}

impl Edict {
    /// Put the schedule in display order. Idempotent.
    pub fn sort_schedule(&mut self) {
        schedule::sort_phases(&mut self.schedule);
    }

    pub fn phase(&self, name: PhaseName) -> Option<&SchedulePhase> {
        self.schedule.iter().find(|p| p.name == name)
    }

    /// Whether `now` falls inside a fully dated registration phase.
    pub fn accepts_registrations(&self, now: Timestamp) -> bool {
        self.phase(PhaseName::TccRegister)
            .is_some_and(|phase| phase.contains(now))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn edict_with(phases: Vec<SchedulePhase>) -> Edict {
        let now = Utc::now();
        Edict {
            id: Some("e1".into()),
            name: "2026.2".into(),
            description: String::new(),
            start_date: now,
            end_date: now + Duration::days(180),
            course_id: "c1".into(),
            schedule: phases,
            works: Vec::new(),
        }
    }

    #[test]
    fn explicit_nulls_read_as_defaults() {
        let edict: Edict = serde_json::from_value(serde_json::json!({
            "id": "e1",
            "name": "2026.2",
            "description": null,
            "startDate": "2026-08-01",
            "endDate": "2026-12-20",
            "courseId": "c1",
            "schedule": null,
            "works": null
        }))
        .unwrap();
        assert_eq!(edict.description, "");
        assert!(edict.schedule.is_empty());
        assert!(edict.works.is_empty());
    }

    #[test]
    fn sort_schedule_is_idempotent() {
        let mut edict = edict_with(vec![
            SchedulePhase::undated(PhaseName::TccDefense),
            SchedulePhase::undated(PhaseName::TccRegister),
            SchedulePhase::undated(PhaseName::FinalVersion),
            SchedulePhase::undated(PhaseName::PartialVersion),
        ]);
        edict.sort_schedule();
        let first: Vec<PhaseName> = edict.schedule.iter().map(|p| p.name).collect();
        edict.sort_schedule();
        let second: Vec<PhaseName> = edict.schedule.iter().map(|p| p.name).collect();
        assert_eq!(first, PhaseName::ORDER.to_vec());
        assert_eq!(first, second);
    }

    #[test]
    fn registrations_open_inside_register_phase() {
        let now = Utc::now();
        let edict = edict_with(vec![SchedulePhase::dated(
            PhaseName::TccRegister,
            now - Duration::days(1),
            now + Duration::days(1),
        )]);
        assert!(edict.accepts_registrations(now));
        assert!(!edict.accepts_registrations(now + Duration::days(2)));
    }

    #[test]
    fn registrations_closed_when_register_phase_undated() {
        let edict = edict_with(vec![SchedulePhase::undated(PhaseName::TccRegister)]);
        assert!(!edict.accepts_registrations(Utc::now()));
    }
}
