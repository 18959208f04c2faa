//! Client-side form validation.
//!
//! Every create/update payload is checked here before any request goes
//! out. Failures carry one message per field so a caller can show them
//! inline. The Entity Store validates again on its side.

use std::fmt;

use validator::Validate;

use crate::knowledge_area::KnowledgeArea;
use crate::models::course::{Course, Organ};
use crate::models::edict::Edict;
use crate::models::user::Info;
use crate::models::work::{Version, Work};
use crate::roles::Role;
use crate::schedule::SchedulePhase;
use crate::types::{EntityId, Timestamp};
use crate::work_status::WorkStatus;

/* --------------------------------------------------------------------------
Errors
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All field failures of one form submission, sorted by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
        self.errors.sort_by(|a, b| a.field.cmp(&b.field));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

impl From<validator::ValidationErrors> for FormErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FormErrors::default();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid ({})", error.code));
                out.push(FieldError::new(field.to_string(), message));
            }
        }
        out
    }
}

/// Run the derived field checks and collect them.
fn check<T: Validate>(form: &T) -> FormErrors {
    match form.validate() {
        Ok(()) => FormErrors::default(),
        Err(e) => FormErrors::from(e),
    }
}

/* --------------------------------------------------------------------------
Auth forms
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        check(self).into_result()
    }
}

#[derive(Debug, Clone, Validate)]
pub struct PasswordResetForm {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub repeat_new_password: String,
}

impl PasswordResetForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        check(self).into_result()
    }
}

/* --------------------------------------------------------------------------
Course and organ forms
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Validate)]
pub struct CourseForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Acronym is required"))]
    pub acronym: String,
    #[validate(length(min = 1, message = "Coordinator is required"))]
    pub coordinator: EntityId,
    #[validate(length(min = 1, message = "Tcc Coordinator is required"))]
    pub tcc_coordinator: EntityId,
}

impl CourseForm {
    /// Field checks, then both coordinators must be teachers when a user
    /// directory is supplied.
    pub fn check(&self, users: Option<&[Info]>) -> Result<(), FormErrors> {
        let mut errors = check(self);
        if let Some(users) = users {
            for (field, id) in [
                ("coordinator", &self.coordinator),
                ("tcc_coordinator", &self.tcc_coordinator),
            ] {
                if !id.is_empty() && !has_role(users, id, |r| r == Role::Teacher) {
                    errors.push(FieldError::new(field, "Must be a teacher"));
                }
            }
        }
        errors.into_result()
    }

    pub fn into_course(self, id: Option<EntityId>) -> Course {
        Course {
            id,
            name: self.name,
            acronym: self.acronym,
            coordinator: self.coordinator,
            tcc_coordinator: self.tcc_coordinator,
            organs: Vec::new(),
            edicts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct OrganForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Acronym is required"))]
    pub acronym: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Course is required"))]
    pub course_id: EntityId,
}

impl OrganForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        check(self).into_result()
    }

    /// New organs start without members; members are added one at a time.
    pub fn into_organ(self, id: Option<EntityId>, teachers: Vec<EntityId>) -> Organ {
        Organ {
            id,
            name: self.name,
            acronym: self.acronym,
            description: self.description.unwrap_or_default(),
            teachers,
            course_id: self.course_id,
        }
    }
}

/// Organ membership is restricted to teachers not already on the roster.
pub fn check_organ_member(organ: &Organ, users: &[Info], teacher_id: &str) -> Result<(), FormErrors> {
    let mut errors = FormErrors::default();
    if teacher_id.trim().is_empty() {
        errors.push(FieldError::new("teacher", "Teacher is required"));
    } else if organ.has_member(teacher_id) {
        errors.push(FieldError::new("teacher", "Already a member of this organ"));
    } else if !has_role(users, teacher_id, |r| r == Role::Teacher) {
        errors.push(FieldError::new("teacher", "Must be a teacher"));
    }
    errors.into_result()
}

/* --------------------------------------------------------------------------
Edict form
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Validate)]
pub struct EdictForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

impl EdictForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        let mut errors = check(self);
        if self.end_date < self.start_date {
            errors.push(FieldError::new("end_date", "End date must not precede start date"));
        }
        errors.into_result()
    }

    /// Build the combined edict + schedule payload.
    pub fn into_edict(
        self,
        id: Option<EntityId>,
        course_id: EntityId,
        schedule: Vec<SchedulePhase>,
    ) -> Edict {
        let mut edict = Edict {
            id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            start_date: self.start_date,
            end_date: self.end_date,
            course_id,
            schedule,
            works: Vec::new(),
        };
        edict.sort_schedule();
        edict
    }
}

/* --------------------------------------------------------------------------
Work and version forms
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Validate)]
pub struct WorkForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub knowledge_area: KnowledgeArea,
    #[validate(length(min = 1, message = "Abstract is required"))]
    pub summary: String,
    #[validate(length(min = 1, message = "Keywords are required"))]
    pub keywords: String,
    #[validate(length(min = 1, message = "Advisor is required"))]
    pub advisor: EntityId,
    pub coadvisor: Option<EntityId>,
    #[validate(length(min = 1, message = "Request form is required"))]
    pub request_form: String,
    pub record_form: Option<String>,
    #[validate(length(min = 1, message = "Student is required"))]
    pub student: EntityId,
    #[validate(length(min = 1, message = "Edict is required"))]
    pub edict_id: EntityId,
}

impl WorkForm {
    /// Field checks, then participant roles when a user directory is
    /// supplied: advisor and co-advisor must be teacher/external, the
    /// student must be a student, and nobody may hold two roles.
    pub fn check(&self, users: Option<&[Info]>) -> Result<(), FormErrors> {
        let mut errors = check(self);
        let coadvisor = self.coadvisor.as_deref().filter(|c| !c.trim().is_empty());

        if coadvisor == Some(self.advisor.as_str()) {
            errors.push(FieldError::new("coadvisor", "Co-advisor must differ from advisor"));
        }
        let student_supervises = self.student == self.advisor || coadvisor == Some(self.student.as_str());
        if !self.student.is_empty() && student_supervises {
            errors.push(FieldError::new("student", "Student cannot supervise their own work"));
        }

        if let Some(users) = users {
            if !self.advisor.is_empty() && !has_role(users, &self.advisor, Role::can_advise) {
                errors.push(FieldError::new("advisor", "Must be a teacher or external member"));
            }
            if let Some(c) = coadvisor {
                if !has_role(users, c, Role::can_advise) {
                    errors.push(FieldError::new("coadvisor", "Must be a teacher or external member"));
                }
            }
            if !self.student.is_empty() && !has_role(users, &self.student, |r| r == Role::Student) {
                errors.push(FieldError::new("student", "Must be a student"));
            }
        }
        errors.into_result()
    }

    /// New works always start pending and without scores.
    pub fn into_work(self) -> Work {
        Work {
            id: None,
            title: self.title,
            knowledge_area: self.knowledge_area,
            r#abstract: self.summary,
            keywords: self.keywords,
            advisor: self.advisor,
            coadvisor: self.coadvisor.filter(|c| !c.trim().is_empty()),
            request_form: self.request_form,
            record_form: self.record_form.unwrap_or_default(),
            status: WorkStatus::Pending,
            student: self.student,
            edict_id: self.edict_id,
            first_score: None,
            second_score: None,
            final_score: None,
            versions: Vec::new(),
            board: None,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct VersionForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    /// URI returned by the file service.
    #[validate(length(min = 1, message = "File is required"))]
    pub file: String,
}

impl VersionForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        check(self).into_result()
    }

    pub fn into_version(self) -> Version {
        Version {
            id: None,
            name: self.name,
            description: self.description.filter(|d| !d.trim().is_empty()),
            file: self.file,
        }
    }
}

fn has_role(users: &[Info], id: &str, accept: impl Fn(Role) -> bool) -> bool {
    users
        .iter()
        .find(|u| u.id() == Some(id))
        .and_then(|u| u.role)
        .is_some_and(accept)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::user::Sex;
    use crate::schedule::default_schedule;

    fn user(id: &str, role: Role) -> Info {
        Info {
            id: Some(id.to_string()),
            auth_id: format!("auth-{id}"),
            name: id.to_string(),
            cpf: String::new(),
            birth_date: Utc::now(),
            sex: Sex::Other,
            role: Some(role),
            is_active: None,
            student: None,
            teacher: None,
            external: None,
        }
    }

    fn users() -> Vec<Info> {
        vec![
            user("t1", Role::Teacher),
            user("x1", Role::External),
            user("s1", Role::Student),
            user("adm", Role::Admin),
        ]
    }

    fn work_form() -> WorkForm {
        WorkForm {
            title: "Cache coherence".into(),
            knowledge_area: KnowledgeArea::Networks,
            summary: "Abstract".into(),
            keywords: "cache".into(),
            advisor: "t1".into(),
            coadvisor: Some("x1".into()),
            request_form: "https://files/req.pdf".into(),
            record_form: None,
            student: "s1".into(),
            edict_id: "e1".into(),
        }
    }

    #[test]
    fn login_requires_valid_email() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: String::new(),
        };
        let errors = form.check().unwrap_err();
        assert_eq!(errors.message_for("email"), Some("Invalid email"));
        assert_eq!(errors.message_for("password"), Some("Password is required"));
    }

    #[test]
    fn password_reset_requires_match() {
        let form = PasswordResetForm {
            token: "tok".into(),
            new_password: "a".into(),
            repeat_new_password: "b".into(),
        };
        assert!(form.check().unwrap_err().has_field("repeat_new_password"));
    }

    #[test]
    fn course_requires_teacher_coordinators() {
        let form = CourseForm {
            name: "Computer Science".into(),
            acronym: "CS".into(),
            coordinator: "t1".into(),
            tcc_coordinator: "x1".into(),
        };
        assert!(form.check(None).is_ok());
        let errors = form.check(Some(&users())).unwrap_err();
        assert!(errors.has_field("tcc_coordinator"));
        assert!(!errors.has_field("coordinator"));
    }

    fn organ(teachers: &[&str]) -> Organ {
        Organ {
            id: Some("o1".into()),
            name: "Computing Department".into(),
            acronym: "DCOMP".into(),
            teachers: teachers.iter().map(|t| t.to_string()).collect(),
            course_id: "c1".into(),
            ..Organ::default()
        }
    }

    #[test]
    fn organ_member_must_be_teacher() {
        let organ = organ(&[]);
        assert!(check_organ_member(&organ, &users(), "t1").is_ok());
        assert!(check_organ_member(&organ, &users(), "s1").is_err());
        assert!(check_organ_member(&organ, &users(), "").is_err());
    }

    #[test]
    fn organ_member_cannot_join_twice() {
        let errors = check_organ_member(&organ(&["t1"]), &users(), "t1").unwrap_err();
        assert_eq!(errors.message_for("teacher"), Some("Already a member of this organ"));
    }

    #[test]
    fn empty_student_and_advisor_report_only_required() {
        let form = WorkForm {
            advisor: String::new(),
            coadvisor: None,
            student: String::new(),
            ..work_form()
        };
        let errors = form.check(None).unwrap_err();
        assert_eq!(errors.message_for("student"), Some("Student is required"));
        assert_eq!(errors.message_for("advisor"), Some("Advisor is required"));
        assert_eq!(errors.errors().iter().filter(|e| e.field == "student").count(), 1);
    }

    #[test]
    fn edict_dates_must_not_be_inverted() {
        let now = Utc::now();
        let form = EdictForm {
            name: "2026.2".into(),
            description: None,
            start_date: now,
            end_date: now - Duration::days(1),
        };
        assert!(form.check().unwrap_err().has_field("end_date"));
    }

    #[test]
    fn edict_form_sorts_schedule() {
        let now = Utc::now();
        let mut schedule = default_schedule();
        schedule.reverse();
        let edict = EdictForm {
            name: "2026.2".into(),
            description: None,
            start_date: now,
            end_date: now,
        }
        .into_edict(None, "c1".into(), schedule);
        assert_eq!(edict.schedule, default_schedule());
    }

    #[test]
    fn valid_work_form_passes_with_directory() {
        assert!(work_form().check(Some(&users())).is_ok());
    }

    #[test]
    fn work_form_rejects_student_as_advisor() {
        let mut form = work_form();
        form.advisor = "s1".into();
        let errors = form.check(Some(&users())).unwrap_err();
        assert!(errors.has_field("advisor"));
        assert!(errors.has_field("student"));
    }

    #[test]
    fn work_form_rejects_teacher_as_student() {
        let mut form = work_form();
        form.student = "adm".into();
        let errors = form.check(Some(&users())).unwrap_err();
        assert_eq!(errors.message_for("student"), Some("Must be a student"));
    }

    #[test]
    fn work_form_reports_missing_fields() {
        let mut form = work_form();
        form.title.clear();
        form.edict_id.clear();
        let errors = form.check(None).unwrap_err();
        assert_eq!(errors.message_for("title"), Some("Title is required"));
        assert_eq!(errors.message_for("edict_id"), Some("Edict is required"));
    }

    #[test]
    fn new_work_is_pending() {
        let work = work_form().into_work();
        assert_eq!(work.status, WorkStatus::Pending);
        assert_eq!(work.coadvisor.as_deref(), Some("x1"));
        assert!(work.final_score.is_none());
    }

    #[test]
    fn version_requires_file() {
        let form = VersionForm {
            name: "Partial".into(),
            description: Some("  ".into()),
            file: String::new(),
        };
        assert!(form.check().unwrap_err().has_field("file"));
    }

    #[test]
    fn blank_version_description_dropped() {
        let version = VersionForm {
            name: "Partial".into(),
            description: Some("  ".into()),
            file: "https://files/v.pdf".into(),
        }
        .into_version();
        assert_eq!(version.description, None);
    }
}
