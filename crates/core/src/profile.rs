//! Profile completion form.
//!
//! Every non-admin account must complete a profile before using the
//! system. The role-specific part is a tagged union chosen from the
//! account's role, so a form can never carry fields of two roles.

use crate::error::CoreError;
use crate::forms::{FieldError, FormErrors};
use crate::models::user::{ExternalProfile, Info, Sex, StudentProfile, TeacherProfile};
use crate::roles::Role;
use crate::types::{EntityId, Timestamp};

/// Role-specific profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileForm {
    Student(StudentProfile),
    Teacher(TeacherProfile),
    External(ExternalProfile),
}

impl ProfileForm {
    /// Blank form for `role`. Admins have no profile.
    pub fn empty_for(role: Role) -> Result<Self, CoreError> {
        match role {
            Role::Student => Ok(ProfileForm::Student(StudentProfile::default())),
            Role::Teacher => Ok(ProfileForm::Teacher(TeacherProfile::default())),
            Role::External => Ok(ProfileForm::External(ExternalProfile::default())),
            Role::Admin => Err(CoreError::Validation(
                "Admin accounts have no profile form".to_string(),
            )),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            ProfileForm::Student(_) => Role::Student,
            ProfileForm::Teacher(_) => Role::Teacher,
            ProfileForm::External(_) => Role::External,
        }
    }

    /// Required fields of the selected variant.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        self.collect_errors(&mut errors);
        errors.into_result()
    }

    fn collect_errors(&self, errors: &mut FormErrors) {
        match self {
            ProfileForm::Student(p) => {
                required(errors, "registration", &p.registration, "Registration is required");
                required(errors, "course", &p.course, "Course is required");
                if let (Some(admission), Some(graduation)) = (p.admission_date, p.graduation_date) {
                    if graduation < admission {
                        errors.push(FieldError::new(
                            "graduation_date",
                            "Graduation date must not precede admission date",
                        ));
                    }
                }
            }
            ProfileForm::Teacher(p) => {
                required(errors, "siape", &p.siape, "SIAPE is required");
                required(errors, "area", &p.area, "Area is required");
            }
            ProfileForm::External(p) => {
                required(errors, "institution", &p.institution, "Institution is required");
                required(errors, "formation", &p.formation, "Formation is required");
                required(errors, "area", &p.area, "Area is required");
            }
        }
    }
}

/// Fields shared by every profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonProfileFields {
    pub name: String,
    pub cpf: String,
    pub birth_date: Option<Timestamp>,
    pub sex: Option<Sex>,
}

/// A profile being completed for the account `auth_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub auth_id: EntityId,
    pub common: CommonProfileFields,
    pub form: ProfileForm,
}

impl ProfileDraft {
    pub fn new(auth_id: impl Into<EntityId>, role: Role) -> Result<Self, CoreError> {
        Ok(Self {
            auth_id: auth_id.into(),
            common: CommonProfileFields::default(),
            form: ProfileForm::empty_for(role)?,
        })
    }

    /// Check common and role-specific fields. The birth date must lie
    /// before `now`.
    pub fn check(&self, now: Timestamp) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        required(&mut errors, "name", &self.common.name, "Name is required");
        required(&mut errors, "cpf", &self.common.cpf, "CPF is required");
        match self.common.birth_date {
            None => errors.push(FieldError::new("birth_date", "Birth date is required")),
            Some(date) if date >= now => {
                errors.push(FieldError::new("birth_date", "Birth date must be in the past"))
            }
            Some(_) => {}
        }
        if self.common.sex.is_none() {
            errors.push(FieldError::new("sex", "Sex is required"));
        }
        self.form.collect_errors(&mut errors);
        errors.into_result()
    }

    /// Validate and build the `Info` payload for `POST /api/users`.
    pub fn into_info(self, now: Timestamp) -> Result<Info, FormErrors> {
        self.check(now)?;
        let (birth_date, sex) = match (self.common.birth_date, self.common.sex) {
            (Some(b), Some(s)) => (b, s),
            _ => return Err(FormErrors::default()),
        };
        let role = self.form.role();
        let (student, teacher, external) = match self.form {
            ProfileForm::Student(p) => (Some(p), None, None),
            ProfileForm::Teacher(p) => (None, Some(p), None),
            ProfileForm::External(p) => (None, None, Some(p)),
        };
        Ok(Info {
            id: None,
            auth_id: self.auth_id,
            name: self.common.name.trim().to_string(),
            cpf: self.common.cpf.trim().to_string(),
            birth_date,
            sex,
            role: Some(role),
            is_active: Some(true),
            student,
            teacher,
            external,
        })
    }
}

fn required(errors: &mut FormErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}
