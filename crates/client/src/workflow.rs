//! Multi-step operations that combine local rules with API calls.
//!
//! Each workflow validates locally first and sends nothing when a rule
//! fails. After a mutation the affected entity is refetched so the caller
//! always holds the store's version; nothing is updated optimistically.

use chrono::Utc;
use tcc_core::auth::AuthContext;
use tcc_core::board::{validate_members, BoardRequest, BoardUpdate};
use tcc_core::error::CoreError;
use tcc_core::forms::{EdictForm, VersionForm, WorkForm};
use tcc_core::models::course::Course;
use tcc_core::models::edict::Edict;
use tcc_core::models::user::Info;
use tcc_core::models::work::Work;
use tcc_core::profile::ProfileDraft;
use tcc_core::roles::Role;
use tcc_core::schedule::{validate_schedule, SchedulePhase};
use tcc_core::work_status::{state_machine, StatusCapability, WorkStatus};

use crate::api::ApiClient;
use crate::error::ClientError;

/// Result of looking up the caller's own profile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileLookup {
    Found(Info),
    /// No profile yet; the caller must complete one before continuing.
    Incomplete { auth_id: String, role: Option<Role> },
    /// Admin accounts have no profile.
    NotRequired,
}

/// A work together with the status actions now offered to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub work: Work,
    pub capability: StatusCapability,
    pub offered: Vec<WorkStatus>,
}

/// An API client acting on behalf of one caller.
pub struct Session<A> {
    api: ApiClient,
    auth: A,
}

impl<A: AuthContext> Session<A> {
    /// The caller's bearer token, if any, replaces the client's.
    pub fn new(mut api: ApiClient, auth: A) -> Self {
        if let Some(token) = auth.bearer_token() {
            api.set_token(Some(token.to_string()));
        }
        Self { api, auth }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    fn require_account(&self) -> Result<&str, ClientError> {
        match self.auth.current_user_id() {
            Some(id) if self.auth.is_authenticated() => Ok(id),
            _ => Err(CoreError::Unauthorized("Not logged in".into()).into()),
        }
    }

    /* ----------------------------------------------------------------------
    Profile
    ---------------------------------------------------------------------- */

    /// Fetch the caller's profile. A 404 is not an error: it means the
    /// profile still has to be completed.
    pub async fn current_profile(&self) -> Result<ProfileLookup, ClientError> {
        let auth_id = self.require_account()?;
        let role = self.auth.current_role();
        if role == Some(Role::Admin) {
            return Ok(ProfileLookup::NotRequired);
        }

        match self.api.users().fetch_by_auth_id(auth_id).await {
            Ok(info) => Ok(ProfileLookup::Found(info)),
            Err(e) if e.is_not_found() => {
                tracing::info!(auth_id, "Profile not completed");
                Ok(ProfileLookup::Incomplete {
                    auth_id: auth_id.to_string(),
                    role,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Submit a completed profile for the caller's own account.
    pub async fn complete_profile(&self, draft: ProfileDraft) -> Result<Info, ClientError> {
        let auth_id = self.require_account()?;
        if draft.auth_id != auth_id {
            return Err(CoreError::Forbidden("Profiles can only be completed for your own account".into()).into());
        }
        if let Some(role) = self.auth.current_role() {
            if role != draft.form.role() {
                return Err(CoreError::Validation(format!(
                    "A {role} account needs a {role} profile, not {}",
                    draft.form.role()
                ))
                .into());
            }
        }

        let info = draft.into_info(Utc::now()).map_err(|errors| {
            tracing::warn!(%errors, auth_id, "Profile form rejected");
            ClientError::from(errors)
        })?;
        self.api.users().create(&info).await
    }

    async fn profile_id(&self) -> Result<Option<String>, ClientError> {
        Ok(match self.current_profile().await? {
            ProfileLookup::Found(info) => info.id,
            _ => None,
        })
    }

    /* ----------------------------------------------------------------------
    Work status
    ---------------------------------------------------------------------- */

    /// What the caller may do with `work`'s status. The owning course is
    /// only fetched when the caller is not already a supervisor.
    pub async fn status_capability(&self, work: &Work) -> Result<StatusCapability, ClientError> {
        if !self.auth.is_authenticated() {
            return Ok(StatusCapability::None);
        }
        let role = self.auth.current_role();
        if role == Some(Role::Admin) {
            return Ok(StatusCapability::Coordinator);
        }
        let profile_id = self.profile_id().await?;
        let profile_id = profile_id.as_deref();

        let capability = StatusCapability::resolve(profile_id, role, work, None);
        if capability.can_act() || profile_id.is_none() || work.edict_id.is_empty() {
            return Ok(capability);
        }

        let course = self.owning_course(work).await?;
        Ok(StatusCapability::resolve(profile_id, role, work, course.as_ref()))
    }

    async fn owning_course(&self, work: &Work) -> Result<Option<Course>, ClientError> {
        let edict = self.api.edicts().fetch(&work.edict_id).await?;
        match self.api.courses().fetch(&edict.course_id).await {
            Ok(course) => Ok(Some(course)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The work and the status actions currently offered to the caller.
    pub async fn status_actions(&self, work_id: &str) -> Result<StatusChange, ClientError> {
        let work = self.api.works().fetch(work_id).await?;
        let capability = self.status_capability(&work).await?;
        let offered = state_machine::offered_transitions(work.status, capability).to_vec();
        Ok(StatusChange {
            work,
            capability,
            offered,
        })
    }

    /// Move a work to `to`.
    ///
    /// The transition is checked against a fresh copy of the work, then
    /// submitted, then the work is fetched again. The returned actions are
    /// the ones offered from the new status.
    pub async fn change_work_status(&self, work_id: &str, to: WorkStatus) -> Result<StatusChange, ClientError> {
        let work = self.api.works().fetch(work_id).await?;
        let capability = self.status_capability(&work).await?;

        if let Err(e) = state_machine::authorize_transition(work.status, to, capability) {
            tracing::warn!(work_id, from = %work.status, to = %to, error = %e, "Status change rejected");
            return Err(e.into());
        }

        self.api.works().change_status(work_id, to).await?;

        let work = self.api.works().fetch(work_id).await?;
        let offered = state_machine::offered_transitions(work.status, capability).to_vec();
        Ok(StatusChange {
            work,
            capability,
            offered,
        })
    }

    /* ----------------------------------------------------------------------
    Edicts
    ---------------------------------------------------------------------- */

    /// Create (`edict_id` is `None`) or update an edict with its schedule.
    /// The form and every phase are checked before anything is sent.
    pub async fn save_edict(
        &self,
        course_id: &str,
        edict_id: Option<&str>,
        form: EdictForm,
        schedule: Vec<SchedulePhase>,
    ) -> Result<Edict, ClientError> {
        if let Err(errors) = form.check() {
            tracing::warn!(%errors, course_id, "Edict form rejected");
            return Err(errors.into());
        }
        if let Err(e) = validate_schedule(&schedule) {
            tracing::warn!(course_id, phase = %e.phase(), error = %e, "Schedule incomplete");
            return Err(e.into());
        }

        let edict = form.into_edict(edict_id.map(str::to_string), course_id.to_string(), schedule);
        match edict_id {
            Some(_) => self.api.edicts().update(&edict).await,
            None => self.api.edicts().create(course_id, &edict).await,
        }
    }

    /* ----------------------------------------------------------------------
    Works
    ---------------------------------------------------------------------- */

    /// Register a work, checking participant roles against the directory.
    pub async fn create_work(&self, form: WorkForm) -> Result<Work, ClientError> {
        let users = self.api.users().list().await?;
        self.api.works().create(form, Some(&users)).await
    }

    /// Upload a file and append it to the work as a new version.
    pub async fn submit_version(
        &self,
        work_id: &str,
        name: &str,
        description: Option<String>,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Work, ClientError> {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("Name is required".into()).into());
        }
        let uploaded = self.api.files().upload(file_name, content_type, bytes).await?;
        let form = VersionForm {
            name: name.to_string(),
            description,
            file: uploaded.uri,
        };
        self.api.works().add_version(work_id, form).await?;
        self.api.works().fetch(work_id).await
    }

    /* ----------------------------------------------------------------------
    Defense board
    ---------------------------------------------------------------------- */

    /// Request the defense board for a work that has none yet.
    pub async fn request_board(&self, work_id: &str, request: BoardRequest) -> Result<Work, ClientError> {
        if let Err(errors) = request.validate_at(Utc::now()) {
            tracing::warn!(%errors, work_id, "Board request rejected");
            return Err(errors.into());
        }

        let work = self.api.works().fetch(work_id).await?;
        if work.board.is_some() {
            return Err(CoreError::Conflict(format!("Work {work_id} already has a board")).into());
        }

        let users = self.api.users().list().await?;
        let board = request.into_board(&work)?;
        if let Err(e) = validate_members(&work, &board.members, &users) {
            tracing::warn!(work_id, error = %e, "Board members rejected");
            return Err(e.into());
        }

        self.api.works().add_board(work_id, &board).await?;
        self.api.works().fetch(work_id).await
    }

    /// Move an existing board to a new date, time, and place.
    pub async fn reschedule_board(&self, work_id: &str, update: BoardUpdate) -> Result<Work, ClientError> {
        if let Err(errors) = update.validate_at(Utc::now()) {
            tracing::warn!(%errors, work_id, "Board update rejected");
            return Err(errors.into());
        }

        let work = self.api.works().fetch(work_id).await?;
        let current = work.board.ok_or_else(|| CoreError::NotFound {
            entity: "Board",
            id: work_id.to_string(),
        })?;
        let board = update.apply_to(&current);

        self.api.works().update_board(work_id, &board).await?;
        self.api.works().fetch(work_id).await
    }
}
