//! One typed service per Entity Store resource.
//!
//! Services are thin views over an [`ApiClient`](crate::api::ApiClient):
//! `client.works().fetch(id)`. Multi-step flows live in
//! [`crate::workflow`].

pub mod auth;
pub mod courses;
pub mod edicts;
pub mod files;
pub mod organs;
pub mod users;
pub mod works;

pub use auth::{AuthService, LoginResponse};
pub use courses::CourseService;
pub use edicts::EdictService;
pub use files::{FileService, UploadedFile};
pub use organs::OrganService;
pub use users::UserService;
pub use works::WorkService;

/// Id of an entity that must already exist on the store.
fn require_id<'a>(entity: &'static str, id: Option<&'a str>) -> Result<&'a str, crate::error::ClientError> {
    id.filter(|id| !id.is_empty()).ok_or_else(|| {
        tcc_core::error::CoreError::Validation(format!("{entity} has no id")).into()
    })
}
