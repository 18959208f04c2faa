//! Courses (`/api/course`).

use reqwest::Method;
use tcc_core::forms::CourseForm;
use tcc_core::models::course::Course;
use tcc_core::models::user::Info;

use super::require_id;
use crate::api::ApiClient;
use crate::error::ClientError;

pub struct CourseService<'a> {
    api: &'a ApiClient,
}

impl ApiClient {
    pub fn courses(&self) -> CourseService<'_> {
        CourseService { api: self }
    }
}

impl CourseService<'_> {
    pub async fn list(&self) -> Result<Vec<Course>, ClientError> {
        self.api.get_json("/api/course").await
    }

    pub async fn fetch(&self, id: &str) -> Result<Course, ClientError> {
        self.api.get_json(&format!("/api/course/{id}")).await
    }

    /// Validate `form` (coordinators must be teachers when `users` is
    /// given) and create the course.
    pub async fn create(&self, form: CourseForm, users: Option<&[Info]>) -> Result<Course, ClientError> {
        if let Err(errors) = form.check(users) {
            tracing::warn!(%errors, "Course form rejected");
            return Err(errors.into());
        }
        let course = form.into_course(None);
        let created: Course = self.api.send_json(Method::POST, "/api/course", &course).await?;
        tracing::info!(course = %created.acronym, "Course created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, form: CourseForm, users: Option<&[Info]>) -> Result<Course, ClientError> {
        if let Err(errors) = form.check(users) {
            tracing::warn!(%errors, course_id = id, "Course form rejected");
            return Err(errors.into());
        }
        let course = form.into_course(Some(id.to_string()));
        let updated: Course = self
            .api
            .send_json(Method::PUT, &format!("/api/course/{id}"), &course)
            .await?;
        tracing::info!(course_id = id, "Course updated");
        Ok(updated)
    }

    pub async fn delete(&self, course: &Course) -> Result<(), ClientError> {
        let id = require_id("Course", course.id.as_deref())?;
        self.api
            .send_empty(Method::DELETE, &format!("/api/course/{id}"))
            .await?;
        tracing::info!(course_id = id, "Course deleted");
        Ok(())
    }
}
