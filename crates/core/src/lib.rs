//! Domain model and workflow rules for TCC (capstone project) management.
//!
//! The Entity Store behind the REST API is the authority for every entity;
//! this crate holds the rules a client must respect before submitting an
//! intent: the work status state machine, the edict schedule validator, the
//! board formation rule, form validation, and the advisory auth context.

#[macro_use]
mod macros;

pub mod auth;
pub mod board;
pub mod error;
pub mod forms;
pub mod knowledge_area;
pub mod models;
pub mod profile;
pub mod roles;
pub mod schedule;
pub mod types;
pub mod work_status;
