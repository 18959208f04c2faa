//! Entity snapshots as the Entity Store serializes them.
//!
//! The client never owns these; it mirrors fetched snapshots and submits
//! create/update payloads built from the same types.

pub mod course;
pub mod edict;
pub mod user;
pub mod work;
