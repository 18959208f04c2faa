//! Async REST client for the TCC Entity Store.
//!
//! [`ApiClient`] talks HTTP; [`services`] gives one typed view per
//! resource; [`workflow::Session`] runs the multi-step operations that
//! check the rules in `tcc-core` before submitting anything.

pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod services;
pub mod workflow;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use workflow::{ProfileLookup, Session, StatusChange};
