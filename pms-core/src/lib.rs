//! PMS Core - project, task and team management backend
//!
//! The heart of the crate is the access policy in [`policy`]: every service
//! operation asks it whether the calling [`domain::Actor`] may act on a
//! resource, and listing operations use the same rules through
//! [`policy::AccessFilter`].

pub mod config;
pub mod domain;
pub mod error;
pub mod policy;
pub mod repository;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use state::{AppState, HasServices};
