//! Domain models for PMS Core

pub mod common;
pub mod project;
pub mod task;
pub mod team;
pub mod user;

pub use common::*;
pub use project::*;
pub use task::*;
pub use team::*;
pub use user::*;
