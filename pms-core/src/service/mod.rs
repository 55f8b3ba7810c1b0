//! Business logic layer
//!
//! Every mutating operation evaluates the access policy before it touches a
//! repository; listing operations hand an [`AccessFilter`](crate::policy::AccessFilter)
//! to the repository instead of filtering here.

pub mod project;
pub mod task;
pub mod team;

pub use project::ProjectService;
pub use task::TaskService;
pub use team::TeamService;
