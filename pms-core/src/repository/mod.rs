//! Data access layer (Repository pattern)
//!
//! The traits are the persistence seam: services depend on them only, and
//! every implementation must return fully hydrated entities (a project with
//! its team, a task with its project and that project's team).

pub mod memory;
pub mod project;
pub mod task;
pub mod team;
pub mod user;

pub use memory::InMemoryStore;
pub use project::ProjectRepository;
pub use task::TaskRepository;
pub use team::TeamRepository;
pub use user::UserRepository;
