//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod task_repository;
mod user_repository;

pub use task_repository::{TaskRepository, TaskStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests
#[cfg(any(test, feature = "test-utils"))]
pub use task_repository::MockTaskRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
