//!
//! # Persistence Port
//!
//! The document database is an external collaborator. This module defines the
//! traits the rest of the application talks to (`UserStore`, `TaskStore`, and
//! the combined `Store`), the error type those traits surface, and the query
//! options the task listing operation accepts.
//!
//! The crate ships one implementation, [`memory::MemoryStore`], an in-process
//! document store that provides the contract the handlers rely on: per-document
//! atomic read-modify-write, a unique email index on users, and filtered,
//! sorted, paginated task queries. A real document database plugs in behind the
//! same traits.

pub mod memory;

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::models::{Task, User};

pub use memory::MemoryStore;

/// Errors surfaced by a persistence backend.
#[derive(Debug)]
pub enum StoreError {
    /// Another user already holds this email address.
    DuplicateEmail,
    /// The document targeted by an update or delete does not exist.
    NotFound,
    /// Any other backend failure.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::DuplicateEmail => write!(f, "email already in use"),
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
        }
    }
}

/// Fields a task listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortKey {
    Description,
    Completed,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub key: TaskSortKey,
    pub direction: SortDirection,
}

/// Options for a task listing. The owner scope is not part of the options:
/// it is a mandatory argument of [`TaskStore::list_tasks`] so no call site can
/// forget it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListOptions {
    pub completed: Option<bool>,
    pub sort: Option<TaskSort>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. Fails with [`StoreError::DuplicateEmail`] if the
    /// email is already taken.
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;

    /// Replaces an existing user document, keyed by id. The unique email
    /// index applies here too.
    async fn save_user(&self, user: User) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Looks up the user with the given id whose token list still contains
    /// the exact token string. Revocation is list membership, so this is the
    /// one lookup the authorization layer uses.
    async fn find_user_by_token(&self, id: Uuid, token: &str) -> Result<Option<User>, StoreError>;

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: Task) -> Result<Task, StoreError>;

    /// Replaces an existing task document, keyed by id.
    async fn save_task(&self, task: Task) -> Result<Task, StoreError>;

    /// Fetches one task, scoped to its owner. A task owned by someone else is
    /// indistinguishable from a missing one.
    async fn find_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn list_tasks(
        &self,
        owner: Uuid,
        options: TaskListOptions,
    ) -> Result<Vec<Task>, StoreError>;

    /// Removes one owner-scoped task, returning the removed document.
    async fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Removes every task owned by the given user, returning how many were
    /// deleted. Used by the user-deletion cascade.
    async fn delete_tasks_by_owner(&self, owner: Uuid) -> Result<u64, StoreError>;
}

/// The full persistence surface the application state carries.
pub trait Store: UserStore + TaskStore {}

impl<T: UserStore + TaskStore> Store for T {}
