//! In-process document store backed by `tokio::sync::RwLock`ed vectors.
//!
//! Mutations take the write lock for the whole read-modify-write, which gives
//! the per-document atomicity the handlers assume. Insertion order is
//! preserved, so an unsorted listing comes back in creation order.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SortDirection, StoreError, TaskListOptions, TaskSortKey, TaskStore, UserStore};
use crate::models::{Task, User};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn save_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id != user.id && u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(StoreError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_token(&self, id: Uuid, token: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.id == id && u.tokens.iter().any(|t| t == token))
            .cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: Task) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        tasks.push(task.clone());
        Ok(task)
    }

    async fn save_task(&self, task: Task) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or(StoreError::NotFound)?;
        *slot = task.clone();
        Ok(task)
    }

    async fn find_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .find(|t| t.id == id && t.owner == owner)
            .cloned())
    }

    async fn list_tasks(
        &self,
        owner: Uuid,
        options: TaskListOptions,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut matched: Vec<Task> = tasks
            .iter()
            .filter(|t| t.owner == owner)
            .filter(|t| options.completed.map_or(true, |c| t.completed == c))
            .cloned()
            .collect();

        if let Some(sort) = options.sort {
            matched.sort_by(|a, b| {
                let ord = match sort.key {
                    TaskSortKey::Description => a.description.cmp(&b.description),
                    TaskSortKey::Completed => a.completed.cmp(&b.completed),
                    TaskSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                    TaskSortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                };
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let skipped = matched.into_iter().skip(options.skip.unwrap_or(0));
        Ok(match options.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        })
    }

    async fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        let position = tasks.iter().position(|t| t.id == id && t.owner == owner);
        Ok(position.map(|i| tasks.remove(i)))
    }

    async fn delete_tasks_by_owner(&self, owner: Uuid) -> Result<u64, StoreError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.owner != owner);
        Ok((before - tasks.len()) as u64)
    }
}
