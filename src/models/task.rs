//!
//! # Task Model
//!
//! A task is a single to-do item with exactly one owner. The owner is set at
//! creation from the authenticated identity and never changes afterwards;
//! every read and write in the store is additionally scoped to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub description: String,
    pub completed: bool,
    /// Owning user id. Immutable after creation.
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload. Unknown keys in the request body, including any
/// client-supplied `owner`, are dropped at deserialization.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, message = "Please enter a valid description"))]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Update payload. The route layer has already checked the raw key set
/// against the `{description, completed}` allow-list.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, message = "Please enter a valid description"))]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Query parameters accepted by the task listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub completed: Option<bool>,
    /// `field:direction`; `desc` reverses, anything else is ascending.
    pub sort_by: Option<String>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
}

impl Task {
    /// Builds a new task for the given owner: trims and validates the
    /// description, defaults `completed` to false when absent.
    pub fn new(mut input: TaskInput, owner: Uuid) -> Result<Self, AppError> {
        input.description = input.description.trim().to_string();
        input.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            description: input.description,
            completed: input.completed,
            owner,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a validated `{description, completed}` subset.
    pub fn apply_update(&mut self, mut update: TaskUpdate) -> Result<(), AppError> {
        update.description = update.description.map(|d| d.trim().to_string());
        update.validate()?;

        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let owner = Uuid::new_v4();
        let task = Task::new(
            TaskInput {
                description: "  buy milk  ".into(),
                completed: false,
            },
            owner,
        )
        .unwrap();

        assert_eq!(task.description, "buy milk");
        assert!(!task.completed);
        assert_eq!(task.owner, owner);
    }

    #[test]
    fn test_empty_description_rejected() {
        for description in ["", "   "] {
            let result = Task::new(
                TaskInput {
                    description: description.into(),
                    completed: false,
                },
                Uuid::new_v4(),
            );
            assert!(result.is_err(), "{:?} should be rejected", description);
        }
    }

    #[test]
    fn test_apply_update() {
        let mut task = Task::new(
            TaskInput {
                description: "original".into(),
                completed: false,
            },
            Uuid::new_v4(),
        )
        .unwrap();

        task.apply_update(TaskUpdate {
            completed: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert!(task.completed);
        assert_eq!(task.description, "original");

        let result = task.apply_update(TaskUpdate {
            description: Some("  ".into()),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(task.description, "original");
    }

    #[test]
    fn test_serialization_shape() {
        let task = Task::new(
            TaskInput {
                description: "x".into(),
                completed: true,
            },
            Uuid::new_v4(),
        )
        .unwrap();

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["description"], "x");
        assert_eq!(value["completed"], true);
        assert!(value["owner"].is_string());
        assert!(value["createdAt"].is_string());
        assert!(value["updatedAt"].is_string());
    }
}
