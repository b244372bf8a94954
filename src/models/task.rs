use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Payload for creating a task.
/// Only `title` is required; the other fields fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTask {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description. Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Whether the task starts out completed. Defaults to `false`.
    pub completed: Option<bool>,
}

/// Payload for updating a task. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

/// Represents a task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a fresh task from a validated `NewTask`, assigning a new id and
    /// stamping `created_at` with the current time.
    pub fn new(input: NewTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description.unwrap_or_default(),
            completed: input.completed.unwrap_or(false),
            created_at: Utc::now(),
        }
    }

    /// Applies the supplied fields of `update` in place.
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buy_milk() -> NewTask {
        NewTask {
            title: "Buy milk".to_string(),
            description: None,
            completed: Some(false),
        }
    }

    #[test]
    fn test_task_creation_applies_defaults() {
        let task = Task::new(NewTask {
            title: "Test Task".to_string(),
            description: None,
            completed: None,
        });
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.description, "");
        assert!(!task.completed);
        assert!(task.created_at <= Utc::now());
    }

    #[test]
    fn test_task_validation() {
        assert!(buy_milk().validate().is_ok());

        let empty_title = NewTask {
            title: "".to_string(),
            ..buy_milk()
        };
        assert!(empty_title.validate().is_err());

        let long_title = NewTask {
            title: "a".repeat(201),
            ..buy_milk()
        };
        assert!(long_title.validate().is_err());

        let long_description = NewTask {
            description: Some("b".repeat(1001)),
            ..buy_milk()
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_update_validation_only_checks_supplied_fields() {
        assert!(TaskUpdate::default().validate().is_ok());
        assert!(TaskUpdate {
            completed: Some(true),
            ..Default::default()
        }
        .validate()
        .is_ok());
        assert!(TaskUpdate {
            title: Some(String::new()),
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_apply_is_partial_and_idempotent() {
        let mut task = Task::new(buy_milk());
        let original = task.clone();
        let update = TaskUpdate {
            completed: Some(true),
            ..Default::default()
        };

        task.apply(&update);
        let once = task.clone();
        task.apply(&update);

        assert_eq!(task, once);
        assert!(task.completed);
        assert_eq!(task.title, original.title);
        assert_eq!(task.created_at, original.created_at);
    }

    #[test]
    fn test_task_serializes_created_at_in_camel_case() {
        let json = serde_json::to_value(Task::new(buy_milk())).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["completed"], false);
    }
}
