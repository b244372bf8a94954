//! Persistence seam for tasks and users.
//!
//! Handlers only see the [`TaskStore`] and [`UserStore`] traits. [`PgStore`] is the
//! production implementation; [`MemoryStore`] keeps everything in process and backs the
//! test suite and `STORE_BACKEND=memory`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Task, TaskUpdate, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Unique constraint on `users.email`, named in `migrations/`.
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated. Carries the constraint name.
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                let constraint = db_error.constraint().unwrap_or("unique").to_string();
                return StoreError::Duplicate(constraint);
            }
        }
        StoreError::Backend(error.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Short backend name reported by `/health`.
    fn backend(&self) -> &'static str;
    /// All tasks, oldest first.
    async fn list(&self) -> StoreResult<Vec<Task>>;
    async fn insert(&self, task: Task) -> StoreResult<Task>;
    async fn get(&self, id: Uuid) -> StoreResult<Option<Task>>;
    /// Returns the updated task, or `None` if `id` does not exist.
    async fn update(&self, id: Uuid, update: &TaskUpdate) -> StoreResult<Option<Task>>;
    /// Returns whether a task was actually removed.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Fails with [`StoreError::Duplicate`] if the email is already registered.
    async fn create(&self, user: User) -> StoreResult<User>;
}
