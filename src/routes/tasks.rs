use crate::{
    error::AppError,
    models::{NewTask, Task, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

fn not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Lists every task.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects, oldest first.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_tasks(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task.
///
/// ## Request Body:
/// - `title` (required): 1 to 200 characters.
/// - `description` (optional): up to 1000 characters, defaults to `""`.
/// - `completed` (optional): defaults to `false`.
///
/// ## Responses:
/// - `201 Created`: the stored `Task`, including its generated `id` and `createdAt`.
/// - `400 Bad Request`: malformed JSON or a field failing validation.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state.tasks.insert(Task::new(task_data.into_inner())).await?;
    log::debug!("created task {}", task.id);

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a single task.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `404 Not Found`: no task has this id.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .get(task_id.into_inner())
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Updates a task. Only the fields present in the body change, so repeating the
/// same request leaves the task as it was after the first one.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: malformed JSON or a field failing validation.
/// - `404 Not Found`: no task has this id.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .tasks
        .update(task_id.into_inner(), &task_data)
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: whether or not the task existed.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let id = task_id.into_inner();
    if !state.tasks.delete(id).await? {
        log::debug!("delete of unknown task {}", id);
    }

    Ok(HttpResponse::NoContent().finish())
}
