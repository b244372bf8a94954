pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Turns body deserialization failures into the standard `{"message": ...}` 400.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid request body: {}", err)).into()
}

/// A path id that is not a UUID cannot name a stored task.
fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("unparsable path segment: {}", err);
    AppError::NotFound("Task not found".into()).into()
}

/// Registers every route. `/register` and `/login` are public; `/profile` and the
/// whole `/tasks` scope sit behind `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(health::health)
        .service(auth::register)
        .service(auth::login)
        .service(
            web::resource("/profile")
                .wrap(AuthMiddleware)
                .route(web::get().to(auth::profile)),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}
