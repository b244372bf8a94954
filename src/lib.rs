#![doc = "The `taskmanager` library crate."]
#![doc = ""]
#![doc = "A small task-management REST API: task CRUD under `/tasks`, user registration and"]
#![doc = "login issuing JWT bearer tokens, and an actix-web middleware guarding the protected"]
#![doc = "routes. The binary (`main.rs`) loads `Config`, builds `AppState` and serves"]
#![doc = "`routes::config`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
