use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub service: String,
    pub version: String,
    /// Which task store the server was started with.
    pub store: String,
    pub time: chrono::DateTime<Utc>,
}

/// Public liveness check. Reports the running build and store without querying it.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthReport {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.tasks.backend().to_string(),
        time: Utc::now(),
    })
}
