use std::sync::Arc;

use chrono::Duration;

use crate::auth::{AuthService, PasswordHasher, TokenService};
use crate::config::{Config, StoreBackend};
use crate::store::{MemoryStore, PgStore, StoreError, TaskStore, UserStore};

/// Everything a handler needs, built once at startup and shared via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskStore>,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        users: Arc<dyn UserStore>,
        tokens: TokenService,
        passwords: PasswordHasher,
    ) -> Self {
        Self {
            tasks,
            auth: AuthService::new(users, tokens, passwords),
        }
    }

    /// Connects the configured store and wires up the auth service.
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let tokens = TokenService::new(
            &config.jwt_secret,
            Duration::minutes(config.token_ttl_minutes),
        );
        let passwords = PasswordHasher::new(config.bcrypt_cost);

        let state = match config.store_backend {
            StoreBackend::Postgres => {
                let store = Arc::new(
                    PgStore::connect(&config.database_url, config.database_max_connections)
                        .await?,
                );
                log::info!("Connected to PostgreSQL store");
                Self::new(store.clone(), store, tokens, passwords)
            }
            StoreBackend::Memory => {
                log::warn!("Using the in-memory store; data is lost on restart");
                let store = Arc::new(MemoryStore::new());
                Self::new(store.clone(), store, tokens, passwords)
            }
        };

        Ok(state)
    }
}
