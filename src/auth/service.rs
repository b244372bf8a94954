use std::sync::Arc;

use crate::auth::extractors::AuthenticatedUser;
use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;
use crate::auth::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest};
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;

/// Registration, login and profile lookups on top of a [`UserStore`].
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    passwords: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService, passwords: PasswordHasher) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Creates an account and returns a token for it.
    ///
    /// Fails with `AppError::Conflict` if the email is already registered. The store
    /// enforces the same rule, so two concurrent registrations cannot both succeed.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".into()));
        }

        let password_hash = self.passwords.hash(&request.password)?;
        let user = self
            .users
            .create(User::new(request.email, password_hash))
            .await?;
        log::info!("registered user {}", user.id);

        Ok(AuthResponse {
            message: "User registered".into(),
            token: self.tokens.issue(&user)?,
        })
    }

    /// Checks the credentials and returns a fresh token.
    ///
    /// An unknown email and a wrong password produce the same
    /// `AppError::Unauthorized("Invalid credentials")`.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::Unauthorized("Invalid credentials".into());

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(invalid)?;

        if !self.passwords.verify(&request.password, &user.password_hash) {
            return Err(invalid());
        }

        Ok(AuthResponse {
            message: "Login successful".into(),
            token: self.tokens.issue(&user)?,
        })
    }

    pub fn profile(&self, identity: &AuthenticatedUser) -> ProfileResponse {
        ProfileResponse {
            id: identity.id,
            email: identity.email.clone(),
        }
    }
}
