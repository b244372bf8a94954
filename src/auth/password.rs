use crate::error::AppError;

/// Salts and checks account passwords with bcrypt at the configured work factor.
///
/// The cost comes from `BCRYPT_COST` and is range-checked by `Config::from_env`, so the
/// only failures left at request time are bcrypt's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Produces the `$2b$` string stored in `users.password_hash`.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Compares a login attempt against a stored hash.
    ///
    /// A stored value bcrypt cannot parse counts as a mismatch and is logged, so a
    /// corrupt row answers `Invalid credentials` like any other wrong password.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match bcrypt::verify(password, stored_hash) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("unreadable password hash in store: {}", e);
                false
            }
        }
    }
}
