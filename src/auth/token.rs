use crate::error::AppError;
use crate::models::User;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: Uuid,
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Signs and verifies HS256 bearer tokens with the server-held secret.
///
/// Built once at startup from the configured secret and shared through `AppState`,
/// so nothing reads the secret from the environment per request.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; no grace period after `exp`.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issues a token for `user` that expires after the configured TTL.
    ///
    /// # Returns
    /// The encoded JWT, or `AppError::InternalServerError` if encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies the signature and expiry of `token` and decodes its claims.
    ///
    /// Returns `AppError::Unauthorized` if the token is malformed, was signed with a
    /// different secret, or has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;
    use pretty_assertions::assert_eq;

    fn user() -> User {
        User::new("a@x.com".to_string(), "hash".to_string())
    }

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, Duration::hours(1))
    }

    /// Why the decoder refused `token`; `verify` only reports "Invalid token".
    fn rejection(tokens: &TokenService, token: &str) -> ErrorKind {
        match decode::<Claims>(token, &tokens.decoding, &tokens.validation) {
            Err(e) => e.into_kind(),
            Ok(data) => panic!("token was accepted: {:?}", data.claims),
        }
    }

    #[test]
    fn test_token_generation_and_verification() {
        let tokens = service("test_secret_for_gen_verify");
        let user = user();

        let token = tokens.issue(&user).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_expiration() {
        let tokens = service("test_secret_for_expiration");
        let issued = Utc::now() - Duration::hours(2);
        let expired = tokens
            .sign(&Claims {
                sub: Uuid::new_v4(),
                email: "a@x.com".to_string(),
                iat: issued.timestamp(),
                exp: (issued + Duration::hours(1)).timestamp(),
            })
            .unwrap();

        match tokens.verify(&expired) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
            other => panic!("expected expired token to be rejected, got {:?}", other),
        }
        assert!(matches!(rejection(&tokens, &expired), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = service("one_secret").issue(&user()).unwrap();
        let foreign = service("a_completely_different_secret");

        match foreign.verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
            other => panic!("expected signature mismatch, got {:?}", other),
        }
        assert!(matches!(rejection(&foreign, &token), ErrorKind::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let tokens = service("tamper_secret");
        let token = tokens.issue(&user()).unwrap();
        let forged = tokens
            .sign(&Claims {
                sub: Uuid::new_v4(),
                email: "evil@x.com".to_string(),
                iat: 0,
                exp: Utc::now().timestamp() + 3600,
            })
            .unwrap();

        // Original header and signature around a different payload.
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let spliced = parts.join(".");

        assert!(matches!(
            tokens.verify(&spliced),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            service("secret").verify("not.a.jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
