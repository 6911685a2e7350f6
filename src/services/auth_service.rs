use std::collections::HashMap;
use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::errors::AppError;
use crate::models::{LoginResponse, SessionClaims};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid session token: {0}")]
    InvalidToken(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Hashing(msg) => AppError::Internal(msg),
            _ => AppError::Unauthorized,
        }
    }
}

/// Checks demo credentials and issues / verifies HS256 session tokens.
#[derive(Clone)]
pub struct AuthService {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    /// username -> argon2 PHC string
    password_hashes: HashMap<String, String>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let password_hashes = config
            .users
            .iter()
            .map(|(name, password)| Ok((name.clone(), hash_password(password)?)))
            .collect::<Result<HashMap<_, _>, AuthError>>()?;

        info!("Auth configured for {} users", password_hashes.len());

        Ok(Self {
            inner: Arc::new(AuthInner {
                password_hashes,
                encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
                decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
                token_ttl: Duration::hours(config.token_ttl_hours),
            }),
        })
    }

    /// Verifies the credentials and returns a fresh session token.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let username = username.trim();
        let stored = self
            .inner
            .password_hashes
            .get(username)
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hashing(e.to_string()))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            warn!("Failed login attempt for {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        let (token, expires_at) = self.issue_token(username, Utc::now())?;
        Ok(LoginResponse {
            token,
            username: username.to_string(),
            expires_at,
        })
    }

    fn issue_token(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let expires_at = issued_at + self.inner.token_ttl;
        let claims = SessionClaims {
            sub: username.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.inner.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok((token, expires_at))
    }

    /// Decodes a session token, rejecting bad signatures and expired tokens.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        decode::<SessionClaims>(token, &self.inner.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Username of the caller, taken from a valid `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let claims = state.auth.verify(token.trim()).map_err(|e| {
            debug!("Rejected session token: {}", e);
            AppError::Unauthorized
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(&AuthConfig {
            users: vec![
                ("admin".to_string(), "1234".to_string()),
                ("guest".to_string(), "guest123".to_string()),
            ],
            token_secret: "test-secret".to_string(),
            token_ttl_hours: 8,
        })
        .unwrap()
    }

    #[test]
    fn test_passwords_are_stored_hashed() {
        let auth = service();
        let stored = &auth.inner.password_hashes["admin"];
        assert_ne!(stored, "1234");
        assert!(stored.starts_with("$argon2"));
    }

    #[test]
    fn test_login_and_verify() {
        let auth = service();
        let response = auth.login("admin", "1234").unwrap();
        assert_eq!(response.username, "admin");
        assert!(response.expires_at > Utc::now());

        let claims = auth.verify(&response.token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[test]
    fn test_login_rejects_bad_credentials() {
        let auth = service();
        assert!(matches!(auth.login("admin", "wrong"), Err(AuthError::InvalidCredentials)));
        assert!(matches!(auth.login("nobody", "1234"), Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = service();
        let (token, _) = auth
            .issue_token("guest", Utc::now() - Duration::hours(9))
            .unwrap();
        assert!(matches!(auth.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = AuthService::new(&AuthConfig {
            users: Vec::new(),
            token_secret: "another-secret".to_string(),
            token_ttl_hours: 8,
        })
        .unwrap();
        let (token, _) = other.issue_token("admin", Utc::now()).unwrap();
        assert!(service().verify(&token).is_err());
        assert!(service().verify("not-a-token").is_err());
    }
}
