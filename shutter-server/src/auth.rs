//! Bearer-token authentication against the session and user collections.
//!
//! Absence at any step of the chain (no header, unknown token, dangling user
//! reference) is "no session"/"no user", never an error; only
//! [`authenticate`] turns absence into the "Not authenticated" domain error.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::error::ApiError;
use crate::model::{Database, Session, User};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolves the request's session from its bearer token, if any.
pub fn session_for(db: &Database, headers: &HeaderMap) -> Option<Session> {
    let token = bearer_token(headers)?;
    db.sessions.get_by_id(token)
}

/// Resolves the request's user through its session, if any.
pub fn current_user(db: &Database, headers: &HeaderMap) -> Option<User> {
    let session = session_for(db, headers)?;
    db.users.get_by_id(&session.user)
}

/// Like [`current_user`], but absence is the "Not authenticated" error.
pub fn authenticate(db: &Database, headers: &HeaderMap) -> Result<User, ApiError> {
    current_user(db, headers).ok_or(ApiError::NotAuthenticated)
}

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| {
            log::error!("Password hashing failed: {}", error);
            ApiError::Internal("Password hashing failed".to_string())
        })
}

/// Verifies a password against a stored hash. An unparseable hash verifies
/// as false.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(error) => {
            log::warn!("Stored password hash is unparseable: {}", error);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_accepts_case_insensitive_scheme() {
        assert_eq!(bearer_token(&headers_with("Bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers_with("bearer abc123")), Some("abc123"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&headers_with("Basic abc123")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("123").unwrap();
        assert!(verify_password("123", &hash));
        assert!(!verify_password("124", &hash));
        assert!(!verify_password("123", "not-a-hash"));
    }
}
