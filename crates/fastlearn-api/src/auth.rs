//! Bearer-token authentication: argon2 password hashing, JWT issue and
//! verification, and the extractors handlers take their caller from.

use std::net::SocketAddr;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::{ConnectInfo, FromRequestParts},
  http::request::Parts,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use fastlearn_core::{store::LearnStore, user::User};

use crate::{AppState, error::ApiError};

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| ApiError::Store(format!("argon2 error: {e}").into()))?;
  Ok(hash.to_string())
}

/// Check a password against a stored PHC string. Unparseable hashes
/// count as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// The user id.
  pub sub: i64,
  pub iat: i64,
  pub exp: i64,
}

/// Sign a session token for `user_id`, valid for `ttl_days`.
pub fn issue_token(
  user_id:  i64,
  secret:   &str,
  ttl_days: i64,
) -> Result<String, ApiError> {
  let now = Utc::now();
  let claims = Claims {
    sub: user_id,
    iat: now.timestamp(),
    exp: (now + Duration::days(ttl_days)).timestamp(),
  };
  jsonwebtoken::encode(
    &Header::default(),
    &claims,
    &EncodingKey::from_secret(secret.as_bytes()),
  )
  .map_err(|e| ApiError::Store(format!("token encode error: {e}").into()))
}

/// Decode and validate a session token, including its expiry.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
  jsonwebtoken::decode::<Claims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &Validation::default(),
  )
  .map(|data| data.claims)
  .map_err(|_| ApiError::Unauthorized("invalid or expired token".to_string()))
}

// ─── Extractors ──────────────────────────────────────────────────────────────

fn bearer_token(parts: &Parts) -> Option<&str> {
  parts
    .headers
    .get(axum::http::header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
}

/// Resolve the caller behind a bearer token to a live account.
async fn resolve_user<S>(
  parts: &Parts,
  state: &AppState<S>,
) -> Result<User, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let token = bearer_token(parts)
    .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;
  let claims = verify_token(token, &state.config.jwt_secret)?;

  let user = state
    .store
    .user_by_id(claims.sub)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::Unauthorized("account no longer exists".to_string())
    })?;

  if !user.is_active {
    return Err(ApiError::Unauthorized("account is deactivated".to_string()));
  }
  Ok(user)
}

/// The authenticated caller. Rejects with 401 unless the request carries
/// a valid token for an active account.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    resolve_user(parts, state).await.map(CurrentUser)
  }
}

/// The authenticated caller, additionally required to be an admin.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<AppState<S>> for AdminUser
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = resolve_user(parts, state).await?;
    if !user.is_admin {
      return Err(ApiError::Forbidden("admin access required".to_string()));
    }
    Ok(AdminUser(user))
  }
}

/// Like [`CurrentUser`] but never rejects; anonymous or stale callers
/// come through as `None`.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<AppState<S>> for OptionalUser
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = std::convert::Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(OptionalUser(resolve_user(parts, state).await.ok()))
  }
}

/// Best-effort client address for the audit trail: the first
/// `X-Forwarded-For` hop when present, else the socket peer.
pub struct ClientIp(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
  type Rejection = std::convert::Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let forwarded = parts
      .headers
      .get("x-forwarded-for")
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.split(',').next())
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty());

    let ip = forwarded.or_else(|| {
      parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
    });
    Ok(ClientIp(ip))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_and_verify_round_trip() {
    let hash = hash_password("hunter22").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter22", &hash));
    assert!(!verify_password("hunter23", &hash));
  }

  #[test]
  fn garbage_hash_never_verifies() {
    assert!(!verify_password("anything", "not-a-phc-string"));
  }

  #[test]
  fn token_round_trip() {
    let token = issue_token(42, "secret", 7).unwrap();
    let claims = verify_token(&token, "secret").unwrap();
    assert_eq!(claims.sub, 42);
    assert!(claims.exp > claims.iat);
  }

  #[test]
  fn expired_token_is_rejected() {
    // Negative TTL puts the expiry a full day in the past, well beyond
    // the validation leeway.
    let token = issue_token(42, "secret", -1).unwrap();
    assert!(matches!(
      verify_token(&token, "secret"),
      Err(ApiError::Unauthorized(_))
    ));
  }

  #[test]
  fn wrong_secret_is_rejected() {
    let token = issue_token(42, "secret", 7).unwrap();
    assert!(verify_token(&token, "other-secret").is_err());
  }

  #[test]
  fn garbage_token_is_rejected() {
    assert!(verify_token("not.a.token", "secret").is_err());
  }
}
