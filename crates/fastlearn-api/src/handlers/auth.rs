//! Registration, login and account endpoints under `/api/auth`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use fastlearn_core::{
  activity::{NewActivity, action},
  store::LearnStore,
  user::{NewUser, User},
};

use crate::{
  AppState,
  auth::{ClientIp, CurrentUser, hash_password, issue_token, verify_password},
  error::ApiError,
  extract::ApiJson,
  response::ApiResponse,
};

/// What register and login hand back: the account plus a session token.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
  pub user:  User,
  pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username: String,
  pub email:    String,
  pub password: String,
}

pub async fn register<S>(
  State(state): State<AppState<S>>,
  ClientIp(ip): ClientIp,
  ApiJson(body): ApiJson<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let username = body.username.trim().to_string();
  // Emails are stored and matched in lowercase.
  let email = body.email.trim().to_lowercase();

  let name_len = username.chars().count();
  if !(3..=50).contains(&name_len) {
    return Err(ApiError::Validation(
      "username must be 3 to 50 characters".to_string(),
    ));
  }
  if !looks_like_email(&email) {
    return Err(ApiError::Validation(
      "a valid email address is required".to_string(),
    ));
  }
  if body.password.chars().count() < 6 {
    return Err(ApiError::Validation(
      "password must be at least 6 characters".to_string(),
    ));
  }

  if state
    .store
    .user_by_email(&email)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::Conflict("email is already registered".to_string()));
  }
  if state
    .store
    .user_by_username(&username)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::Conflict("username is already taken".to_string()));
  }

  let password_hash = hash_password(&body.password)?;
  let user = state
    .store
    .create_user(NewUser { username, email, password_hash, is_admin: false })
    .await
    .map_err(ApiError::store)?;

  let token =
    issue_token(user.id, &state.config.jwt_secret, state.config.token_ttl_days)?;

  state
    .store
    .log_activity(NewActivity {
      user_id:    user.id,
      action:     action::REGISTER,
      details:    None,
      ip_address: ip,
    })
    .await
    .map_err(ApiError::store)?;

  Ok((
    StatusCode::CREATED,
    ApiResponse::message_data("account created", AuthPayload { user, token }),
  ))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

pub async fn login<S>(
  State(state): State<AppState<S>>,
  ClientIp(ip): ClientIp,
  ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<ApiResponse<AuthPayload>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let email = body.email.trim().to_lowercase();
  let user = state
    .store
    .user_by_email(&email)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::Unauthorized("invalid email or password".to_string())
    })?;

  // Deactivation is reported before the password is checked, so a locked
  // account cannot be probed for its password.
  if !user.is_active {
    return Err(ApiError::Forbidden("account is deactivated".to_string()));
  }

  if !verify_password(&body.password, &user.password_hash) {
    return Err(ApiError::Unauthorized(
      "invalid email or password".to_string(),
    ));
  }

  state
    .store
    .touch_last_login(user.id)
    .await
    .map_err(ApiError::store)?;

  let token =
    issue_token(user.id, &state.config.jwt_secret, state.config.token_ttl_days)?;

  state
    .store
    .log_activity(NewActivity {
      user_id:    user.id,
      action:     action::LOGIN,
      details:    None,
      ip_address: ip,
    })
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::message_data(
    "login successful",
    AuthPayload { user, token },
  ))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<User>> {
  ApiResponse::data(user)
}

pub async fn logout<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  ClientIp(ip): ClientIp,
) -> Result<Json<ApiResponse>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  // Tokens are stateless; logout only leaves an audit trail.
  state
    .store
    .log_activity(NewActivity {
      user_id:    user.id,
      action:     action::LOGOUT,
      details:    None,
      ip_address: ip,
    })
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::message("logged out"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
  pub current_password: String,
  pub new_password:     String,
}

pub async fn change_password<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  ClientIp(ip): ClientIp,
  ApiJson(body): ApiJson<ChangePasswordBody>,
) -> Result<Json<ApiResponse>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.new_password.chars().count() < 6 {
    return Err(ApiError::Validation(
      "new password must be at least 6 characters".to_string(),
    ));
  }
  if !verify_password(&body.current_password, &user.password_hash) {
    return Err(ApiError::Unauthorized(
      "current password is incorrect".to_string(),
    ));
  }

  let password_hash = hash_password(&body.new_password)?;
  state
    .store
    .update_password(user.id, &password_hash)
    .await
    .map_err(ApiError::store)?;

  state
    .store
    .log_activity(NewActivity {
      user_id:    user.id,
      action:     action::CHANGE_PASSWORD,
      details:    None,
      ip_address: ip,
    })
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::message("password changed"))
}

/// Cheap structural check: one `@`, a non-empty local part, and a domain
/// with something on both sides of a dot.
fn looks_like_email(s: &str) -> bool {
  if s.len() > 254 || s.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  match domain.rsplit_once('.') {
    Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::looks_like_email;

  #[test]
  fn email_shapes() {
    assert!(looks_like_email("alice@example.com"));
    assert!(looks_like_email("a@b.co"));

    assert!(!looks_like_email("alice"));
    assert!(!looks_like_email("alice@"));
    assert!(!looks_like_email("@example.com"));
    assert!(!looks_like_email("alice@example"));
    assert!(!looks_like_email("alice@example."));
    assert!(!looks_like_email("alice@.com"));
    assert!(!looks_like_email("al ice@example.com"));
    assert!(!looks_like_email("alice@exa@mple.com"));
  }
}
