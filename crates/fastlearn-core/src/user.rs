//! User accounts and the admin-facing views derived from them.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered account.
///
/// `password_hash` is an argon2 PHC string. Serialisation skips it so a
/// `User` embedded in a response body can never leak the hash.
#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub id:            i64,
  pub username:      String,
  pub email:         String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub is_admin:      bool,
  pub is_active:     bool,
  pub created_at:    DateTime<Utc>,
  pub last_login:    Option<DateTime<Utc>>,
}

/// Input for creating an account. The caller hashes the password.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub is_admin:      bool,
}

/// One row of the admin user listing: the account plus how many courses
/// the user has enrolled in and finished.
#[derive(Debug, Clone, Serialize)]
pub struct UserOverview {
  pub id:                i64,
  pub username:          String,
  pub email:             String,
  pub is_admin:          bool,
  pub is_active:         bool,
  pub created_at:        DateTime<Utc>,
  pub last_login:        Option<DateTime<Utc>>,
  pub total_courses:     i64,
  pub completed_courses: i64,
}
