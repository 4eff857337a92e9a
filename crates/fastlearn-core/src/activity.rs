//! Append-only audit trail of user actions.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Action names recorded in the log.
pub mod action {
  pub const REGISTER:        &str = "register";
  pub const LOGIN:           &str = "login";
  pub const LOGOUT:          &str = "logout";
  pub const CHANGE_PASSWORD: &str = "change_password";
  pub const ADD_TO_LIBRARY:  &str = "add_to_library";
  pub const DELETE_USER:     &str = "delete_user";
}

/// One audit row. `username` is joined in for the admin views and is
/// `None` once the acting user has been deleted.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
  pub id:         i64,
  pub user_id:    Option<i64>,
  pub username:   Option<String>,
  pub action:     String,
  pub details:    Option<String>,
  pub ip_address: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input for appending to the log.
#[derive(Debug, Clone)]
pub struct NewActivity {
  pub user_id:    i64,
  pub action:     &'static str,
  pub details:    Option<String>,
  pub ip_address: Option<String>,
}
