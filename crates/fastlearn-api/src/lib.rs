//! HTTP layer for FastLearn.
//!
//! Exposes an axum [`Router`] serving the JSON API backed by any
//! [`LearnStore`]. Routes are grouped under `/api/auth` (accounts and
//! tokens), `/api/courses` (the public catalog plus member actions),
//! `/api/library` (the caller's enrolled courses), and `/api/admin`
//! (user management, catalog management, logs, and export).
//!
//! Every response body is the [`response::ApiResponse`] envelope;
//! authentication is a JWT bearer token minted at register/login.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  routing::{delete, get, post, put},
};
use chrono::Utc;
use fastlearn_core::store::LearnStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use handlers::{admin, auth as auth_routes, courses, library};
use response::ApiResponse;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  pub jwt_secret:     String,
  /// Lifetime of issued bearer tokens, in days.
  #[serde(default = "default_token_ttl_days")]
  pub token_ttl_days: i64,
}

fn default_token_ttl_days() -> i64 {
  7
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: LearnStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the whole API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/api/health",                         get(health))
    .route("/api/auth/register",                  post(auth_routes::register::<S>))
    .route("/api/auth/login",                     post(auth_routes::login::<S>))
    .route("/api/auth/me",                        get(auth_routes::me))
    .route("/api/auth/logout",                    post(auth_routes::logout::<S>))
    .route("/api/auth/change-password",           put(auth_routes::change_password::<S>))
    .route("/api/courses",                        get(courses::list::<S>))
    .route("/api/courses/library/add",            post(courses::add_to_library::<S>))
    .route("/api/courses/library/{lang_key}",     delete(courses::remove_from_library::<S>))
    .route("/api/courses/progress",               put(courses::update_progress::<S>))
    .route("/api/courses/notes",                  post(courses::save_note::<S>))
    .route("/api/courses/notes/{lang_key}",       get(courses::get_note::<S>))
    .route("/api/courses/{lang_key}",             get(courses::detail::<S>))
    .route("/api/library",                        get(library::library::<S>))
    .route("/api/library/stats",                  get(library::stats::<S>))
    .route("/api/library/completed",              get(library::completed::<S>))
    .route("/api/library/in-progress",            get(library::in_progress::<S>))
    .route("/api/admin/stats",                    get(admin::dashboard::<S>))
    .route("/api/admin/users",                    get(admin::list_users::<S>))
    .route("/api/admin/users/{id}",               get(admin::user_details::<S>).delete(admin::delete_user::<S>))
    .route("/api/admin/users/{id}/toggle-status", put(admin::toggle_user_status::<S>))
    .route("/api/admin/courses",                  post(admin::create_course::<S>))
    .route("/api/admin/courses/stats",            get(admin::course_stats::<S>))
    .route("/api/admin/courses/{lang_key}",       put(admin::update_course::<S>).delete(admin::delete_course::<S>))
    .route("/api/admin/logs",                     get(admin::activity_logs::<S>))
    .route("/api/admin/export",                   get(admin::export::<S>))
    .fallback(not_found)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

// ─── Root handlers ────────────────────────────────────────────────────────────

/// Liveness probe. Public.
async fn health() -> Json<ApiResponse> {
  ApiResponse::message_data(
    "server is running",
    serde_json::json!({ "timestamp": Utc::now() }),
  )
}

/// Fallback so unmatched routes share the JSON error envelope.
async fn not_found() -> ApiError {
  ApiError::NotFound("route not found".to_string())
}

// ─── Integration tests ────────────────────────────────────────────────────────
