//! Admin-only endpoints under `/api/admin`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use fastlearn_core::{
  activity::{ActivityEntry, NewActivity, action},
  course::{CourseStats, CourseUpdate, NewCourse, VideoKind},
  progress::LibraryEntry,
  stats::{DashboardStats, ExportData},
  store::LearnStore,
  user::{User, UserOverview},
};

use crate::{
  AppState,
  auth::{AdminUser, ClientIp},
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
  response::ApiResponse,
};

// ─── Dashboard & users ───────────────────────────────────────────────────────

pub async fn dashboard<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let stats = state.store.dashboard_stats().await.map_err(ApiError::store)?;
  Ok(ApiResponse::data(stats))
}

pub async fn list_users<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<UserOverview>>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let users = state.store.list_users().await.map_err(ApiError::store)?;
  Ok(ApiResponse::data(users))
}

/// One user's profile for the admin panel: the account, their whole
/// library (deactivated courses included), and their recent actions.
#[derive(Debug, Serialize)]
pub struct UserDetails {
  pub user:            User,
  pub courses:         Vec<LibraryEntry>,
  pub recent_activity: Vec<ActivityEntry>,
}

pub async fn user_details<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<UserDetails>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = state
    .store
    .user_by_id(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

  let courses =
    state.store.library(id, false).await.map_err(ApiError::store)?;
  let recent_activity = state
    .store
    .user_activity(id, 20)
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::data(UserDetails { user, courses, recent_activity }))
}

pub async fn delete_user<S>(
  State(state): State<AppState<S>>,
  AdminUser(admin): AdminUser,
  ClientIp(ip): ClientIp,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if id == admin.id {
    return Err(ApiError::Forbidden(
      "you cannot delete your own account".to_string(),
    ));
  }
  state
    .store
    .user_by_id(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

  state.store.delete_user(id).await.map_err(ApiError::store)?;

  state
    .store
    .log_activity(NewActivity {
      user_id:    admin.id,
      action:     action::DELETE_USER,
      details:    Some(
        serde_json::json!({ "deleted_user_id": id }).to_string(),
      ),
      ip_address: ip,
    })
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::message("user deleted"))
}

pub async fn toggle_user_status<S>(
  State(state): State<AppState<S>>,
  AdminUser(admin): AdminUser,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if id == admin.id {
    return Err(ApiError::Forbidden(
      "you cannot deactivate your own account".to_string(),
    ));
  }
  let user = state
    .store
    .user_by_id(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

  state
    .store
    .set_user_active(id, !user.is_active)
    .await
    .map_err(ApiError::store)?;

  let message = if user.is_active { "user deactivated" } else { "user activated" };
  Ok(ApiResponse::message(message))
}

// ─── Courses ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseBody {
  pub lang_key:    String,
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub video_id:    String,
  pub video_kind:  Option<String>,
  #[serde(default)]
  pub icon:        String,
  #[serde(default)]
  pub color:       String,
  #[serde(default)]
  pub roadmap:     Vec<String>,
}

pub async fn create_course<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  ApiJson(body): ApiJson<CreateCourseBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let lang_key = body.lang_key.trim().to_string();
  if lang_key.is_empty() || lang_key.len() > 50 {
    return Err(ApiError::Validation(
      "course key must be 1 to 50 characters".to_string(),
    ));
  }
  let name = body.name.trim().to_string();
  if name.is_empty() {
    return Err(ApiError::Validation("course name is required".to_string()));
  }
  let video_kind = parse_video_kind(body.video_kind.as_deref())?;

  if state
    .store
    .course_by_key(&lang_key, false)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::Conflict(format!(
      "course already exists: {lang_key}"
    )));
  }

  let course = state
    .store
    .create_course(NewCourse {
      lang_key,
      name,
      description: body.description,
      video_id: body.video_id,
      video_kind,
      icon: body.icon,
      color: body.color,
      roadmap: body.roadmap,
    })
    .await
    .map_err(ApiError::store)?;

  Ok((StatusCode::CREATED, ApiResponse::data(course)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseBody {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub video_id:    Option<String>,
  pub video_kind:  Option<String>,
  pub icon:        Option<String>,
  pub color:       Option<String>,
  pub roadmap:     Option<Vec<String>>,
}

pub async fn update_course<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  ApiPath(lang_key): ApiPath<String>,
  ApiJson(body): ApiJson<UpdateCourseBody>,
) -> Result<Json<ApiResponse>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let course = state
    .store
    .course_by_key(&lang_key, false)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("course not found: {lang_key}")))?;

  let video_kind = match body.video_kind.as_deref() {
    Some(raw) => Some(parse_video_kind(Some(raw))?),
    None => None,
  };

  let update = CourseUpdate {
    name:        body.name,
    description: body.description,
    video_id:    body.video_id,
    video_kind,
    icon:        body.icon,
    color:       body.color,
    roadmap:     body.roadmap,
  };
  if update.is_empty() {
    return Err(ApiError::Validation("no fields to update".to_string()));
  }

  state
    .store
    .update_course(course.id, update)
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::message("course updated"))
}

pub async fn delete_course<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  ApiPath(lang_key): ApiPath<String>,
) -> Result<Json<ApiResponse>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let course = state
    .store
    .course_by_key(&lang_key, false)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("course not found: {lang_key}")))?;

  state
    .store
    .delete_course(course.id)
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::message("course deleted"))
}

pub async fn course_stats<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<CourseStats>>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let stats = state.store.course_stats().await.map_err(ApiError::store)?;
  Ok(ApiResponse::data(stats))
}

fn parse_video_kind(raw: Option<&str>) -> Result<VideoKind, ApiError> {
  match raw {
    Some(raw) => {
      VideoKind::parse(raw).map_err(|e| ApiError::Validation(e.to_string()))
    }
    None => Ok(VideoKind::default()),
  }
}

// ─── Logs & export ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LogQuery {
  pub limit: Option<i64>,
}

pub async fn activity_logs<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  ApiQuery(query): ApiQuery<LogQuery>,
) -> Result<Json<ApiResponse<Vec<ActivityEntry>>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let limit = query.limit.unwrap_or(50).clamp(1, 1000);
  let logs = state
    .store
    .recent_activity(limit)
    .await
    .map_err(ApiError::store)?;
  Ok(ApiResponse::data(logs))
}

pub async fn export<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
) -> Result<Json<ApiResponse<ExportData>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let users = state.store.list_users().await.map_err(ApiError::store)?;
  let courses = state.store.list_courses().await.map_err(ApiError::store)?;
  let enrollments = state
    .store
    .list_enrollments()
    .await
    .map_err(ApiError::store)?;
  let progress = state.store.list_progress().await.map_err(ApiError::store)?;

  Ok(ApiResponse::data(ExportData {
    users,
    courses,
    enrollments,
    progress,
    export_date: Utc::now(),
  }))
}
