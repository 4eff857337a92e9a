//! Catalog browsing and per-course actions under `/api/courses`.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use fastlearn_core::{
  activity::{NewActivity, action},
  course::{Course, CourseSummary, RoadmapStep},
  note::{Note, validate_note_text},
  progress::{Progress, validate_step_indices},
  store::LearnStore,
};

use crate::{
  AppState,
  auth::{ClientIp, CurrentUser, OptionalUser},
  error::ApiError,
  extract::{ApiJson, ApiPath},
  response::ApiResponse,
};

/// Look a course up by its key, 404ing when absent. `only_active` is set
/// for catalog-facing paths; actions on an already enrolled course keep
/// working after the course is deactivated.
async fn resolve_course<S>(
  state:       &AppState<S>,
  lang_key:    &str,
  only_active: bool,
) -> Result<Course, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if lang_key.is_empty() || lang_key.len() > 50 {
    return Err(ApiError::Validation("invalid course key".to_string()));
  }
  state
    .store
    .course_by_key(lang_key, only_active)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("course not found: {lang_key}")))
}

pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<ApiResponse<Vec<CourseSummary>>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let courses = state.store.list_courses().await.map_err(ApiError::store)?;
  Ok(ApiResponse::data(courses))
}

/// A course page: the course, its roadmap, and the caller's progress
/// when a valid token was presented.
#[derive(Debug, Serialize)]
pub struct CourseDetail {
  #[serde(flatten)]
  pub course:          Course,
  pub roadmap:         Vec<RoadmapStep>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_progress:   Option<Progress>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub completed_steps: Option<Vec<i64>>,
}

pub async fn detail<S>(
  State(state): State<AppState<S>>,
  OptionalUser(user): OptionalUser,
  ApiPath(lang_key): ApiPath<String>,
) -> Result<Json<ApiResponse<CourseDetail>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let course = resolve_course(&state, &lang_key, true).await?;
  let roadmap =
    state.store.roadmap(course.id).await.map_err(ApiError::store)?;

  let (user_progress, completed_steps) = match user {
    Some(user) => {
      let progress = state
        .store
        .progress(user.id, course.id)
        .await
        .map_err(ApiError::store)?;
      let steps = state
        .store
        .completed_steps(user.id, course.id)
        .await
        .map_err(ApiError::store)?;
      (progress, Some(steps))
    }
    None => (None, None),
  };

  Ok(ApiResponse::data(CourseDetail {
    course,
    roadmap,
    user_progress,
    completed_steps,
  }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToLibraryBody {
  pub lang_key: String,
}

pub async fn add_to_library<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  ClientIp(ip): ClientIp,
  ApiJson(body): ApiJson<AddToLibraryBody>,
) -> Result<Json<ApiResponse>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let course = resolve_course(&state, &body.lang_key, true).await?;

  state
    .store
    .enroll(user.id, course.id)
    .await
    .map_err(ApiError::store)?;

  state
    .store
    .log_activity(NewActivity {
      user_id:    user.id,
      action:     action::ADD_TO_LIBRARY,
      details:    Some(
        serde_json::json!({ "langKey": course.lang_key }).to_string(),
      ),
      ip_address: ip,
    })
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::message("course added to your library"))
}

pub async fn remove_from_library<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  ApiPath(lang_key): ApiPath<String>,
) -> Result<Json<ApiResponse>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let course = resolve_course(&state, &lang_key, false).await?;

  state
    .store
    .unenroll(user.id, course.id)
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::message("course removed from your library"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressBody {
  pub lang_key:        String,
  pub completed_steps: Vec<i64>,
}

pub async fn update_progress<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  ApiJson(body): ApiJson<UpdateProgressBody>,
) -> Result<Json<ApiResponse<Progress>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let course = resolve_course(&state, &body.lang_key, false).await?;
  let roadmap =
    state.store.roadmap(course.id).await.map_err(ApiError::store)?;

  let mut steps = body.completed_steps;
  steps.sort_unstable();
  steps.dedup();
  validate_step_indices(&steps, roadmap.len() as i64)
    .map_err(|e| ApiError::Validation(e.to_string()))?;

  if state
    .store
    .progress(user.id, course.id)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::NotFound(
      "course is not in your library".to_string(),
    ));
  }

  let progress = state
    .store
    .set_completed_steps(user.id, course.id, steps)
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::message_data("progress updated", progress))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNoteBody {
  pub lang_key:  String,
  #[serde(default)]
  pub note_text: String,
}

pub async fn save_note<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  ApiJson(body): ApiJson<SaveNoteBody>,
) -> Result<Json<ApiResponse<Note>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let course = resolve_course(&state, &body.lang_key, false).await?;

  validate_note_text(&body.note_text)
    .map_err(|e| ApiError::Validation(e.to_string()))?;

  let note = state
    .store
    .upsert_note(user.id, course.id, &body.note_text)
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::message_data("notes saved", note))
}

pub async fn get_note<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  ApiPath(lang_key): ApiPath<String>,
) -> Result<Json<ApiResponse<Option<Note>>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let course = resolve_course(&state, &lang_key, false).await?;

  let note = state
    .store
    .note(user.id, course.id)
    .await
    .map_err(ApiError::store)?;

  Ok(ApiResponse::data(note))
}
