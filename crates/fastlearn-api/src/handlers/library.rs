//! The caller's library views under `/api/library`.

use axum::{Json, extract::State};

use fastlearn_core::{
  progress::{LibraryEntry, LibraryStats},
  store::LearnStore,
};

use crate::{
  AppState, auth::CurrentUser, error::ApiError, response::ApiResponse,
};

pub async fn library<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<LibraryEntry>>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entries = state
    .store
    .library(user.id, true)
    .await
    .map_err(ApiError::store)?;
  Ok(ApiResponse::data(entries))
}

pub async fn stats<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<LibraryStats>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let stats = state
    .store
    .library_stats(user.id)
    .await
    .map_err(ApiError::store)?;
  Ok(ApiResponse::data(stats))
}

pub async fn completed<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<LibraryEntry>>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entries = state
    .store
    .completed_courses(user.id)
    .await
    .map_err(ApiError::store)?;
  Ok(ApiResponse::data(entries))
}

pub async fn in_progress<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<LibraryEntry>>>, ApiError>
where
  S: LearnStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entries = state
    .store
    .in_progress_courses(user.id)
    .await
    .map_err(ApiError::store)?;
  Ok(ApiResponse::data(entries))
}
