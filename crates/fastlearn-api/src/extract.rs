//! Request extractors whose rejections use the standard error envelope.
//!
//! The stock [`Json`], [`Query`] and [`Path`] extractors answer malformed
//! input with plain-text bodies and their own status codes. These wrappers
//! delegate to them and turn every rejection into [`ApiError::Validation`],
//! so bad input comes back as a 400 wrapped in the same JSON envelope as
//! every other error.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Path, Query, Request},
  http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// The JSON request body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request(
    req: Request,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    match Json::<T>::from_request(req, state).await {
      Ok(Json(value)) => Ok(ApiJson(value)),
      Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
    }
  }
}

/// The deserialized query string.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    match Query::<T>::from_request_parts(parts, state).await {
      Ok(Query(value)) => Ok(ApiQuery(value)),
      Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
    }
  }
}

/// Typed route parameters.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
  S: Send + Sync,
  T: DeserializeOwned + Send,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    match Path::<T>::from_request_parts(parts, state).await {
      Ok(Path(value)) => Ok(ApiPath(value)),
      Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
    }
  }
}
