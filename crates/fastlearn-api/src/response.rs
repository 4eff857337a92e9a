//! The JSON envelope every endpoint responds with.

use axum::Json;
use serde::Serialize;

/// `{ "success": …, "message": …, "data": … }`, with `message` and `data`
/// omitted when unset.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize = serde_json::Value> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
  /// A successful response carrying only a payload.
  pub fn data(data: T) -> Json<Self> {
    Json(Self { success: true, message: None, data: Some(data) })
  }

  /// A successful response carrying a message and a payload.
  pub fn message_data(message: impl Into<String>, data: T) -> Json<Self> {
    Json(Self {
      success: true,
      message: Some(message.into()),
      data:    Some(data),
    })
  }
}

impl ApiResponse {
  /// A successful response carrying only a message.
  pub fn message(message: impl Into<String>) -> Json<Self> {
    Json(Self {
      success: true,
      message: Some(message.into()),
      data:    None,
    })
  }

  /// The failure envelope. Composed with a status code by the error type.
  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      success: false,
      message: Some(message.into()),
      data:    None,
    }
  }
}
