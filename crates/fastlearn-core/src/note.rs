//! Per-enrollment free-text notes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Error, Result};

/// Upper bound on note length, enforced before any write.
pub const MAX_NOTE_LEN: usize = 5000;

/// The single note a user keeps for one course.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
  pub user_id:    i64,
  pub course_id:  i64,
  pub note_text:  String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Reject note text longer than [`MAX_NOTE_LEN`] characters.
pub fn validate_note_text(text: &str) -> Result<()> {
  let len = text.chars().count();
  if len > MAX_NOTE_LEN {
    return Err(Error::NoteTooLong(len));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn note_length_is_bounded() {
    assert!(validate_note_text("").is_ok());
    assert!(validate_note_text(&"x".repeat(MAX_NOTE_LEN)).is_ok());
    assert!(validate_note_text(&"x".repeat(MAX_NOTE_LEN + 1)).is_err());
  }
}
