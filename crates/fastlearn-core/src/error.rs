//! Error type for `fastlearn-core`.

use thiserror::Error;

/// Errors arising from domain-level validation.
#[derive(Debug, Error)]
pub enum Error {
  /// A completed-step index falls outside the course's roadmap.
  #[error("step index {index} is out of range for a roadmap of {total} steps")]
  StepOutOfRange { index: i64, total: i64 },

  /// A note exceeds [`crate::note::MAX_NOTE_LEN`] characters.
  #[error("note is too long: {0} characters")]
  NoteTooLong(usize),

  /// A stored or submitted video kind is neither `video` nor `playlist`.
  #[error("unknown video kind: {0:?}")]
  UnknownVideoKind(String),

  /// A progress write targeted a course the user has not enrolled in.
  #[error("user {user_id} is not enrolled in course {course_id}")]
  NotEnrolled { user_id: i64, course_id: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
