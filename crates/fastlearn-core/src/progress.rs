//! Per-enrollment progress: the derived percentage and completion flag.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Error, Result, course::Course};

/// An enrollment: the fact that a course is in a user's library.
#[derive(Debug, Clone, Serialize)]
pub struct Enrollment {
  pub user_id:   i64,
  pub course_id: i64,
  pub added_at:  DateTime<Utc>,
}

/// Completion state for one (user, course) pair.
///
/// `progress_percentage` always equals [`completion_percentage`] of the
/// stored completed-step set; the store recomputes it in the same
/// transaction as any change to that set.
#[derive(Debug, Clone, Serialize)]
pub struct Progress {
  pub user_id:             i64,
  pub course_id:           i64,
  pub progress_percentage: i64,
  pub is_completed:        bool,
  pub last_accessed:       DateTime<Utc>,
}

/// A library row: an enrolled course joined with the caller's progress.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryEntry {
  #[serde(flatten)]
  pub course:              Course,
  pub progress_percentage: i64,
  pub is_completed:        bool,
  pub added_at:            DateTime<Utc>,
  pub last_accessed:       DateTime<Utc>,
  /// When the last step was completed. Only populated by the
  /// completed-courses view.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub completed_at:        Option<DateTime<Utc>>,
}

/// Aggregates over one user's library.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryStats {
  pub total_courses:       i64,
  pub completed_courses:   i64,
  pub in_progress_courses: i64,
  pub average_progress:    f64,
}

/// Percentage of `total` steps completed, rounded to the nearest integer.
///
/// A course with no roadmap counts as 0% regardless of input.
pub fn completion_percentage(completed: usize, total: usize) -> i64 {
  if total == 0 {
    return 0;
  }
  (100.0 * completed as f64 / total as f64).round() as i64
}

/// Check every index against a roadmap of `total` steps.
pub fn validate_step_indices(indices: &[i64], total: i64) -> Result<()> {
  for &index in indices {
    if index < 0 || index >= total {
      return Err(Error::StepOutOfRange { index, total });
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn percentage_rounds_to_nearest() {
    assert_eq!(completion_percentage(3, 7), 43); // 42.857…
    assert_eq!(completion_percentage(1, 7), 14); // 14.285…
    assert_eq!(completion_percentage(5, 7), 71); // 71.428…
    assert_eq!(completion_percentage(2, 3), 67); // 66.666…
  }

  #[test]
  fn percentage_covers_bounds() {
    assert_eq!(completion_percentage(0, 8), 0);
    assert_eq!(completion_percentage(8, 8), 100);
  }

  #[test]
  fn empty_roadmap_is_always_zero() {
    assert_eq!(completion_percentage(0, 0), 0);
    assert_eq!(completion_percentage(3, 0), 0);
  }

  #[test]
  fn step_indices_checked_against_total() {
    assert!(validate_step_indices(&[0, 1, 6], 7).is_ok());
    assert!(validate_step_indices(&[], 7).is_ok());

    let err = validate_step_indices(&[7], 7).unwrap_err();
    assert!(matches!(err, Error::StepOutOfRange { index: 7, total: 7 }));
    assert!(validate_step_indices(&[-1], 7).is_err());
  }
}
