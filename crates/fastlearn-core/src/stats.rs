//! Aggregate figures for the admin dashboard and the data export.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  course::CourseSummary,
  progress::{Enrollment, Progress},
  user::UserOverview,
};

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
  pub total_users:         i64,
  pub total_courses:       i64,
  pub total_enrollments:   i64,
  pub avg_completion_rate: f64,
  /// Activity-log entries recorded in the last seven days.
  pub recent_activity:     i64,
}

/// Everything the export endpoint emits. Password hashes never appear
/// here; [`crate::user::User`] is not part of the payload and
/// [`UserOverview`] carries no hash to begin with.
#[derive(Debug, Clone, Serialize)]
pub struct ExportData {
  pub users:       Vec<UserOverview>,
  pub courses:     Vec<CourseSummary>,
  pub enrollments: Vec<Enrollment>,
  pub progress:    Vec<Progress>,
  pub export_date: DateTime<Utc>,
}
