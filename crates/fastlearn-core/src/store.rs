//! Storage trait for the course tracker.
//!
//! Implementations are expected to uphold the transactional contracts
//! spelled out on the individual methods: enrollment, progress rewrites,
//! and unenrollment each happen atomically, so readers never observe a
//! completed-step set that disagrees with the stored percentage.

use std::future::Future;

use crate::{
  activity::{ActivityEntry, NewActivity},
  course::{Course, CourseStats, CourseSummary, CourseUpdate, NewCourse, RoadmapStep},
  note::Note,
  progress::{Enrollment, LibraryEntry, LibraryStats, Progress},
  stats::DashboardStats,
  user::{NewUser, User, UserOverview},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Persistent storage for users, courses, and everything derived from
/// their combination.
pub trait LearnStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────────

  /// Insert a new account and return it with its assigned id.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Fetch an account by id.
  fn user_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Fetch an account by email, the login identifier.
  fn user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Fetch an account by username.
  fn user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Stamp the account's `last_login` with the current time.
  fn touch_last_login(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace the account's password hash.
  fn update_password<'a>(
    &'a self,
    id: i64,
    password_hash: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All accounts with per-user enrollment counts, newest first.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<UserOverview>, Self::Error>> + Send + '_;

  /// Enable or disable an account.
  fn set_user_active(
    &self,
    id: i64,
    active: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete an account. Enrollments, progress, completed steps, and
  /// notes go with it; activity rows survive with a null user.
  fn delete_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Courses ───────────────────────────────────────────────────────────────

  /// Active courses with enrollment counts, ordered by name.
  fn list_courses(
    &self,
  ) -> impl Future<Output = Result<Vec<CourseSummary>, Self::Error>> + Send + '_;

  /// Look a course up by its key, optionally restricted to active ones.
  fn course_by_key<'a>(
    &'a self,
    lang_key: &'a str,
    only_active: bool,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + 'a;

  /// The course's roadmap, ordered by position.
  fn roadmap(
    &self,
    course_id: i64,
  ) -> impl Future<Output = Result<Vec<RoadmapStep>, Self::Error>> + Send + '_;

  /// Insert a course together with its roadmap in one transaction.
  fn create_course(
    &self,
    input: NewCourse,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Apply a partial update. When the update replaces the roadmap, all
  /// stored percentages for the course are recomputed against the new
  /// step count, in the same transaction.
  fn update_course(
    &self,
    course_id: i64,
    update: CourseUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a course and everything that references it.
  fn delete_course(
    &self,
    course_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Per-course enrollment and completion aggregates.
  fn course_stats(
    &self,
  ) -> impl Future<Output = Result<Vec<CourseStats>, Self::Error>> + Send + '_;

  // ── Enrollment & progress ─────────────────────────────────────────────────

  /// Add the course to the user's library and create its zeroed
  /// progress row, atomically. Enrolling twice is a no-op.
  fn enroll(
    &self,
    user_id: i64,
    course_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the enrollment plus its progress, completed steps, and
  /// note, atomically. Unenrolling twice is a no-op.
  fn unenroll(
    &self,
    user_id: i64,
    course_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch one enrollment row.
  fn get_enrollment(
    &self,
    user_id: i64,
    course_id: i64,
  ) -> impl Future<Output = Result<Option<Enrollment>, Self::Error>> + Send + '_;

  /// Replace the user's completed-step set for the course and return
  /// the recomputed progress. Fails when the user is not enrolled or an
  /// index exceeds the roadmap.
  fn set_completed_steps(
    &self,
    user_id: i64,
    course_id: i64,
    steps: Vec<i64>,
  ) -> impl Future<Output = Result<Progress, Self::Error>> + Send + '_;

  /// Fetch one progress row.
  fn progress(
    &self,
    user_id: i64,
    course_id: i64,
  ) -> impl Future<Output = Result<Option<Progress>, Self::Error>> + Send + '_;

  /// The user's completed step indices for the course, ascending.
  fn completed_steps(
    &self,
    user_id: i64,
    course_id: i64,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + '_;

  /// The user's library, newest enrollment first. `only_active` hides
  /// courses an admin has taken out of the catalog.
  fn library(
    &self,
    user_id: i64,
    only_active: bool,
  ) -> impl Future<Output = Result<Vec<LibraryEntry>, Self::Error>> + Send + '_;

  /// Aggregates over the user's whole library.
  fn library_stats(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<LibraryStats, Self::Error>> + Send + '_;

  /// Finished courses, most recently finished first.
  fn completed_courses(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<LibraryEntry>, Self::Error>> + Send + '_;

  /// Courses started but not finished, most recently touched first.
  fn in_progress_courses(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<LibraryEntry>, Self::Error>> + Send + '_;

  /// Every enrollment row, for the data export.
  fn list_enrollments(
    &self,
  ) -> impl Future<Output = Result<Vec<Enrollment>, Self::Error>> + Send + '_;

  /// Every progress row, for the data export.
  fn list_progress(
    &self,
  ) -> impl Future<Output = Result<Vec<Progress>, Self::Error>> + Send + '_;

  // ── Notes ─────────────────────────────────────────────────────────────────

  /// Create or overwrite the user's note for the course.
  fn upsert_note<'a>(
    &'a self,
    user_id: i64,
    course_id: i64,
    text: &'a str,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + 'a;

  /// Fetch the user's note for the course, if any.
  fn note(
    &self,
    user_id: i64,
    course_id: i64,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send + '_;

  // ── Activity log ──────────────────────────────────────────────────────────

  /// Append one entry to the audit trail.
  fn log_activity(
    &self,
    input: NewActivity,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The newest `limit` entries across all users.
  fn recent_activity(
    &self,
    limit: i64,
  ) -> impl Future<Output = Result<Vec<ActivityEntry>, Self::Error>> + Send + '_;

  /// The newest `limit` entries for one user.
  fn user_activity(
    &self,
    user_id: i64,
    limit: i64,
  ) -> impl Future<Output = Result<Vec<ActivityEntry>, Self::Error>> + Send + '_;

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// Headline numbers for the admin dashboard.
  fn dashboard_stats(
    &self,
  ) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;
}
