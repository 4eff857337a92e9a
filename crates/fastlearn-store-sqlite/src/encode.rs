//! Conversions between core types and their SQLite representations.
//!
//! Timestamps are stored as RFC 3339 strings, booleans as integers, and
//! the video kind as its lowercase discriminant. Each `Raw*` struct
//! mirrors a query's column list and decodes into the core type.

use chrono::{DateTime, Utc};
use fastlearn_core::{
  activity::ActivityEntry,
  course::{Course, VideoKind},
  note::Note,
  progress::{Enrollment, LibraryEntry, Progress},
  user::{User, UserOverview},
};

use crate::error::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Row shapes ──────────────────────────────────────────────────────────────

pub struct RawUser {
  pub id:            i64,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub is_admin:      bool,
  pub is_active:     bool,
  pub created_at:    String,
  pub last_login:    Option<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.id,
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      is_admin:      self.is_admin,
      is_active:     self.is_active,
      created_at:    decode_dt(&self.created_at)?,
      last_login:    decode_opt_dt(self.last_login.as_deref())?,
    })
  }
}

pub struct RawCourse {
  pub id:          i64,
  pub lang_key:    String,
  pub name:        String,
  pub description: String,
  pub video_id:    String,
  pub video_kind:  String,
  pub icon:        String,
  pub color:       String,
  pub is_active:   bool,
  pub created_at:  String,
}

impl RawCourse {
  pub fn into_course(self) -> Result<Course> {
    Ok(Course {
      id:          self.id,
      lang_key:    self.lang_key,
      name:        self.name,
      description: self.description,
      video_id:    self.video_id,
      video_kind:  VideoKind::parse(&self.video_kind)?,
      icon:        self.icon,
      color:       self.color,
      is_active:   self.is_active,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawProgress {
  pub user_id:             i64,
  pub course_id:           i64,
  pub progress_percentage: i64,
  pub is_completed:        bool,
  pub last_accessed:       String,
}

impl RawProgress {
  pub fn into_progress(self) -> Result<Progress> {
    Ok(Progress {
      user_id:             self.user_id,
      course_id:           self.course_id,
      progress_percentage: self.progress_percentage,
      is_completed:        self.is_completed,
      last_accessed:       decode_dt(&self.last_accessed)?,
    })
  }
}

pub struct RawEnrollment {
  pub user_id:   i64,
  pub course_id: i64,
  pub added_at:  String,
}

impl RawEnrollment {
  pub fn into_enrollment(self) -> Result<Enrollment> {
    Ok(Enrollment {
      user_id:   self.user_id,
      course_id: self.course_id,
      added_at:  decode_dt(&self.added_at)?,
    })
  }
}

/// Course columns joined with the caller's enrollment and progress.
pub struct RawLibraryEntry {
  pub course:              RawCourse,
  pub progress_percentage: i64,
  pub is_completed:        bool,
  pub added_at:            String,
  pub last_accessed:       String,
  pub completed_at:        Option<String>,
}

impl RawLibraryEntry {
  pub fn into_entry(self) -> Result<LibraryEntry> {
    Ok(LibraryEntry {
      course:              self.course.into_course()?,
      progress_percentage: self.progress_percentage,
      is_completed:        self.is_completed,
      added_at:            decode_dt(&self.added_at)?,
      last_accessed:       decode_dt(&self.last_accessed)?,
      completed_at:        decode_opt_dt(self.completed_at.as_deref())?,
    })
  }
}

pub struct RawNote {
  pub user_id:    i64,
  pub course_id:  i64,
  pub note_text:  String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawNote {
  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      user_id:    self.user_id,
      course_id:  self.course_id,
      note_text:  self.note_text,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawActivity {
  pub id:         i64,
  pub user_id:    Option<i64>,
  pub username:   Option<String>,
  pub action:     String,
  pub details:    Option<String>,
  pub ip_address: Option<String>,
  pub created_at: String,
}

impl RawActivity {
  pub fn into_entry(self) -> Result<ActivityEntry> {
    Ok(ActivityEntry {
      id:         self.id,
      user_id:    self.user_id,
      username:   self.username,
      action:     self.action,
      details:    self.details,
      ip_address: self.ip_address,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawUserOverview {
  pub id:                i64,
  pub username:          String,
  pub email:             String,
  pub is_admin:          bool,
  pub is_active:         bool,
  pub created_at:        String,
  pub last_login:        Option<String>,
  pub total_courses:     i64,
  pub completed_courses: i64,
}

impl RawUserOverview {
  pub fn into_overview(self) -> Result<UserOverview> {
    Ok(UserOverview {
      id:                self.id,
      username:          self.username,
      email:             self.email,
      is_admin:          self.is_admin,
      is_active:         self.is_active,
      created_at:        decode_dt(&self.created_at)?,
      last_login:        decode_opt_dt(self.last_login.as_deref())?,
      total_courses:     self.total_courses,
      completed_courses: self.completed_courses,
    })
  }
}
