//! Courses and their ordered roadmaps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Whether a course's `video_id` names a single video or a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
  #[default]
  Video,
  Playlist,
}

impl VideoKind {
  pub fn as_str(self) -> &'static str {
    match self {
      VideoKind::Video    => "video",
      VideoKind::Playlist => "playlist",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "video"    => Ok(VideoKind::Video),
      "playlist" => Ok(VideoKind::Playlist),
      other      => Err(Error::UnknownVideoKind(other.to_string())),
    }
  }
}

/// A catalog entry: one self-paced curriculum, keyed by `lang_key`.
#[derive(Debug, Clone, Serialize)]
pub struct Course {
  pub id:          i64,
  pub lang_key:    String,
  pub name:        String,
  pub description: String,
  pub video_id:    String,
  pub video_kind:  VideoKind,
  pub icon:        String,
  pub color:       String,
  pub is_active:   bool,
  pub created_at:  DateTime<Utc>,
}

/// One unit of a course's curriculum.
///
/// `position` is the 0-based index within the roadmap; clients reference
/// steps by this index when reporting completion.
#[derive(Debug, Clone, Serialize)]
pub struct RoadmapStep {
  pub id:        i64,
  pub course_id: i64,
  pub position:  i64,
  pub title:     String,
}

/// Input for creating a course together with its roadmap.
#[derive(Debug, Clone)]
pub struct NewCourse {
  pub lang_key:    String,
  pub name:        String,
  pub description: String,
  pub video_id:    String,
  pub video_kind:  VideoKind,
  pub icon:        String,
  pub color:       String,
  pub roadmap:     Vec<String>,
}

/// Partial update for an existing course; `None` fields are left unchanged.
///
/// Replacing `roadmap` rewrites the step list wholesale, which in turn
/// forces every enrolled user's percentage to be recomputed against the
/// new step count.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub video_id:    Option<String>,
  pub video_kind:  Option<VideoKind>,
  pub icon:        Option<String>,
  pub color:       Option<String>,
  pub roadmap:     Option<Vec<String>>,
}

impl CourseUpdate {
  /// True when no field is set. Such an update is rejected upstream.
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.description.is_none()
      && self.video_id.is_none()
      && self.video_kind.is_none()
      && self.icon.is_none()
      && self.color.is_none()
      && self.roadmap.is_none()
  }
}

/// A catalog listing row: the course plus how many users have it in
/// their library.
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
  #[serde(flatten)]
  pub course:         Course,
  pub enrolled_count: i64,
}

/// Per-course aggregates for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CourseStats {
  pub id:              i64,
  pub lang_key:        String,
  pub name:            String,
  pub enrolled_users:  i64,
  pub completed_users: i64,
  pub avg_progress:    f64,
  pub total_steps:     i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn video_kind_parses_both_variants() {
    assert_eq!(VideoKind::parse("video").unwrap(), VideoKind::Video);
    assert_eq!(VideoKind::parse("playlist").unwrap(), VideoKind::Playlist);
    assert!(VideoKind::parse("channel").is_err());
  }

  #[test]
  fn empty_update_is_detected() {
    assert!(CourseUpdate::default().is_empty());
    let update = CourseUpdate { name: Some("Rust".into()), ..Default::default() };
    assert!(!update.is_empty());
  }
}
