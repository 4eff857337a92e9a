//! [`SqliteStore`] — the SQLite implementation of [`LearnStore`].

use std::path::Path;

use chrono::{Duration, Utc};
use rusqlite::OptionalExtension as _;

use fastlearn_core::{
  activity::{ActivityEntry, NewActivity},
  catalog::CourseSeed,
  course::{Course, CourseStats, CourseSummary, CourseUpdate, NewCourse, RoadmapStep},
  note::Note,
  progress::{
    completion_percentage, validate_step_indices, Enrollment, LibraryEntry, LibraryStats,
    Progress,
  },
  stats::DashboardStats,
  store::LearnStore,
  user::{NewUser, User, UserOverview},
};

use crate::{
  encode::{
    encode_dt, RawActivity, RawCourse, RawEnrollment, RawLibraryEntry, RawNote, RawProgress,
    RawUser, RawUserOverview,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A FastLearn store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert every seed whose `lang_key` is not yet present, with its
  /// roadmap, in one transaction. Returns how many courses were added.
  pub async fn seed_catalog(&self, seeds: &[CourseSeed]) -> Result<usize> {
    let seeds = seeds.to_vec();
    let now_str = encode_dt(Utc::now());

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0usize;

        for seed in &seeds {
          let exists: bool = tx
            .query_row(
              "SELECT 1 FROM courses WHERE lang_key = ?1",
              rusqlite::params![seed.lang_key],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if exists {
            continue;
          }

          tx.execute(
            "INSERT INTO courses (
               lang_key, name, description, video_id, video_kind,
               icon, color, is_active, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
            rusqlite::params![
              seed.lang_key,
              seed.name,
              seed.description,
              seed.video_id,
              seed.video_kind.as_str(),
              seed.icon,
              seed.color,
              now_str,
            ],
          )?;
          let course_id = tx.last_insert_rowid();

          for (position, title) in seed.roadmap.iter().enumerate() {
            tx.execute(
              "INSERT INTO roadmap_steps (course_id, position, title) VALUES (?1, ?2, ?3)",
              rusqlite::params![course_id, position as i64, title],
            )?;
          }
          inserted += 1;
        }

        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    Ok(inserted)
  }

  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    id:            row.get(0)?,
    username:      row.get(1)?,
    email:         row.get(2)?,
    password_hash: row.get(3)?,
    is_admin:      row.get(4)?,
    is_active:     row.get(5)?,
    created_at:    row.get(6)?,
    last_login:    row.get(7)?,
  })
}

fn course_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCourse> {
  Ok(RawCourse {
    id:          row.get(0)?,
    lang_key:    row.get(1)?,
    name:        row.get(2)?,
    description: row.get(3)?,
    video_id:    row.get(4)?,
    video_kind:  row.get(5)?,
    icon:        row.get(6)?,
    color:       row.get(7)?,
    is_active:   row.get(8)?,
    created_at:  row.get(9)?,
  })
}

/// Columns 0..=9 are the course, 10..=14 the enrollment and progress.
fn library_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawLibraryEntry> {
  Ok(RawLibraryEntry {
    course:              course_row(row)?,
    progress_percentage: row.get(10)?,
    is_completed:        row.get(11)?,
    added_at:            row.get(12)?,
    last_accessed:       row.get(13)?,
    completed_at:        row.get(14)?,
  })
}

fn activity_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawActivity> {
  Ok(RawActivity {
    id:         row.get(0)?,
    user_id:    row.get(1)?,
    username:   row.get(2)?,
    action:     row.get(3)?,
    details:    row.get(4)?,
    ip_address: row.get(5)?,
    created_at: row.get(6)?,
  })
}

fn progress_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProgress> {
  Ok(RawProgress {
    user_id:             row.get(0)?,
    course_id:           row.get(1)?,
    progress_percentage: row.get(2)?,
    is_completed:        row.get(3)?,
    last_accessed:       row.get(4)?,
  })
}

const USER_COLS: &str = "id, username, email, password_hash, is_admin, is_active, created_at, last_login";

const COURSE_COLS: &str =
  "id, lang_key, name, description, video_id, video_kind, icon, color, is_active, created_at";

const PROGRESS_COLS: &str =
  "user_id, course_id, progress_percentage, is_completed, last_accessed";

// ─── LearnStore impl ─────────────────────────────────────────────────────────

impl LearnStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let insert = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, email, password_hash, is_admin, is_active, created_at)
           VALUES (?1, ?2, ?3, ?4, 1, ?5)",
          rusqlite::params![
            insert.username,
            insert.email,
            insert.password_hash,
            insert.is_admin,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(User {
      id,
      username:      input.username,
      email:         input.email,
      password_hash: input.password_hash,
      is_admin:      input.is_admin,
      is_active:     true,
      created_at,
      last_login:    None,
    })
  }

  async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
              rusqlite::params![id],
              user_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              user_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE username = ?1"),
              rusqlite::params![username],
              user_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn touch_last_login(&self, id: i64) -> Result<()> {
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET last_login = ?2 WHERE id = ?1",
          rusqlite::params![id, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn update_password(&self, id: i64, password_hash: &str) -> Result<()> {
    let hash = password_hash.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET password_hash = ?2 WHERE id = ?1",
          rusqlite::params![id, hash],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_users(&self) -> Result<Vec<UserOverview>> {
    let raws: Vec<RawUserOverview> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT u.id, u.username, u.email, u.is_admin, u.is_active, u.created_at,
                  u.last_login,
                  (SELECT COUNT(*) FROM enrollments e WHERE e.user_id = u.id),
                  (SELECT COUNT(*) FROM progress p
                    WHERE p.user_id = u.id AND p.is_completed = 1)
           FROM users u
           ORDER BY u.created_at DESC, u.id DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawUserOverview {
              id:                row.get(0)?,
              username:          row.get(1)?,
              email:             row.get(2)?,
              is_admin:          row.get(3)?,
              is_active:         row.get(4)?,
              created_at:        row.get(5)?,
              last_login:        row.get(6)?,
              total_courses:     row.get(7)?,
              completed_courses: row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUserOverview::into_overview).collect()
  }

  async fn set_user_active(&self, id: i64, active: bool) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET is_active = ?2 WHERE id = ?1",
          rusqlite::params![id, active],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_user(&self, id: i64) -> Result<()> {
    // FK actions do the rest: dependent rows cascade, activity keeps a
    // null user.
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Courses ───────────────────────────────────────────────────────────────

  async fn list_courses(&self) -> Result<Vec<CourseSummary>> {
    let raws: Vec<(RawCourse, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT c.id, c.lang_key, c.name, c.description, c.video_id, c.video_kind,
                  c.icon, c.color, c.is_active, c.created_at,
                  (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id)
           FROM courses c
           WHERE c.is_active = 1
           ORDER BY c.name",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((course_row(row)?, row.get(10)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(raw, enrolled_count)| {
        Ok(CourseSummary { course: raw.into_course()?, enrolled_count })
      })
      .collect()
  }

  async fn course_by_key(&self, lang_key: &str, only_active: bool) -> Result<Option<Course>> {
    let key = lang_key.to_owned();

    let raw: Option<RawCourse> = self
      .conn
      .call(move |conn| {
        let sql = if only_active {
          format!("SELECT {COURSE_COLS} FROM courses WHERE lang_key = ?1 AND is_active = 1")
        } else {
          format!("SELECT {COURSE_COLS} FROM courses WHERE lang_key = ?1")
        };
        Ok(
          conn
            .query_row(&sql, rusqlite::params![key], course_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCourse::into_course).transpose()
  }

  async fn roadmap(&self, course_id: i64) -> Result<Vec<RoadmapStep>> {
    let steps = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, course_id, position, title
           FROM roadmap_steps
           WHERE course_id = ?1
           ORDER BY position",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![course_id], |row| {
            Ok(RoadmapStep {
              id:        row.get(0)?,
              course_id: row.get(1)?,
              position:  row.get(2)?,
              title:     row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(steps)
  }

  async fn create_course(&self, input: NewCourse) -> Result<Course> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let insert = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO courses (
             lang_key, name, description, video_id, video_kind,
             icon, color, is_active, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
          rusqlite::params![
            insert.lang_key,
            insert.name,
            insert.description,
            insert.video_id,
            insert.video_kind.as_str(),
            insert.icon,
            insert.color,
            at_str,
          ],
        )?;
        let course_id = tx.last_insert_rowid();

        for (position, title) in insert.roadmap.iter().enumerate() {
          tx.execute(
            "INSERT INTO roadmap_steps (course_id, position, title) VALUES (?1, ?2, ?3)",
            rusqlite::params![course_id, position as i64, title],
          )?;
        }

        tx.commit()?;
        Ok(course_id)
      })
      .await?;

    Ok(Course {
      id,
      lang_key:    input.lang_key,
      name:        input.name,
      description: input.description,
      video_id:    input.video_id,
      video_kind:  input.video_kind,
      icon:        input.icon,
      color:       input.color,
      is_active:   true,
      created_at,
    })
  }

  async fn update_course(&self, course_id: i64, update: CourseUpdate) -> Result<()> {
    use rusqlite::types::Value;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let mut sets: Vec<&str> = Vec::new();
        let mut args: Vec<Value> = Vec::new();

        if let Some(name) = update.name {
          args.push(Value::Text(name));
          sets.push("name = ?");
        }
        if let Some(description) = update.description {
          args.push(Value::Text(description));
          sets.push("description = ?");
        }
        if let Some(video_id) = update.video_id {
          args.push(Value::Text(video_id));
          sets.push("video_id = ?");
        }
        if let Some(kind) = update.video_kind {
          args.push(Value::Text(kind.as_str().to_owned()));
          sets.push("video_kind = ?");
        }
        if let Some(icon) = update.icon {
          args.push(Value::Text(icon));
          sets.push("icon = ?");
        }
        if let Some(color) = update.color {
          args.push(Value::Text(color));
          sets.push("color = ?");
        }

        if !sets.is_empty() {
          // Positional `?` binds in push order; the id goes last.
          args.push(Value::Integer(course_id));
          let sql = format!("UPDATE courses SET {} WHERE id = ?", sets.join(", "));
          tx.execute(&sql, rusqlite::params_from_iter(args))?;
        }

        if let Some(titles) = update.roadmap {
          tx.execute(
            "DELETE FROM roadmap_steps WHERE course_id = ?1",
            rusqlite::params![course_id],
          )?;
          for (position, title) in titles.iter().enumerate() {
            tx.execute(
              "INSERT INTO roadmap_steps (course_id, position, title) VALUES (?1, ?2, ?3)",
              rusqlite::params![course_id, position as i64, title],
            )?;
          }

          // Completed steps past the new end are dropped, then every
          // enrolled user's percentage is recomputed against the new
          // total before the transaction commits.
          let total = titles.len() as i64;
          tx.execute(
            "DELETE FROM completed_steps WHERE course_id = ?1 AND step_index >= ?2",
            rusqlite::params![course_id, total],
          )?;

          if total == 0 {
            tx.execute(
              "UPDATE progress SET progress_percentage = 0, is_completed = 0
               WHERE course_id = ?1",
              rusqlite::params![course_id],
            )?;
          } else {
            tx.execute(
              "UPDATE progress
               SET progress_percentage = CAST(ROUND(
                     100.0 * (SELECT COUNT(*) FROM completed_steps cs
                               WHERE cs.user_id = progress.user_id
                                 AND cs.course_id = progress.course_id) / ?2
                   ) AS INTEGER)
               WHERE course_id = ?1",
              rusqlite::params![course_id, total],
            )?;
            tx.execute(
              "UPDATE progress SET is_completed = (progress_percentage = 100)
               WHERE course_id = ?1",
              rusqlite::params![course_id],
            )?;
          }
        }

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_course(&self, course_id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM courses WHERE id = ?1", rusqlite::params![course_id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn course_stats(&self) -> Result<Vec<CourseStats>> {
    let stats = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT c.id, c.lang_key, c.name,
                  (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id)
                    AS enrolled_users,
                  (SELECT COUNT(*) FROM progress p
                    WHERE p.course_id = c.id AND p.is_completed = 1),
                  COALESCE((SELECT ROUND(AVG(p.progress_percentage), 2)
                             FROM progress p WHERE p.course_id = c.id), 0),
                  (SELECT COUNT(*) FROM roadmap_steps r WHERE r.course_id = c.id)
           FROM courses c
           WHERE c.is_active = 1
           ORDER BY enrolled_users DESC, c.name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(CourseStats {
              id:              row.get(0)?,
              lang_key:        row.get(1)?,
              name:            row.get(2)?,
              enrolled_users:  row.get(3)?,
              completed_users: row.get(4)?,
              avg_progress:    row.get(5)?,
              total_steps:     row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(stats)
  }

  // ── Enrollment & progress ─────────────────────────────────────────────────

  async fn enroll(&self, user_id: i64, course_id: i64) -> Result<()> {
    let now_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT OR IGNORE INTO enrollments (user_id, course_id, added_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![user_id, course_id, now_str],
        )?;
        tx.execute(
          "INSERT OR IGNORE INTO progress
             (user_id, course_id, progress_percentage, is_completed, last_accessed)
           VALUES (?1, ?2, 0, 0, ?3)",
          rusqlite::params![user_id, course_id, now_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn unenroll(&self, user_id: i64, course_id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM notes WHERE user_id = ?1 AND course_id = ?2",
          rusqlite::params![user_id, course_id],
        )?;
        tx.execute(
          "DELETE FROM completed_steps WHERE user_id = ?1 AND course_id = ?2",
          rusqlite::params![user_id, course_id],
        )?;
        tx.execute(
          "DELETE FROM progress WHERE user_id = ?1 AND course_id = ?2",
          rusqlite::params![user_id, course_id],
        )?;
        tx.execute(
          "DELETE FROM enrollments WHERE user_id = ?1 AND course_id = ?2",
          rusqlite::params![user_id, course_id],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_enrollment(&self, user_id: i64, course_id: i64) -> Result<Option<Enrollment>> {
    let raw: Option<RawEnrollment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, course_id, added_at FROM enrollments
               WHERE user_id = ?1 AND course_id = ?2",
              rusqlite::params![user_id, course_id],
              |row| {
                Ok(RawEnrollment {
                  user_id:   row.get(0)?,
                  course_id: row.get(1)?,
                  added_at:  row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEnrollment::into_enrollment).transpose()
  }

  async fn set_completed_steps(
    &self,
    user_id: i64,
    course_id: i64,
    steps: Vec<i64>,
  ) -> Result<Progress> {
    let now_str = encode_dt(Utc::now());

    let raw: RawProgress = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let total: i64 = tx.query_row(
          "SELECT COUNT(*) FROM roadmap_steps WHERE course_id = ?1",
          rusqlite::params![course_id],
          |row| row.get(0),
        )?;

        if let Err(e) = validate_step_indices(&steps, total) {
          return Err(tokio_rusqlite::Error::Other(Box::new(e)));
        }

        tx.execute(
          "DELETE FROM completed_steps WHERE user_id = ?1 AND course_id = ?2",
          rusqlite::params![user_id, course_id],
        )?;
        for index in &steps {
          tx.execute(
            "INSERT OR IGNORE INTO completed_steps
               (user_id, course_id, step_index, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![user_id, course_id, index, now_str],
          )?;
        }

        // Count what actually landed; duplicates in the input collapse
        // on the primary key.
        let done: i64 = tx.query_row(
          "SELECT COUNT(*) FROM completed_steps WHERE user_id = ?1 AND course_id = ?2",
          rusqlite::params![user_id, course_id],
          |row| row.get(0),
        )?;

        let percentage = completion_percentage(done as usize, total as usize);
        let completed = percentage == 100;

        let changed = tx.execute(
          "UPDATE progress
           SET progress_percentage = ?3, is_completed = ?4, last_accessed = ?5
           WHERE user_id = ?1 AND course_id = ?2",
          rusqlite::params![user_id, course_id, percentage, completed, now_str],
        )?;
        if changed == 0 {
          let err = fastlearn_core::Error::NotEnrolled { user_id, course_id };
          return Err(tokio_rusqlite::Error::Other(Box::new(err)));
        }

        let raw = tx.query_row(
          &format!("SELECT {PROGRESS_COLS} FROM progress WHERE user_id = ?1 AND course_id = ?2"),
          rusqlite::params![user_id, course_id],
          progress_row,
        )?;

        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_progress()
  }

  async fn progress(&self, user_id: i64, course_id: i64) -> Result<Option<Progress>> {
    let raw: Option<RawProgress> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PROGRESS_COLS} FROM progress WHERE user_id = ?1 AND course_id = ?2"
              ),
              rusqlite::params![user_id, course_id],
              progress_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProgress::into_progress).transpose()
  }

  async fn completed_steps(&self, user_id: i64, course_id: i64) -> Result<Vec<i64>> {
    let steps = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT step_index FROM completed_steps
           WHERE user_id = ?1 AND course_id = ?2
           ORDER BY step_index",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id, course_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(steps)
  }

  async fn library(&self, user_id: i64, only_active: bool) -> Result<Vec<LibraryEntry>> {
    let raws: Vec<RawLibraryEntry> = self
      .conn
      .call(move |conn| {
        let mut sql = String::from(
          "SELECT c.id, c.lang_key, c.name, c.description, c.video_id, c.video_kind,
                  c.icon, c.color, c.is_active, c.created_at,
                  p.progress_percentage, p.is_completed, e.added_at, p.last_accessed,
                  NULL
           FROM enrollments e
           JOIN courses c ON c.id = e.course_id
           JOIN progress p ON p.user_id = e.user_id AND p.course_id = e.course_id
           WHERE e.user_id = ?1",
        );
        if only_active {
          sql.push_str(" AND c.is_active = 1");
        }
        sql.push_str(" ORDER BY e.added_at DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user_id], library_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLibraryEntry::into_entry).collect()
  }

  async fn library_stats(&self, user_id: i64) -> Result<LibraryStats> {
    let stats = self
      .conn
      .call(move |conn| {
        let stats = conn.query_row(
          "SELECT COUNT(*),
                  COALESCE(SUM(is_completed), 0),
                  COALESCE(SUM(progress_percentage > 0 AND is_completed = 0), 0),
                  COALESCE(ROUND(AVG(progress_percentage), 2), 0)
           FROM progress
           WHERE user_id = ?1",
          rusqlite::params![user_id],
          |row| {
            Ok(LibraryStats {
              total_courses:       row.get(0)?,
              completed_courses:   row.get(1)?,
              in_progress_courses: row.get(2)?,
              average_progress:    row.get(3)?,
            })
          },
        )?;
        Ok(stats)
      })
      .await?;

    Ok(stats)
  }

  async fn completed_courses(&self, user_id: i64) -> Result<Vec<LibraryEntry>> {
    let raws: Vec<RawLibraryEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT c.id, c.lang_key, c.name, c.description, c.video_id, c.video_kind,
                  c.icon, c.color, c.is_active, c.created_at,
                  p.progress_percentage, p.is_completed, e.added_at, p.last_accessed,
                  (SELECT MAX(cs.completed_at) FROM completed_steps cs
                    WHERE cs.user_id = e.user_id AND cs.course_id = e.course_id)
                    AS completed_at
           FROM enrollments e
           JOIN courses c ON c.id = e.course_id
           JOIN progress p ON p.user_id = e.user_id AND p.course_id = e.course_id
           WHERE e.user_id = ?1 AND p.is_completed = 1
           ORDER BY completed_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id], library_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLibraryEntry::into_entry).collect()
  }

  async fn in_progress_courses(&self, user_id: i64) -> Result<Vec<LibraryEntry>> {
    let raws: Vec<RawLibraryEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT c.id, c.lang_key, c.name, c.description, c.video_id, c.video_kind,
                  c.icon, c.color, c.is_active, c.created_at,
                  p.progress_percentage, p.is_completed, e.added_at, p.last_accessed,
                  NULL
           FROM enrollments e
           JOIN courses c ON c.id = e.course_id
           JOIN progress p ON p.user_id = e.user_id AND p.course_id = e.course_id
           WHERE e.user_id = ?1 AND p.progress_percentage > 0 AND p.is_completed = 0
           ORDER BY p.last_accessed DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id], library_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLibraryEntry::into_entry).collect()
  }

  async fn list_enrollments(&self) -> Result<Vec<Enrollment>> {
    let raws: Vec<RawEnrollment> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, course_id, added_at FROM enrollments
           ORDER BY user_id, course_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawEnrollment {
              user_id:   row.get(0)?,
              course_id: row.get(1)?,
              added_at:  row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEnrollment::into_enrollment).collect()
  }

  async fn list_progress(&self) -> Result<Vec<Progress>> {
    let raws: Vec<RawProgress> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROGRESS_COLS} FROM progress ORDER BY user_id, course_id"
        ))?;
        let rows = stmt
          .query_map([], progress_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProgress::into_progress).collect()
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  async fn upsert_note(&self, user_id: i64, course_id: i64, text: &str) -> Result<Note> {
    let text = text.to_owned();
    let now_str = encode_dt(Utc::now());

    let raw: RawNote = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notes (user_id, course_id, note_text, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)
           ON CONFLICT (user_id, course_id) DO UPDATE
               SET note_text = excluded.note_text, updated_at = excluded.updated_at",
          rusqlite::params![user_id, course_id, text, now_str],
        )?;

        let raw = conn.query_row(
          "SELECT user_id, course_id, note_text, created_at, updated_at
           FROM notes WHERE user_id = ?1 AND course_id = ?2",
          rusqlite::params![user_id, course_id],
          |row| {
            Ok(RawNote {
              user_id:    row.get(0)?,
              course_id:  row.get(1)?,
              note_text:  row.get(2)?,
              created_at: row.get(3)?,
              updated_at: row.get(4)?,
            })
          },
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_note()
  }

  async fn note(&self, user_id: i64, course_id: i64) -> Result<Option<Note>> {
    let raw: Option<RawNote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, course_id, note_text, created_at, updated_at
               FROM notes WHERE user_id = ?1 AND course_id = ?2",
              rusqlite::params![user_id, course_id],
              |row| {
                Ok(RawNote {
                  user_id:    row.get(0)?,
                  course_id:  row.get(1)?,
                  note_text:  row.get(2)?,
                  created_at: row.get(3)?,
                  updated_at: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawNote::into_note).transpose()
  }

  // ── Activity log ──────────────────────────────────────────────────────────

  async fn log_activity(&self, input: NewActivity) -> Result<()> {
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activity_logs (user_id, action, details, ip_address, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            input.user_id,
            input.action,
            input.details,
            input.ip_address,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn recent_activity(&self, limit: i64) -> Result<Vec<ActivityEntry>> {
    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT a.id, a.user_id, u.username, a.action, a.details, a.ip_address,
                  a.created_at
           FROM activity_logs a
           LEFT JOIN users u ON u.id = a.user_id
           ORDER BY a.created_at DESC, a.id DESC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit], activity_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_entry).collect()
  }

  async fn user_activity(&self, user_id: i64, limit: i64) -> Result<Vec<ActivityEntry>> {
    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT a.id, a.user_id, u.username, a.action, a.details, a.ip_address,
                  a.created_at
           FROM activity_logs a
           LEFT JOIN users u ON u.id = a.user_id
           WHERE a.user_id = ?1
           ORDER BY a.created_at DESC, a.id DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id, limit], activity_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_entry).collect()
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  async fn dashboard_stats(&self) -> Result<DashboardStats> {
    let cutoff = encode_dt(Utc::now() - Duration::days(7));

    let stats = self
      .conn
      .call(move |conn| {
        let stats = conn.query_row(
          "SELECT (SELECT COUNT(*) FROM users),
                  (SELECT COUNT(*) FROM courses WHERE is_active = 1),
                  (SELECT COUNT(*) FROM enrollments),
                  COALESCE((SELECT ROUND(AVG(progress_percentage), 2) FROM progress), 0),
                  (SELECT COUNT(*) FROM activity_logs WHERE created_at >= ?1)",
          rusqlite::params![cutoff],
          |row| {
            Ok(DashboardStats {
              total_users:         row.get(0)?,
              total_courses:       row.get(1)?,
              total_enrollments:   row.get(2)?,
              avg_completion_rate: row.get(3)?,
              recent_activity:     row.get(4)?,
            })
          },
        )?;
        Ok(stats)
      })
      .await?;

    Ok(stats)
  }
}
