//! SQL schema for the FastLearn SQLite store.
//!
//! Executed at every connection startup; idempotent. Future migrations
//! will be gated on the `user_version` pragma.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,           -- argon2 PHC string
    is_admin      INTEGER NOT NULL DEFAULT 0,
    is_active     INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL,           -- rfc3339 UTC, server-assigned
    last_login    TEXT
);

CREATE TABLE IF NOT EXISTS courses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    lang_key    TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    video_id    TEXT NOT NULL DEFAULT '',
    video_kind  TEXT NOT NULL DEFAULT 'video',   -- 'video' | 'playlist'
    icon        TEXT NOT NULL DEFAULT '',
    color       TEXT NOT NULL DEFAULT '',
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL
);

-- Step identity is the 0-based position; rewriting a roadmap replaces
-- every row for the course.
CREATE TABLE IF NOT EXISTS roadmap_steps (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    position  INTEGER NOT NULL,
    title     TEXT NOT NULL,
    UNIQUE (course_id, position)
);

CREATE TABLE IF NOT EXISTS enrollments (
    user_id   INTEGER NOT NULL REFERENCES users(id)   ON DELETE CASCADE,
    course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    added_at  TEXT NOT NULL,
    PRIMARY KEY (user_id, course_id)
);

-- One row per enrollment, created and deleted with it.
CREATE TABLE IF NOT EXISTS progress (
    user_id             INTEGER NOT NULL REFERENCES users(id)   ON DELETE CASCADE,
    course_id           INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    progress_percentage INTEGER NOT NULL DEFAULT 0,
    is_completed        INTEGER NOT NULL DEFAULT 0,
    last_accessed       TEXT NOT NULL,
    PRIMARY KEY (user_id, course_id)
);

CREATE TABLE IF NOT EXISTS completed_steps (
    user_id      INTEGER NOT NULL REFERENCES users(id)   ON DELETE CASCADE,
    course_id    INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    step_index   INTEGER NOT NULL,
    completed_at TEXT NOT NULL,
    PRIMARY KEY (user_id, course_id, step_index)
);

CREATE TABLE IF NOT EXISTS notes (
    user_id    INTEGER NOT NULL REFERENCES users(id)   ON DELETE CASCADE,
    course_id  INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    note_text  TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, course_id)
);

-- Append-only audit trail. Rows outlive their user; the reference goes
-- null when the account is deleted.
CREATE TABLE IF NOT EXISTS activity_logs (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER REFERENCES users(id) ON DELETE SET NULL,
    action     TEXT NOT NULL,
    details    TEXT,
    ip_address TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS enrollments_course_idx ON enrollments(course_id);
CREATE INDEX IF NOT EXISTS progress_course_idx    ON progress(course_id);
CREATE INDEX IF NOT EXISTS steps_course_idx       ON completed_steps(course_id);
CREATE INDEX IF NOT EXISTS activity_user_idx      ON activity_logs(user_id);
CREATE INDEX IF NOT EXISTS activity_created_idx   ON activity_logs(created_at);

PRAGMA user_version = 1;
";
