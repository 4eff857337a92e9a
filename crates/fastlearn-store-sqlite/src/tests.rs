//! Integration tests for `SqliteStore` against an in-memory database.

use fastlearn_core::{
  activity::{action, NewActivity},
  catalog::DEFAULT_CATALOG,
  course::{CourseUpdate, NewCourse, VideoKind},
  store::LearnStore,
  user::NewUser,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn seeded() -> SqliteStore {
  let s = store().await;
  s.seed_catalog(DEFAULT_CATALOG).await.expect("seed catalog");
  s
}

fn new_user(name: &str) -> NewUser {
  NewUser {
    username:      name.into(),
    email:         format!("{name}@example.com"),
    password_hash: "$argon2id$v=19$stub".into(),
    is_admin:      false,
  }
}

fn new_course(key: &str, steps: &[&str]) -> NewCourse {
  NewCourse {
    lang_key:    key.into(),
    name:        key.to_uppercase(),
    description: String::new(),
    video_id:    "abc123".into(),
    video_kind:  VideoKind::Video,
    icon:        "fas fa-code".into(),
    color:       "#333333".into(),
    roadmap:     steps.iter().map(|s| s.to_string()).collect(),
  }
}

async fn course_id(s: &SqliteStore, key: &str) -> i64 {
  s.course_by_key(key, false)
    .await
    .unwrap()
    .expect("course exists")
    .id
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_catalog_inserts_each_course_once() {
  let s = store().await;

  let first = s.seed_catalog(DEFAULT_CATALOG).await.unwrap();
  assert_eq!(first, DEFAULT_CATALOG.len());

  // Re-seeding an already populated store is a no-op.
  let second = s.seed_catalog(DEFAULT_CATALOG).await.unwrap();
  assert_eq!(second, 0);

  let courses = s.list_courses().await.unwrap();
  assert_eq!(courses.len(), DEFAULT_CATALOG.len());
}

#[tokio::test]
async fn seeded_roadmap_matches_catalog_order() {
  let s = seeded().await;

  let seed = DEFAULT_CATALOG
    .iter()
    .find(|seed| seed.lang_key == "html")
    .unwrap();
  let id = course_id(&s, "html").await;

  let steps = s.roadmap(id).await.unwrap();
  assert_eq!(steps.len(), seed.roadmap.len());
  for (i, step) in steps.iter().enumerate() {
    assert_eq!(step.position, i as i64);
    assert_eq!(step.title, seed.roadmap[i]);
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_user() {
  let s = store().await;

  let user = s.create_user(new_user("alice")).await.unwrap();
  assert!(user.id > 0);
  assert!(user.is_active);
  assert!(user.last_login.is_none());

  let by_id = s.user_by_id(user.id).await.unwrap().unwrap();
  assert_eq!(by_id.username, "alice");

  let by_email = s.user_by_email("alice@example.com").await.unwrap().unwrap();
  assert_eq!(by_email.id, user.id);

  let by_name = s.user_by_username("alice").await.unwrap().unwrap();
  assert_eq!(by_name.id, user.id);

  assert!(s.user_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.create_user(new_user("alice")).await.unwrap();

  let mut dup = new_user("alice2");
  dup.email = "alice@example.com".into();
  let err = s.create_user(dup).await.unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));
}

#[tokio::test]
async fn touch_last_login_records_a_timestamp() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();

  s.touch_last_login(user.id).await.unwrap();

  let fetched = s.user_by_id(user.id).await.unwrap().unwrap();
  assert!(fetched.last_login.is_some());
}

#[tokio::test]
async fn update_password_replaces_the_hash() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();

  s.update_password(user.id, "$argon2id$v=19$new").await.unwrap();

  let fetched = s.user_by_id(user.id).await.unwrap().unwrap();
  assert_eq!(fetched.password_hash, "$argon2id$v=19$new");
}

#[tokio::test]
async fn list_users_counts_courses_newest_first() {
  let s = seeded().await;
  let alice = s.create_user(new_user("alice")).await.unwrap();
  let bob = s.create_user(new_user("bob")).await.unwrap();

  let html = course_id(&s, "html").await;
  let css = course_id(&s, "css").await;
  s.enroll(alice.id, html).await.unwrap();
  s.enroll(alice.id, css).await.unwrap();
  s.set_completed_steps(alice.id, html, (0..7).collect())
    .await
    .unwrap();

  let users = s.list_users().await.unwrap();
  assert_eq!(users.len(), 2);
  assert_eq!(users[0].id, bob.id);

  let row = users.iter().find(|u| u.id == alice.id).unwrap();
  assert_eq!(row.total_courses, 2);
  assert_eq!(row.completed_courses, 1);

  let row = users.iter().find(|u| u.id == bob.id).unwrap();
  assert_eq!(row.total_courses, 0);
  assert_eq!(row.completed_courses, 0);
}

#[tokio::test]
async fn set_user_active_flips_the_flag() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();

  s.set_user_active(user.id, false).await.unwrap();
  assert!(!s.user_by_id(user.id).await.unwrap().unwrap().is_active);

  s.set_user_active(user.id, true).await.unwrap();
  assert!(s.user_by_id(user.id).await.unwrap().unwrap().is_active);
}

#[tokio::test]
async fn delete_user_cascades_but_keeps_the_audit_row() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;

  s.enroll(user.id, html).await.unwrap();
  s.upsert_note(user.id, html, "remember the box model").await.unwrap();
  s.log_activity(NewActivity {
      user_id:    user.id,
      action:     action::LOGIN,
      details:    None,
      ip_address: None,
    })
    .await
    .unwrap();

  s.delete_user(user.id).await.unwrap();

  assert!(s.user_by_id(user.id).await.unwrap().is_none());
  assert!(s.get_enrollment(user.id, html).await.unwrap().is_none());
  assert!(s.note(user.id, html).await.unwrap().is_none());

  // The log entry survives with its user reference nulled out.
  let log = s.recent_activity(10).await.unwrap();
  assert_eq!(log.len(), 1);
  assert!(log[0].user_id.is_none());
  assert!(log[0].username.is_none());
  assert_eq!(log[0].action, action::LOGIN);
}

// ─── Courses ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn course_by_key_respects_the_active_filter() {
  let s = seeded().await;

  s.execute_raw("UPDATE courses SET is_active = 0 WHERE lang_key = 'html'")
    .await
    .unwrap();

  assert!(s.course_by_key("html", true).await.unwrap().is_none());
  assert!(s.course_by_key("html", false).await.unwrap().is_some());

  let listed = s.list_courses().await.unwrap();
  assert_eq!(listed.len(), DEFAULT_CATALOG.len() - 1);
  assert!(listed.iter().all(|c| c.course.lang_key != "html"));
}

#[tokio::test]
async fn create_course_with_roadmap() {
  let s = store().await;

  let course = s
    .create_course(new_course("rust", &["ownership", "borrowing", "lifetimes"]))
    .await
    .unwrap();
  assert!(course.id > 0);
  assert!(course.is_active);

  let steps = s.roadmap(course.id).await.unwrap();
  assert_eq!(steps.len(), 3);
  assert_eq!(steps[0].title, "ownership");
  assert_eq!(steps[2].position, 2);
}

#[tokio::test]
async fn duplicate_lang_key_is_rejected() {
  let s = store().await;
  s.create_course(new_course("rust", &[])).await.unwrap();

  let err = s.create_course(new_course("rust", &[])).await.unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));
}

#[tokio::test]
async fn update_course_changes_only_the_given_fields() {
  let s = store().await;
  let course = s
    .create_course(new_course("rust", &["ownership"]))
    .await
    .unwrap();

  s.update_course(course.id, CourseUpdate {
      name: Some("Rust".into()),
      color: Some("#b7410e".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  let fetched = s.course_by_key("rust", false).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Rust");
  assert_eq!(fetched.color, "#b7410e");
  assert_eq!(fetched.icon, course.icon);
  assert_eq!(fetched.video_id, course.video_id);
}

#[tokio::test]
async fn replacing_the_roadmap_recomputes_progress() {
  let s = store().await;
  let course = s
    .create_course(new_course("rust", &["a", "b", "c", "d"]))
    .await
    .unwrap();
  let user = s.create_user(new_user("alice")).await.unwrap();
  s.enroll(user.id, course.id).await.unwrap();

  let p = s
    .set_completed_steps(user.id, course.id, vec![0, 1, 2])
    .await
    .unwrap();
  assert_eq!(p.progress_percentage, 75);

  // Shrinking to two steps drops index 2 and leaves 2/2 complete.
  s.update_course(course.id, CourseUpdate {
      roadmap: Some(vec!["a".into(), "b".into()]),
      ..Default::default()
    })
    .await
    .unwrap();
  let p = s.progress(user.id, course.id).await.unwrap().unwrap();
  assert_eq!(p.progress_percentage, 100);
  assert!(p.is_completed);
  assert_eq!(s.completed_steps(user.id, course.id).await.unwrap(), vec![0, 1]);

  // Growing to eight steps dilutes the same two completions to 25%.
  let titles = ["a", "b", "c", "d", "e", "f", "g", "h"];
  s.update_course(course.id, CourseUpdate {
      roadmap: Some(titles.iter().map(|t| t.to_string()).collect()),
      ..Default::default()
    })
    .await
    .unwrap();
  let p = s.progress(user.id, course.id).await.unwrap().unwrap();
  assert_eq!(p.progress_percentage, 25);
  assert!(!p.is_completed);
}

#[tokio::test]
async fn delete_course_cascades_enrollments() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;
  s.enroll(user.id, html).await.unwrap();

  s.delete_course(html).await.unwrap();

  assert!(s.course_by_key("html", false).await.unwrap().is_none());
  assert!(s.get_enrollment(user.id, html).await.unwrap().is_none());
  assert!(s.progress(user.id, html).await.unwrap().is_none());
}

#[tokio::test]
async fn course_stats_sorts_by_enrollment() {
  let s = seeded().await;
  let alice = s.create_user(new_user("alice")).await.unwrap();
  let bob = s.create_user(new_user("bob")).await.unwrap();

  let html = course_id(&s, "html").await;
  let css = course_id(&s, "css").await;
  s.enroll(alice.id, html).await.unwrap();
  s.enroll(bob.id, html).await.unwrap();
  s.enroll(alice.id, css).await.unwrap();
  s.set_completed_steps(alice.id, html, (0..7).collect())
    .await
    .unwrap();

  let stats = s.course_stats().await.unwrap();
  assert_eq!(stats.len(), DEFAULT_CATALOG.len());
  assert_eq!(stats[0].lang_key, "html");
  assert_eq!(stats[0].enrolled_users, 2);
  assert_eq!(stats[0].completed_users, 1);
  assert_eq!(stats[0].total_steps, 7);
  assert!((stats[0].avg_progress - 50.0).abs() < 1e-6);

  let idle = stats.iter().find(|c| c.lang_key == "python").unwrap();
  assert_eq!(idle.enrolled_users, 0);
  assert!((idle.avg_progress - 0.0).abs() < 1e-6);
}

// ─── Enrollment & progress ───────────────────────────────────────────────────

#[tokio::test]
async fn enroll_is_idempotent() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;

  s.enroll(user.id, html).await.unwrap();
  s.enroll(user.id, html).await.unwrap();

  assert!(s.get_enrollment(user.id, html).await.unwrap().is_some());
  let p = s.progress(user.id, html).await.unwrap().unwrap();
  assert_eq!(p.progress_percentage, 0);
  assert_eq!(s.library(user.id, true).await.unwrap().len(), 1);
}

#[tokio::test]
async fn enroll_unknown_course_is_rejected() {
  let s = store().await;
  let user = s.create_user(new_user("alice")).await.unwrap();

  let err = s.enroll(user.id, 9999).await.unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));
}

#[tokio::test]
async fn failed_enroll_leaves_no_partial_rows() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;

  // With the progress table gone the second insert fails; the whole
  // transaction must roll back, including the enrollment row.
  s.execute_raw("DROP TABLE progress").await.unwrap();
  assert!(s.enroll(user.id, html).await.is_err());

  assert!(s.get_enrollment(user.id, html).await.unwrap().is_none());
}

#[tokio::test]
async fn completed_steps_drive_the_percentage() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;
  s.enroll(user.id, html).await.unwrap();

  // 3 of 7 steps.
  let p = s
    .set_completed_steps(user.id, html, vec![0, 1, 2])
    .await
    .unwrap();
  assert_eq!(p.progress_percentage, 43);
  assert!(!p.is_completed);
  assert_eq!(s.completed_steps(user.id, html).await.unwrap(), vec![0, 1, 2]);

  // All 7.
  let p = s
    .set_completed_steps(user.id, html, (0..7).collect())
    .await
    .unwrap();
  assert_eq!(p.progress_percentage, 100);
  assert!(p.is_completed);

  // Unchecking everything goes back to zero.
  let p = s.set_completed_steps(user.id, html, vec![]).await.unwrap();
  assert_eq!(p.progress_percentage, 0);
  assert!(!p.is_completed);
  assert!(s.completed_steps(user.id, html).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_step_indices_collapse() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;
  s.enroll(user.id, html).await.unwrap();

  let p = s
    .set_completed_steps(user.id, html, vec![1, 1, 2])
    .await
    .unwrap();
  assert_eq!(p.progress_percentage, 29);
  assert_eq!(s.completed_steps(user.id, html).await.unwrap(), vec![1, 2]);
}

#[tokio::test]
async fn out_of_range_step_is_rejected() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;
  s.enroll(user.id, html).await.unwrap();

  let err = s
    .set_completed_steps(user.id, html, vec![7])
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(fastlearn_core::Error::StepOutOfRange { index: 7, total: 7 })
  ));

  let err = s
    .set_completed_steps(user.id, html, vec![-1])
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(fastlearn_core::Error::StepOutOfRange { index: -1, .. })
  ));
}

#[tokio::test]
async fn steps_without_enrollment_roll_back() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;

  let err = s
    .set_completed_steps(user.id, html, vec![0, 1])
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(fastlearn_core::Error::NotEnrolled { .. })
  ));

  // The step writes from the failed call must not stick.
  assert!(s.completed_steps(user.id, html).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_roadmap_counts_as_zero_percent() {
  let s = store().await;
  let course = s.create_course(new_course("scratch", &[])).await.unwrap();
  let user = s.create_user(new_user("alice")).await.unwrap();
  s.enroll(user.id, course.id).await.unwrap();

  let p = s
    .set_completed_steps(user.id, course.id, vec![])
    .await
    .unwrap();
  assert_eq!(p.progress_percentage, 0);
  assert!(!p.is_completed);
}

#[tokio::test]
async fn unenroll_wipes_progress_notes_and_steps() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;

  s.enroll(user.id, html).await.unwrap();
  s.set_completed_steps(user.id, html, vec![0, 1]).await.unwrap();
  s.upsert_note(user.id, html, "flexbox notes").await.unwrap();

  s.unenroll(user.id, html).await.unwrap();

  assert!(s.get_enrollment(user.id, html).await.unwrap().is_none());
  assert!(s.progress(user.id, html).await.unwrap().is_none());
  assert!(s.note(user.id, html).await.unwrap().is_none());
  assert!(s.completed_steps(user.id, html).await.unwrap().is_empty());

  // Re-enrolling starts from scratch.
  s.enroll(user.id, html).await.unwrap();
  let p = s.progress(user.id, html).await.unwrap().unwrap();
  assert_eq!(p.progress_percentage, 0);
}

// ─── Library views ───────────────────────────────────────────────────────────

#[tokio::test]
async fn library_lists_newest_first() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;
  let css = course_id(&s, "css").await;

  s.enroll(user.id, html).await.unwrap();
  s.enroll(user.id, css).await.unwrap();

  let library = s.library(user.id, true).await.unwrap();
  assert_eq!(library.len(), 2);
  assert_eq!(library[0].course.lang_key, "css");
  assert_eq!(library[1].course.lang_key, "html");
  assert!(library[0].completed_at.is_none());
}

#[tokio::test]
async fn library_can_hide_deactivated_courses() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;
  let css = course_id(&s, "css").await;
  s.enroll(user.id, html).await.unwrap();
  s.enroll(user.id, css).await.unwrap();

  s.execute_raw("UPDATE courses SET is_active = 0 WHERE lang_key = 'css'")
    .await
    .unwrap();

  assert_eq!(s.library(user.id, true).await.unwrap().len(), 1);
  assert_eq!(s.library(user.id, false).await.unwrap().len(), 2);
}

#[tokio::test]
async fn library_stats_average_all_enrollments() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;
  let css = course_id(&s, "css").await;
  let js = course_id(&s, "javascript").await;

  s.enroll(user.id, html).await.unwrap();
  s.enroll(user.id, css).await.unwrap();
  s.enroll(user.id, js).await.unwrap();
  s.set_completed_steps(user.id, html, (0..7).collect())
    .await
    .unwrap();
  s.set_completed_steps(user.id, css, vec![0, 1]).await.unwrap();

  let stats = s.library_stats(user.id).await.unwrap();
  assert_eq!(stats.total_courses, 3);
  assert_eq!(stats.completed_courses, 1);
  assert_eq!(stats.in_progress_courses, 1);
  // (100 + 25 + 0) / 3, rounded to two decimals.
  assert!((stats.average_progress - 41.67).abs() < 1e-6);
}

#[tokio::test]
async fn completed_and_in_progress_views_partition_the_library() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;
  let css = course_id(&s, "css").await;
  let js = course_id(&s, "javascript").await;

  s.enroll(user.id, html).await.unwrap();
  s.enroll(user.id, css).await.unwrap();
  s.enroll(user.id, js).await.unwrap();
  s.set_completed_steps(user.id, html, (0..7).collect())
    .await
    .unwrap();
  s.set_completed_steps(user.id, css, vec![0, 1]).await.unwrap();

  let completed = s.completed_courses(user.id).await.unwrap();
  assert_eq!(completed.len(), 1);
  assert_eq!(completed[0].course.lang_key, "html");
  assert!(completed[0].is_completed);
  assert!(completed[0].completed_at.is_some());

  let in_progress = s.in_progress_courses(user.id).await.unwrap();
  assert_eq!(in_progress.len(), 1);
  assert_eq!(in_progress[0].course.lang_key, "css");
  assert_eq!(in_progress[0].progress_percentage, 25);
}

// ─── Notes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn note_upsert_keeps_a_single_row() {
  let s = seeded().await;
  let user = s.create_user(new_user("alice")).await.unwrap();
  let html = course_id(&s, "html").await;
  s.enroll(user.id, html).await.unwrap();

  assert!(s.note(user.id, html).await.unwrap().is_none());

  let first = s.upsert_note(user.id, html, "first draft").await.unwrap();
  assert_eq!(first.note_text, "first draft");
  assert_eq!(first.created_at, first.updated_at);

  let second = s.upsert_note(user.id, html, "second draft").await.unwrap();
  assert_eq!(second.note_text, "second draft");
  assert_eq!(second.created_at, first.created_at);
  assert!(second.updated_at > first.updated_at);

  let fetched = s.note(user.id, html).await.unwrap().unwrap();
  assert_eq!(fetched.note_text, "second draft");
}

// ─── Activity log ────────────────────────────────────────────────────────────

#[tokio::test]
async fn activity_log_joins_usernames_and_honors_the_limit() {
  let s = store().await;
  let alice = s.create_user(new_user("alice")).await.unwrap();
  let bob = s.create_user(new_user("bob")).await.unwrap();

  for act in [action::REGISTER, action::LOGIN, action::LOGOUT] {
    s.log_activity(NewActivity {
        user_id:    alice.id,
        action:     act,
        details:    None,
        ip_address: Some("203.0.113.7".into()),
      })
      .await
      .unwrap();
  }

  let recent = s.recent_activity(2).await.unwrap();
  assert_eq!(recent.len(), 2);
  assert_eq!(recent[0].action, action::LOGOUT);
  assert_eq!(recent[0].username.as_deref(), Some("alice"));
  assert_eq!(recent[0].ip_address.as_deref(), Some("203.0.113.7"));

  assert_eq!(s.user_activity(alice.id, 10).await.unwrap().len(), 3);
  assert!(s.user_activity(bob.id, 10).await.unwrap().is_empty());
}

// ─── Dashboard & export ──────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_stats_aggregate_the_whole_store() {
  let s = seeded().await;
  let alice = s.create_user(new_user("alice")).await.unwrap();
  let bob = s.create_user(new_user("bob")).await.unwrap();

  let html = course_id(&s, "html").await;
  let css = course_id(&s, "css").await;
  s.enroll(alice.id, html).await.unwrap();
  s.enroll(alice.id, css).await.unwrap();
  s.enroll(bob.id, html).await.unwrap();
  s.set_completed_steps(alice.id, html, (0..7).collect())
    .await
    .unwrap();

  for user in [alice.id, bob.id] {
    s.log_activity(NewActivity {
        user_id:    user,
        action:     action::LOGIN,
        details:    None,
        ip_address: None,
      })
      .await
      .unwrap();
  }

  let stats = s.dashboard_stats().await.unwrap();
  assert_eq!(stats.total_users, 2);
  assert_eq!(stats.total_courses, DEFAULT_CATALOG.len() as i64);
  assert_eq!(stats.total_enrollments, 3);
  assert_eq!(stats.recent_activity, 2);
  // (100 + 0 + 0) / 3, rounded to two decimals.
  assert!((stats.avg_completion_rate - 33.33).abs() < 1e-6);
}

#[tokio::test]
async fn export_listings_cover_every_row() {
  let s = seeded().await;
  let alice = s.create_user(new_user("alice")).await.unwrap();
  let bob = s.create_user(new_user("bob")).await.unwrap();

  let html = course_id(&s, "html").await;
  let css = course_id(&s, "css").await;
  s.enroll(alice.id, html).await.unwrap();
  s.enroll(alice.id, css).await.unwrap();
  s.enroll(bob.id, html).await.unwrap();
  s.set_completed_steps(alice.id, css, vec![0]).await.unwrap();

  let enrollments = s.list_enrollments().await.unwrap();
  assert_eq!(enrollments.len(), 3);

  let progress = s.list_progress().await.unwrap();
  assert_eq!(progress.len(), 3);
  let row = progress
    .iter()
    .find(|p| p.user_id == alice.id && p.course_id == css)
    .unwrap();
  assert_eq!(row.progress_percentage, 13);
}
