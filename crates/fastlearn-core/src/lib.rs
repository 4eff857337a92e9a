//! Core types and trait definitions for the FastLearn course tracker.
//!
//! This crate owns the domain model (users, courses, roadmaps, progress,
//! notes, the activity log) and the [`store::LearnStore`] trait that the
//! storage backends implement. It knows nothing about HTTP or SQL.

// Suppress the advisory lint about `Send` bounds on trait futures.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod catalog;
pub mod course;
pub mod error;
pub mod note;
pub mod progress;
pub mod stats;
pub mod store;
pub mod user;

pub use error::{Error, Result};
