//! SQLite persistence for FastLearn.
//!
//! Implements [`fastlearn_core::store::LearnStore`] on top of
//! [`tokio_rusqlite`]: queries run on the connection's background thread,
//! so the async runtime never blocks on database work. Enrollment,
//! progress and roadmap mutations that span tables are wrapped in
//! transactions on that same connection.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
