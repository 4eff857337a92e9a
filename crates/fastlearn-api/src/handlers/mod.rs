pub mod admin;
pub mod auth;
pub mod courses;
pub mod library;
