//! JSON REST API for Tally.
//!
//! Exposes an axum [`Router`] backed by a [`Directory`] over any
//! [`tally_core::store::DirectoryStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tally_api::api_router(directory.clone()))
//! ```

pub mod courses;
pub mod error;
pub mod reviews;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tally_core::{directory::Directory, store::DirectoryStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `directory`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(directory: Arc<Directory<S>>) -> Router<()>
where
  S: DirectoryStore + 'static,
{
  Router::new()
    // Courses
    .route("/courses", get(courses::list::<S>))
    .route("/courses/{id}", get(courses::get_one::<S>))
    .route("/courses/{id}/reconcile", post(courses::reconcile::<S>))
    // Reviews
    .route("/reviews", get(reviews::list::<S>).post(reviews::create::<S>))
    .route("/reviews/{id}/helpful", post(reviews::mark_helpful::<S>))
    .with_state(directory)
}
