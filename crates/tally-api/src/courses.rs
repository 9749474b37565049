//! Handlers for `/courses` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/courses` | Optional `?search=`; demo placeholder when empty |
//! | `GET`  | `/courses/{id}` | Course plus its reviews, newest first |
//! | `POST` | `/courses/{id}/reconcile` | Recompute the aggregate from reviews |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use tally_core::{
  course::Course,
  directory::{CourseDetail, Directory},
  store::DirectoryStore,
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Case-insensitive substring of the code or name.
  pub search: Option<String>,
}

/// `GET /courses[?search=<term>]`
///
/// Never fails: an unreachable store lists as empty.
pub async fn list<S>(
  State(directory): State<Arc<Directory<S>>>,
  Query(params): Query<ListParams>,
) -> Json<Vec<Course>>
where
  S: DirectoryStore,
{
  let courses = match params.search.as_deref() {
    Some(term) => directory.search_courses(term).await,
    None => directory.list_courses().await,
  };
  Json(courses)
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /courses/{id}`
pub async fn get_one<S>(
  State(directory): State<Arc<Directory<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<CourseDetail>, ApiError>
where
  S: DirectoryStore,
{
  Ok(Json(directory.course_detail(id).await?))
}

// ─── Reconcile ────────────────────────────────────────────────────────────────

/// `POST /courses/{id}/reconcile`: returns the course with its recomputed
/// aggregate.
pub async fn reconcile<S>(
  State(directory): State<Arc<Directory<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Course>, ApiError>
where
  S: DirectoryStore,
{
  Ok(Json(directory.reconcile_course(id).await?))
}
