//! Handlers for `/reviews` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reviews` | `?course_code` required; newest first |
//! | `POST` | `/reviews` | Body: [`ReviewSubmission`]; returns 201 + course and review |
//! | `POST` | `/reviews/{id}/helpful` | Returns the new helpful count |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tally_core::{
  code::CourseCode,
  directory::Directory,
  review::{Review, ReviewSubmission},
  store::DirectoryStore,
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Raw course code; normalized before matching.
  pub course_code: String,
}

/// `GET /reviews?course_code=<code>`
pub async fn list<S>(
  State(directory): State<Arc<Directory<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Review>>, ApiError>
where
  S: DirectoryStore,
{
  let code = CourseCode::parse(&params.course_code)?;
  Ok(Json(directory.list_reviews_for_course(&code).await))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /reviews`: returns 201 + the updated course and the stored review.
pub async fn create<S>(
  State(directory): State<Arc<Directory<S>>>,
  Json(body): Json<ReviewSubmission>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let recorded = directory.record_review(body).await?;
  tracing::info!(
    code = %recorded.course.code,
    review_id = %recorded.review.review_id,
    "review submitted"
  );
  Ok((StatusCode::CREATED, Json(recorded)))
}

// ─── Helpful ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HelpfulResponse {
  pub review_id:     Uuid,
  pub helpful_count: u32,
}

/// `POST /reviews/{id}/helpful`
pub async fn mark_helpful<S>(
  State(directory): State<Arc<Directory<S>>>,
  Path(review_id): Path<Uuid>,
) -> Result<Json<HelpfulResponse>, ApiError>
where
  S: DirectoryStore,
{
  let helpful_count = directory.mark_helpful(review_id).await?;
  Ok(Json(HelpfulResponse { review_id, helpful_count }))
}
