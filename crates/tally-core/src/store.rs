//! The `DirectoryStore` trait.
//!
//! The trait models a small document store with two collections, `courses`
//! and `reviews`. It is implemented by storage backends (e.g.
//! `tally-store-sqlite`); [`crate::directory::Directory`] layers the business
//! rules on top and is the only thing higher layers call.

use std::future::Future;

use uuid::Uuid;

use crate::{
  aggregate::Aggregate,
  code::CourseCode,
  course::{Course, NewCourse},
  review::{NewReview, Review},
};

/// Abstraction over the document store backing the directory.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Courses ───────────────────────────────────────────────────────────

  /// Every course, highest average rating first (ties by code).
  fn list_courses(
    &self,
  ) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  /// Equality lookup on the normalized code.
  fn find_course(
    &self,
    code: CourseCode,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;

  fn get_course(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;

  /// Create a course together with its first review, atomically. Returns
  /// `None` without writing anything if a course with the same code already
  /// exists.
  fn insert_course(
    &self,
    course: NewCourse,
    first_review: NewReview,
  ) -> impl Future<Output = Result<Option<(Course, Review)>, Self::Error>> + Send + '_;

  /// Overwrite a course's aggregate unconditionally and bump its version.
  /// Returns `false` if the course does not exist.
  ///
  /// Using this for read-modify-write loses updates under concurrency;
  /// prefer [`DirectoryStore::append_review`].
  fn set_aggregate(
    &self,
    id: Uuid,
    aggregate: Aggregate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Overwrite a course's aggregate and bump its version, only if the
  /// version is still `expected_version`. Returns `false` if the condition
  /// failed or the course does not exist.
  fn swap_aggregate(
    &self,
    id: Uuid,
    expected_version: u64,
    aggregate: Aggregate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// [`DirectoryStore::swap_aggregate`] and a review insert as one atomic
  /// write: either both land or neither does. Returns `None` if the version
  /// condition failed or the course does not exist.
  fn append_review(
    &self,
    id: Uuid,
    expected_version: u64,
    aggregate: Aggregate,
    review: NewReview,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Store a review without touching any course aggregate, as an import
  /// would. The course count stays behind until it is reconciled.
  fn insert_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;

  /// The whole review collection, in no particular order.
  fn list_reviews(
    &self,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  /// Atomically add one to a review's helpful count and return the new
  /// value, or `None` if the review does not exist.
  fn increment_helpful(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<u32>, Self::Error>> + Send + '_;
}
