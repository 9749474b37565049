//! Error types for `tally-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("course code {0:?} is empty after normalization")]
  InvalidCourseCode(String),

  #[error("review comment is empty")]
  EmptyComment,

  #[error("review comment is {0} characters; the limit is {max}", max = crate::review::MAX_COMMENT_CHARS)]
  CommentTooLong(usize),

  #[error("rating must be between 1 and 5, got {0}")]
  InvalidRating(u8),

  #[error("course not found: {0}")]
  CourseNotFound(Uuid),

  #[error("review not found: {0}")]
  ReviewNotFound(Uuid),

  /// The conditional aggregate write kept losing to concurrent submissions.
  #[error("course {code} is being updated concurrently; gave up after {attempts} attempts")]
  Contention { code: String, attempts: u32 },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  /// Whether this error was raised before any store call was attempted.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::InvalidCourseCode(_)
        | Self::EmptyComment
        | Self::CommentTooLong(_)
        | Self::InvalidRating(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
