//! Review types.
//!
//! Reviews are immutable once recorded, except for `helpful_count`, which the
//! store only ever increments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result, code::CourseCode};

/// Longest accepted review comment, in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Semester recorded when a submission does not name one.
pub const DEFAULT_SEMESTER: &str = "Fall 2024";

// ─── Rating ──────────────────────────────────────────────────────────────────

/// A star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
  pub const MAX: Rating = Rating(5);

  pub fn new(stars: u8) -> Result<Self> {
    if (1..=5).contains(&stars) {
      Ok(Self(stars))
    } else {
      Err(Error::InvalidRating(stars))
    }
  }

  pub fn get(self) -> u8 { self.0 }
}

impl Default for Rating {
  fn default() -> Self { Self::MAX }
}

impl TryFrom<u8> for Rating {
  type Error = Error;

  fn try_from(stars: u8) -> Result<Self> { Self::new(stars) }
}

impl From<Rating> for u8 {
  fn from(r: Rating) -> Self { r.0 }
}

// ─── Workload / difficulty ───────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
  Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Workload {
  #[serde(alias = "Light")]
  Light,
  #[default]
  #[serde(alias = "Medium")]
  Medium,
  #[serde(alias = "Heavy")]
  Heavy,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
  Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  #[serde(alias = "Easy")]
  Easy,
  #[default]
  #[serde(alias = "Medium")]
  Medium,
  #[serde(alias = "Hard")]
  Hard,
}

// ─── Review ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
  pub review_id:     Uuid,
  /// Normalized at write time; re-normalized when matched on read.
  pub course_code:   String,
  /// Copy of the course name as the reviewer typed it.
  pub course_name:   String,
  pub rating:        Rating,
  pub workload:      Workload,
  pub difficulty:    Difficulty,
  pub comment:       String,
  pub semester:      String,
  /// `None` when the stored timestamp is missing or unreadable.
  pub created_at:    Option<DateTime<Utc>>,
  pub helpful_count: u32,
}

impl Review {
  /// Sort key for "most recent first"; unknown timestamps count as the epoch.
  pub fn recency(&self) -> DateTime<Utc> {
    self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
  }
}

/// A validated review, ready to be stored. The store assigns the id, the
/// timestamp and a zero helpful count.
#[derive(Debug, Clone)]
pub struct NewReview {
  pub course_code: CourseCode,
  pub course_name: String,
  pub rating:      Rating,
  pub workload:    Workload,
  pub difficulty:  Difficulty,
  pub comment:     String,
  pub semester:    String,
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// Raw form input for [`crate::directory::Directory::record_review`].
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSubmission {
  pub course_code: String,
  #[serde(default)]
  pub course_name: String,
  #[serde(default = "default_semester")]
  pub semester:    String,
  #[serde(default)]
  pub rating:      Rating,
  #[serde(default)]
  pub workload:    Workload,
  #[serde(default)]
  pub difficulty:  Difficulty,
  pub comment:     String,
}

fn default_semester() -> String { DEFAULT_SEMESTER.to_owned() }

impl ReviewSubmission {
  /// A submission with every optional field at its default.
  pub fn new(course_code: impl Into<String>, comment: impl Into<String>) -> Self {
    Self {
      course_code: course_code.into(),
      course_name: String::new(),
      semester:    default_semester(),
      rating:      Rating::default(),
      workload:    Workload::default(),
      difficulty:  Difficulty::default(),
      comment:     comment.into(),
    }
  }

  /// Check the submission and turn it into a store record.
  pub fn validate(self) -> Result<NewReview> {
    let course_code = CourseCode::parse(&self.course_code)?;

    let comment = self.comment.trim();
    if comment.is_empty() {
      return Err(Error::EmptyComment);
    }
    let chars = comment.chars().count();
    if chars > MAX_COMMENT_CHARS {
      return Err(Error::CommentTooLong(chars));
    }

    let semester = match self.semester.trim() {
      "" => default_semester(),
      s => s.to_owned(),
    };

    Ok(NewReview {
      course_code,
      course_name: self.course_name.trim().to_owned(),
      rating: self.rating,
      workload: self.workload,
      difficulty: self.difficulty,
      comment: comment.to_owned(),
      semester,
    })
  }
}
