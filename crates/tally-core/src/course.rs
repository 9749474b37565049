//! Course records.
//!
//! A course exists once per normalized code. It is created by the first
//! review submitted for that code and afterwards only its aggregate changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{aggregate::Aggregate, code::CourseCode};

/// Professor recorded for courses created from a review submission.
pub const UNKNOWN_PROFESSOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
  pub course_id:    Uuid,
  pub code:         CourseCode,
  pub name:         String,
  pub professor:    String,
  pub semester:     String,
  pub avg_rating:   f64,
  pub review_count: u32,
  pub created_at:   DateTime<Utc>,
  /// Bumped by every aggregate write; conditional writes are keyed on it.
  #[serde(skip)]
  pub version:      u64,
  /// Set only on the placeholder from [`Course::demo`].
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub is_demo:      bool,
}

impl Course {
  pub fn aggregate(&self) -> Aggregate {
    Aggregate {
      avg_rating:   self.avg_rating,
      review_count: self.review_count,
    }
  }

  /// The synthetic course listed when the store has none.
  pub fn demo() -> Self {
    Self {
      course_id:    Uuid::nil(),
      code:         CourseCode::from_normalized("ABC 1234"),
      name:         "Sample Course (Demo)".to_owned(),
      professor:    "Sample Instructor".to_owned(),
      semester:     "Fall 2024".to_owned(),
      avg_rating:   4.6,
      review_count: 12,
      created_at:   DateTime::<Utc>::UNIX_EPOCH,
      version:      0,
      is_demo:      true,
    }
  }

  /// Case-insensitive substring match on code or name, as used by the list
  /// view's search box. An empty term matches everything.
  pub fn matches(&self, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty()
      || self.code.as_str().to_lowercase().contains(&term)
      || self.name.to_lowercase().contains(&term)
  }
}

/// Input to [`crate::store::DirectoryStore::insert_course`].
/// The store assigns `course_id`, `created_at` and the initial version.
#[derive(Debug, Clone)]
pub struct NewCourse {
  pub code:      CourseCode,
  pub name:      String,
  pub professor: String,
  pub semester:  String,
  pub aggregate: Aggregate,
}
