//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings and
//! enums their lowercase names.

use chrono::{DateTime, Utc};
use tally_core::{
  code::CourseCode,
  course::Course,
  review::{Difficulty, Rating, Review, Workload},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Review timestamps may be missing or written by other clients; anything
/// unreadable becomes `None`.
pub fn decode_dt_lenient(s: Option<&str>) -> Option<DateTime<Utc>> {
  s.and_then(|s| decode_dt(s).ok())
}

// ─── Workload / Difficulty ───────────────────────────────────────────────────

pub fn decode_workload(s: &str) -> Result<Workload> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "workload",
    value:  s.to_owned(),
  })
}

pub fn decode_difficulty(s: &str) -> Result<Difficulty> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "difficulty",
    value:  s.to_owned(),
  })
}

// ─── Integers ────────────────────────────────────────────────────────────────

pub fn decode_count(column: &'static str, value: i64) -> Result<u32> {
  u32::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

pub fn encode_version(version: u64) -> Result<i64> {
  i64::try_from(version).map_err(|_| Error::VersionOverflow(version))
}

pub fn decode_version(value: i64) -> Result<u64> {
  u64::try_from(value).map_err(|_| Error::OutOfRange { column: "version", value })
}

pub fn decode_rating(value: i64) -> Result<Rating> {
  u8::try_from(value)
    .ok()
    .and_then(|n| Rating::new(n).ok())
    .ok_or(Error::OutOfRange { column: "rating", value })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `courses` row.
pub struct RawCourse {
  pub course_id:    String,
  pub code:         String,
  pub name:         String,
  pub professor:    String,
  pub semester:     String,
  pub avg_rating:   f64,
  pub review_count: i64,
  pub created_at:   String,
  pub version:      i64,
}

impl RawCourse {
  pub const COLUMNS: &'static str =
    "course_id, code, name, professor, semester, avg_rating, review_count, created_at, version";

  pub fn from_course(course: &Course) -> Result<Self> {
    Ok(Self {
      course_id:    encode_uuid(course.course_id),
      code:         course.code.to_string(),
      name:         course.name.clone(),
      professor:    course.professor.clone(),
      semester:     course.semester.clone(),
      avg_rating:   course.avg_rating,
      review_count: i64::from(course.review_count),
      created_at:   encode_dt(course.created_at),
      version:      encode_version(course.version)?,
    })
  }

  /// Insert unless the code is taken; returns whether a row was written.
  pub fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<bool> {
    let changed = conn.execute(
      "INSERT INTO courses (
         course_id, code, name, professor, semester,
         avg_rating, review_count, created_at, version
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
       ON CONFLICT (code) DO NOTHING",
      rusqlite::params![
        self.course_id,
        self.code,
        self.name,
        self.professor,
        self.semester,
        self.avg_rating,
        self.review_count,
        self.created_at,
        self.version,
      ],
    )?;
    Ok(changed == 1)
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      course_id:    row.get(0)?,
      code:         row.get(1)?,
      name:         row.get(2)?,
      professor:    row.get(3)?,
      semester:     row.get(4)?,
      avg_rating:   row.get(5)?,
      review_count: row.get(6)?,
      created_at:   row.get(7)?,
      version:      row.get(8)?,
    })
  }

  pub fn into_course(self) -> Result<Course> {
    Ok(Course {
      course_id:    decode_uuid(&self.course_id)?,
      code:         CourseCode::parse(&self.code)?,
      name:         self.name,
      professor:    self.professor,
      semester:     self.semester,
      avg_rating:   self.avg_rating,
      review_count: decode_count("review_count", self.review_count)?,
      created_at:   decode_dt(&self.created_at)?,
      version:      decode_version(self.version)?,
      is_demo:      false,
    })
  }
}

/// Raw values read directly from a `reviews` row.
pub struct RawReview {
  pub review_id:     String,
  pub course_code:   String,
  pub course_name:   String,
  pub rating:        i64,
  pub workload:      String,
  pub difficulty:    String,
  pub comment:       String,
  pub semester:      String,
  pub created_at:    Option<String>,
  pub helpful_count: i64,
}

impl RawReview {
  pub const COLUMNS: &'static str = "review_id, course_code, course_name, rating, workload, \
                                     difficulty, comment, semester, created_at, helpful_count";

  pub fn from_review(review: &Review) -> Self {
    Self {
      review_id:     encode_uuid(review.review_id),
      course_code:   review.course_code.clone(),
      course_name:   review.course_name.clone(),
      rating:        i64::from(review.rating.get()),
      workload:      review.workload.as_ref().to_owned(),
      difficulty:    review.difficulty.as_ref().to_owned(),
      comment:       review.comment.clone(),
      semester:      review.semester.clone(),
      created_at:    review.created_at.map(encode_dt),
      helpful_count: i64::from(review.helpful_count),
    }
  }

  pub fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute(
      &format!(
        "INSERT INTO reviews ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        Self::COLUMNS
      ),
      rusqlite::params![
        self.review_id,
        self.course_code,
        self.course_name,
        self.rating,
        self.workload,
        self.difficulty,
        self.comment,
        self.semester,
        self.created_at,
        self.helpful_count,
      ],
    )?;
    Ok(())
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      review_id:     row.get(0)?,
      course_code:   row.get(1)?,
      course_name:   row.get(2)?,
      rating:        row.get(3)?,
      workload:      row.get(4)?,
      difficulty:    row.get(5)?,
      comment:       row.get(6)?,
      semester:      row.get(7)?,
      created_at:    row.get(8)?,
      helpful_count: row.get(9)?,
    })
  }

  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      review_id:     decode_uuid(&self.review_id)?,
      course_code:   self.course_code,
      course_name:   self.course_name,
      rating:        decode_rating(self.rating)?,
      workload:      decode_workload(&self.workload)?,
      difficulty:    decode_difficulty(&self.difficulty)?,
      comment:       self.comment,
      semester:      self.semester,
      created_at:    decode_dt_lenient(self.created_at.as_deref()),
      helpful_count: decode_count("helpful_count", self.helpful_count)?,
    })
  }
}
