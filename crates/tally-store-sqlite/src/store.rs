//! [`SqliteStore`] — the SQLite implementation of [`DirectoryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::warn;
use uuid::Uuid;

use tally_core::{
  aggregate::Aggregate,
  code::CourseCode,
  course::{Course, NewCourse},
  review::{NewReview, Review},
  store::DirectoryStore,
};

use crate::{
  Result,
  encode::{RawCourse, RawReview, decode_count, encode_uuid, encode_version},
  schema::{MIGRATE_V1_TO_V2, SCHEMA, SCHEMA_VERSION},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A course directory backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        let current: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
        if (1..SCHEMA_VERSION).contains(&current) {
          conn.execute_batch(MIGRATE_V1_TO_V2)?;
        }
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run an aggregate `UPDATE` keyed on `course_id` (and, when given, the
  /// expected version) that also bumps the version.
  async fn write_aggregate(
    &self,
    id: Uuid,
    expected_version: Option<u64>,
    aggregate: Aggregate,
    review: Option<Review>,
  ) -> Result<bool> {
    let id_str = encode_uuid(id);
    let expected = expected_version.map(encode_version).transpose()?;
    let raw_review = review.as_ref().map(RawReview::from_review);

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE courses
           SET avg_rating = ?1, review_count = ?2, version = version + 1
           WHERE course_id = ?3 AND (?4 IS NULL OR version = ?4)",
          rusqlite::params![aggregate.avg_rating, aggregate.review_count, id_str, expected],
        )?;
        if changed != 1 {
          return Ok(false);
        }
        if let Some(raw) = &raw_review {
          raw.insert(&tx)?;
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(written)
  }

  async fn query_course(&self, column: &'static str, value: String) -> Result<Option<Course>> {
    let raw: Option<RawCourse> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM courses WHERE {column} = ?1", RawCourse::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawCourse::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCourse::into_course).transpose()
  }
}

/// A fresh review as the store records it.
fn new_review(input: NewReview) -> Review {
  Review {
    review_id:     Uuid::new_v4(),
    course_code:   input.course_code.into(),
    course_name:   input.course_name,
    rating:        input.rating,
    workload:      input.workload,
    difficulty:    input.difficulty,
    comment:       input.comment,
    semester:      input.semester,
    created_at:    Some(Utc::now()),
    helpful_count: 0,
  }
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = crate::Error;

  // ── Courses ───────────────────────────────────────────────────────────────

  async fn list_courses(&self) -> Result<Vec<Course>> {
    let raws: Vec<RawCourse> = self
      .conn
      .call(|conn| {
        let sql = format!(
          "SELECT {} FROM courses ORDER BY avg_rating DESC, code ASC",
          RawCourse::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawCourse::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .filter_map(|raw| {
          let id = raw.course_id.clone();
          raw
            .into_course()
            .inspect_err(|e| warn!(course_id = %id, error = %e, "skipping unreadable course row"))
            .ok()
        })
        .collect(),
    )
  }

  async fn find_course(&self, code: CourseCode) -> Result<Option<Course>> {
    self.query_course("code", code.into()).await
  }

  async fn get_course(&self, id: Uuid) -> Result<Option<Course>> {
    self.query_course("course_id", encode_uuid(id)).await
  }

  async fn insert_course(
    &self,
    input: NewCourse,
    first_review: NewReview,
  ) -> Result<Option<(Course, Review)>> {
    let course = Course {
      course_id:    Uuid::new_v4(),
      code:         input.code,
      name:         input.name,
      professor:    input.professor,
      semester:     input.semester,
      avg_rating:   input.aggregate.avg_rating,
      review_count: input.aggregate.review_count,
      created_at:   Utc::now(),
      version:      0,
      is_demo:      false,
    };
    let review = new_review(first_review);

    let raw_course = RawCourse::from_course(&course)?;
    let raw_review = RawReview::from_review(&review);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !raw_course.insert(&tx)? {
          return Ok(false);
        }
        raw_review.insert(&tx)?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some((course, review)))
  }

  async fn set_aggregate(&self, id: Uuid, aggregate: Aggregate) -> Result<bool> {
    self.write_aggregate(id, None, aggregate, None).await
  }

  async fn swap_aggregate(
    &self,
    id:               Uuid,
    expected_version: u64,
    aggregate:        Aggregate,
  ) -> Result<bool> {
    self
      .write_aggregate(id, Some(expected_version), aggregate, None)
      .await
  }

  async fn append_review(
    &self,
    id:               Uuid,
    expected_version: u64,
    aggregate:        Aggregate,
    input:            NewReview,
  ) -> Result<Option<Review>> {
    let review = new_review(input);
    let written = self
      .write_aggregate(id, Some(expected_version), aggregate, Some(review.clone()))
      .await?;
    Ok(written.then_some(review))
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn insert_review(&self, input: NewReview) -> Result<Review> {
    let review = new_review(input);
    let raw = RawReview::from_review(&review);

    self
      .conn
      .call(move |conn| {
        raw.insert(conn)?;
        Ok(())
      })
      .await?;

    Ok(review)
  }

  async fn list_reviews(&self) -> Result<Vec<Review>> {
    let raws: Vec<RawReview> = self
      .conn
      .call(|conn| {
        let sql = format!("SELECT {} FROM reviews", RawReview::COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawReview::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .filter_map(|raw| {
          let id = raw.review_id.clone();
          raw
            .into_review()
            .inspect_err(|e| warn!(review_id = %id, error = %e, "skipping unreadable review row"))
            .ok()
        })
        .collect(),
    )
  }

  async fn increment_helpful(&self, id: Uuid) -> Result<Option<u32>> {
    let id_str = encode_uuid(id);

    let count: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "UPDATE reviews SET helpful_count = helpful_count + 1
               WHERE review_id = ?1
               RETURNING helpful_count",
              rusqlite::params![id_str],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    count.map(|c| decode_count("helpful_count", c)).transpose()
  }
}
