//! [`Directory`] — the course directory service.
//!
//! Owns an injected [`DirectoryStore`] handle and implements the business
//! rules on top of it: course creation on first review, running-average
//! maintenance, the demo fallback, review lookup by course and helpful votes.

use std::cmp::Reverse;

use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  aggregate::Aggregate,
  code::CourseCode,
  course::{Course, NewCourse, UNKNOWN_PROFESSOR},
  review::{Review, ReviewSubmission},
  store::DirectoryStore,
};

// ─── Options ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DirectoryOptions {
  /// How many read-compute-write rounds an aggregate update may take before
  /// giving up with [`Error::Contention`].
  pub max_update_retries: u32,
  /// List [`Course::demo`] when the store has no courses.
  pub demo_fallback:      bool,
}

impl Default for DirectoryOptions {
  fn default() -> Self {
    Self {
      max_update_retries: 5,
      demo_fallback:      true,
    }
  }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// The outcome of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedReview {
  /// The course after the review was folded into its aggregate.
  pub course: Course,
  pub review: Review,
}

/// A course with its reviews, most recent first.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
  pub course:  Course,
  pub reviews: Vec<Review>,
}

// ─── Directory ───────────────────────────────────────────────────────────────

pub struct Directory<S> {
  store:   S,
  options: DirectoryOptions,
}

impl<S: DirectoryStore> Directory<S> {
  pub fn new(store: S, options: DirectoryOptions) -> Self { Self { store, options } }

  pub fn store(&self) -> &S { &self.store }

  pub fn options(&self) -> &DirectoryOptions { &self.options }

  // ── Submission ────────────────────────────────────────────────────────

  /// Validate a submission, then store the review and fold its rating into
  /// the course aggregate (creating the course if this is its first review).
  ///
  /// Validation failures are returned before the store is touched. The
  /// review and the aggregate are written in one conditional store call
  /// keyed on the course version, so a failed submission leaves nothing
  /// behind and can be retried as is.
  pub async fn record_review(&self, submission: ReviewSubmission) -> Result<RecordedReview> {
    let input = submission.validate()?;
    let attempts = self.options.max_update_retries.max(1);

    for attempt in 1..=attempts {
      let existing = self
        .store
        .find_course(input.course_code.clone())
        .await
        .map_err(Error::store)?;

      match existing {
        None => {
          let new_course = NewCourse {
            code:      input.course_code.clone(),
            name:      input.course_name.clone(),
            professor: UNKNOWN_PROFESSOR.to_owned(),
            semester:  input.semester.clone(),
            aggregate: Aggregate::first(input.rating),
          };
          let created = self
            .store
            .insert_course(new_course, input.clone())
            .await
            .map_err(Error::store)?;
          if let Some((course, review)) = created {
            info!(code = %course.code, course_id = %course.course_id, "created course");
            return Ok(RecordedReview { course, review });
          }
          debug!(code = %input.course_code, attempt, "course created concurrently, retrying");
        }
        Some(mut course) => {
          let updated = course.aggregate().with_review(input.rating);
          let appended = self
            .store
            .append_review(course.course_id, course.version, updated, input.clone())
            .await
            .map_err(Error::store)?;
          if let Some(review) = appended {
            course.avg_rating = updated.avg_rating;
            course.review_count = updated.review_count;
            course.version += 1;
            return Ok(RecordedReview { course, review });
          }
          debug!(code = %course.code, attempt, "aggregate changed underneath us, retrying");
        }
      }
    }

    warn!(code = %input.course_code, attempts, "giving up on contended aggregate update");
    Err(Error::Contention {
      code: input.course_code.to_string(),
      attempts,
    })
  }

  // ── Courses ───────────────────────────────────────────────────────────

  /// All courses, best rated first. Store failures are logged and treated as
  /// an empty store; an empty store yields the demo placeholder unless that
  /// is disabled.
  pub async fn list_courses(&self) -> Vec<Course> {
    let courses = match self.store.list_courses().await {
      Ok(courses) => courses,
      Err(e) => {
        error!(error = %e, "failed to load courses");
        Vec::new()
      }
    };

    if courses.is_empty() && self.options.demo_fallback {
      return vec![Course::demo()];
    }
    courses
  }

  /// [`Directory::list_courses`] narrowed by [`Course::matches`].
  pub async fn search_courses(&self, term: &str) -> Vec<Course> {
    let mut courses = self.list_courses().await;
    courses.retain(|c| c.matches(term));
    courses
  }

  /// A course and its reviews. The nil id resolves to the demo placeholder
  /// while the demo fallback is enabled.
  pub async fn course_detail(&self, course_id: Uuid) -> Result<CourseDetail> {
    let course = if course_id.is_nil() && self.options.demo_fallback {
      Course::demo()
    } else {
      self
        .store
        .get_course(course_id)
        .await
        .map_err(Error::store)?
        .ok_or(Error::CourseNotFound(course_id))?
    };

    let reviews = self.list_reviews_for_course(&course.code).await;
    Ok(CourseDetail { course, reviews })
  }

  /// Recompute a course's aggregate from its stored reviews and write it
  /// back. Repairs rounding drift and the effects of historical lost updates.
  ///
  /// The write is conditional on the version read before the review scan;
  /// any submission landing in between bumps it and forces a rescan.
  pub async fn reconcile_course(&self, course_id: Uuid) -> Result<Course> {
    let attempts = self.options.max_update_retries.max(1);

    for attempt in 1..=attempts {
      let mut course = self
        .store
        .get_course(course_id)
        .await
        .map_err(Error::store)?
        .ok_or(Error::CourseNotFound(course_id))?;

      let ratings = self.reviews_for(&course.code).await?.into_iter().map(|r| r.rating);
      let recomputed = Aggregate::from_ratings(ratings).unwrap_or(Aggregate {
        avg_rating:   0.0,
        review_count: 0,
      });

      if recomputed == course.aggregate() {
        return Ok(course);
      }

      let written = self
        .store
        .swap_aggregate(course_id, course.version, recomputed)
        .await
        .map_err(Error::store)?;
      if written {
        info!(
          code = %course.code,
          old_avg = course.avg_rating,
          old_count = course.review_count,
          new_avg = recomputed.avg_rating,
          new_count = recomputed.review_count,
          "reconciled course aggregate"
        );
        course.avg_rating = recomputed.avg_rating;
        course.review_count = recomputed.review_count;
        course.version += 1;
        return Ok(course);
      }
      debug!(code = %course.code, attempt, "aggregate changed during reconcile, retrying");
    }

    Err(Error::Contention {
      code: course_id.to_string(),
      attempts,
    })
  }

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Reviews of one course, most recent first; reviews without a readable
  /// timestamp come last. Store failures are logged and yield no reviews.
  ///
  /// Scans the whole review collection on every call.
  pub async fn list_reviews_for_course(&self, code: &CourseCode) -> Vec<Review> {
    self.reviews_for(code).await.unwrap_or_else(|e| {
      error!(error = %e, code = %code, "failed to load reviews");
      Vec::new()
    })
  }

  async fn reviews_for(&self, code: &CourseCode) -> Result<Vec<Review>> {
    let mut reviews: Vec<Review> = self
      .store
      .list_reviews()
      .await
      .map_err(Error::store)?
      .into_iter()
      .filter(|r| code.matches_raw(&r.course_code))
      .collect();
    reviews.sort_by_key(|r| Reverse(r.recency()));
    Ok(reviews)
  }

  /// Add one helpful vote and return the new count.
  pub async fn mark_helpful(&self, review_id: Uuid) -> Result<u32> {
    self
      .store
      .increment_helpful(review_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ReviewNotFound(review_id))
  }
}
