//! Running average rating maintenance.
//!
//! A course stores its mean rating and review count rather than recomputing
//! them from the review collection on every read. The average is rounded to
//! one decimal place after every update, so it can drift slightly from the
//! exact mean; [`Aggregate::from_ratings`] recomputes it from scratch.

use serde::{Deserialize, Serialize};

use crate::review::Rating;

/// The `(avg_rating, review_count)` pair stored on a course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
  pub avg_rating:   f64,
  pub review_count: u32,
}

impl Aggregate {
  /// The aggregate of a course whose only review has `rating`.
  pub fn first(rating: Rating) -> Self {
    Self {
      avg_rating:   f64::from(rating.get()),
      review_count: 1,
    }
  }

  /// Fold one more rating into the running average.
  pub fn with_review(self, rating: Rating) -> Self {
    let count = u64::from(self.review_count);
    let total = self.avg_rating * count as f64 + f64::from(rating.get());
    Self {
      avg_rating:   round1(total / (count + 1) as f64),
      review_count: self.review_count.saturating_add(1),
    }
  }

  /// Recompute from every rating of a course. `None` if there are none.
  pub fn from_ratings<I>(ratings: I) -> Option<Self>
  where
    I: IntoIterator<Item = Rating>,
  {
    let (sum, count) = ratings
      .into_iter()
      .fold((0u64, 0u32), |(sum, count), r| {
        (sum + u64::from(r.get()), count + 1)
      });
    (count > 0).then(|| Self {
      avg_rating:   round1(sum as f64 / f64::from(count)),
      review_count: count,
    })
  }
}

/// Round to one decimal place.
pub fn round1(x: f64) -> f64 { (x * 10.0).round() / 10.0 }

#[cfg(test)]
mod tests {
  use super::*;

  fn r(n: u8) -> Rating { Rating::new(n).unwrap() }

  #[test]
  fn first_review_sets_average_to_rating() {
    let agg = Aggregate::first(r(3));
    assert_eq!(agg.review_count, 1);
    assert_eq!(agg.avg_rating, 3.0);
  }

  #[test]
  fn incremental_update_rounds_to_one_decimal() {
    let agg = Aggregate { avg_rating: 4.0, review_count: 2 }.with_review(r(5));
    assert_eq!(agg.review_count, 3);
    assert_eq!(agg.avg_rating, 4.3);
  }

  #[test]
  fn incremental_update_from_empty_course() {
    let agg = Aggregate { avg_rating: 0.0, review_count: 0 }.with_review(r(2));
    assert_eq!(agg, Aggregate { avg_rating: 2.0, review_count: 1 });
  }

  #[test]
  fn average_stays_within_rating_bounds() {
    let mut agg = Aggregate::first(r(1));
    for n in [5, 5, 5, 1, 3, 2, 4, 5, 5] {
      agg = agg.with_review(r(n));
      assert!((1.0..=5.0).contains(&agg.avg_rating), "{agg:?}");
    }
    assert_eq!(agg.review_count, 10);
  }

  #[test]
  fn recompute_from_ratings() {
    assert_eq!(Aggregate::from_ratings(std::iter::empty()), None);
    let agg = Aggregate::from_ratings([r(4), r(4), r(5)]).unwrap();
    assert_eq!(agg, Aggregate { avg_rating: 4.3, review_count: 3 });
  }

  #[test]
  fn round1_behaviour() {
    assert_eq!(round1(4.333_333), 4.3);
    assert_eq!(round1(4.36), 4.4);
    assert_eq!(round1(5.0), 5.0);
  }
}
