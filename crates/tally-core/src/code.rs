//! Course codes — the join key between courses and reviews.
//!
//! Every code that enters the system passes through [`CourseCode::normalize`],
//! whether it is being written (new course, new review), looked up, or read
//! back from a stored review. There is exactly one rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A normalized, non-empty course code such as `"CS 120"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode(String);

impl CourseCode {
  /// Canonicalize raw user input.
  ///
  /// Uppercases, drops anything that is not an ASCII letter, digit,
  /// whitespace, `*` or `-`, then treats runs of whitespace, `*` and `-` as a
  /// single space separator and trims. `"cs*120"`, `"CS-120"` and
  /// `" cs  120 "` all become `"CS 120"`. Input with nothing usable yields
  /// the empty string.
  pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for c in raw.chars().flat_map(char::to_uppercase) {
      if c.is_ascii_uppercase() || c.is_ascii_digit() {
        if pending_sep && !out.is_empty() {
          out.push(' ');
        }
        pending_sep = false;
        out.push(c);
      } else if c.is_whitespace() || c == '*' || c == '-' {
        pending_sep = true;
      }
    }

    out
  }

  /// Normalize `raw` and reject the empty result.
  pub fn parse(raw: &str) -> Result<Self> {
    let normalized = Self::normalize(raw);
    if normalized.is_empty() {
      return Err(Error::InvalidCourseCode(raw.to_owned()));
    }
    Ok(Self(normalized))
  }

  /// Wrap a string that is already in normalized form.
  pub(crate) fn from_normalized(s: &str) -> Self {
    debug_assert_eq!(Self::normalize(s), s);
    Self(s.to_owned())
  }

  /// Whether a stored (possibly un-normalized) code refers to this course.
  pub fn matches_raw(&self, raw: &str) -> bool { Self::normalize(raw) == self.0 }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CourseCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl TryFrom<String> for CourseCode {
  type Error = Error;

  fn try_from(raw: String) -> Result<Self> { Self::parse(&raw) }
}

impl From<CourseCode> for String {
  fn from(code: CourseCode) -> Self { code.0 }
}

impl AsRef<str> for CourseCode {
  fn as_ref(&self) -> &str { &self.0 }
}
