//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup, after any migration gated on
//! `PRAGMA user_version`.

/// Schema version written by [`SCHEMA`].
pub const SCHEMA_VERSION: i64 = 2;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per normalized course code.
CREATE TABLE IF NOT EXISTS courses (
    course_id     TEXT PRIMARY KEY,
    code          TEXT NOT NULL UNIQUE,  -- normalized course code
    name          TEXT NOT NULL,
    professor     TEXT NOT NULL DEFAULT 'Unknown',
    semester      TEXT NOT NULL,
    avg_rating    REAL NOT NULL DEFAULT 0,
    review_count  INTEGER NOT NULL DEFAULT 0 CHECK (review_count >= 0),
    created_at    TEXT NOT NULL,         -- ISO 8601 UTC; server-assigned
    version       INTEGER NOT NULL DEFAULT 0  -- bumped by every aggregate write
);

-- Reviews reference courses by code value, not by key.
-- Only helpful_count is ever updated.
CREATE TABLE IF NOT EXISTS reviews (
    review_id     TEXT PRIMARY KEY,
    course_code   TEXT NOT NULL,
    course_name   TEXT NOT NULL DEFAULT '',
    rating        INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    workload      TEXT NOT NULL,         -- 'light' | 'medium' | 'heavy'
    difficulty    TEXT NOT NULL,         -- 'easy' | 'medium' | 'hard'
    comment       TEXT NOT NULL,
    semester      TEXT NOT NULL,
    created_at    TEXT,                  -- ISO 8601 UTC; NULL if unknown
    helpful_count INTEGER NOT NULL DEFAULT 0 CHECK (helpful_count >= 0)
);

CREATE INDEX IF NOT EXISTS courses_rating_idx ON courses(avg_rating DESC);

PRAGMA user_version = 2;
";

/// Version 1 databases predate the `courses.version` column.
pub const MIGRATE_V1_TO_V2: &str = "
ALTER TABLE courses ADD COLUMN version INTEGER NOT NULL DEFAULT 0;
";
