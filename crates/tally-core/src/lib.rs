//! Core types and services for the Tally course review directory.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::DirectoryStore`]; everything above them goes
//! through [`directory::Directory`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod code;
pub mod course;
pub mod directory;
pub mod error;
pub mod review;
pub mod store;

pub use error::{Error, Result};
