//! Filesystem backend for surveyseed artifacts.
//!
//! Keys map onto paths below a root directory, so the artifacts are plain
//! JSON files a person can open, edit, or delete between runs.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::FsStore;
