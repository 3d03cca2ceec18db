//! Core types and trait definitions for surveyseed.
//!
//! No HTTP or LLM dependencies live here. This crate holds the
//! survey and answer artifact model, the storage abstraction the artifacts
//! live behind, identifier generation, and the join table that links local
//! surveys to the ids the survey application assigns them.

// Native `async fn` in traits; the store trait spells out its `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod answers;
pub mod artifact;
pub mod error;
pub mod ids;
pub mod join;
pub mod memory;
pub mod operator;
pub mod store;
pub mod survey;

pub use error::{Error, Result};
