//! Core of hausdir: task files and building reference data.
//!
//! - `task` reads a directory of .ics task files, decodes the checklist kept
//!   in each DESCRIPTION and writes single subtask changes back
//! - `dataset` loads buildings, units and tenants and resolves free-text
//!   unit labels against them
//!
//! The two are independent; a frontend joins a task's area label to a
//! resolved area.

pub mod config;
pub mod dataset;
pub mod error;
pub mod ics;
pub mod task;

pub use error::{HausdirError, HausdirResult};
