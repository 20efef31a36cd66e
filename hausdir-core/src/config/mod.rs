//! Configuration types for hausdir.

mod global;
mod modifier;

pub use global::HausdirConfig;
pub use modifier::{Modifier, StatusSymbols};
