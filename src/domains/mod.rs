//! Domains module containing business logic organized by bounded contexts.
//!
//! - `catalog` holds the read-only reference data
//! - `tools` holds the executable tools and the machinery that runs them

pub mod catalog;
pub mod tools;
