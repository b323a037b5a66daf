//! Total order of index records for an InnoDB-style B-tree.
//!
//! Compares search tuples against physical records and records against each
//! other, field by field, the way the storage engine sorts them on disk.

pub mod cmp;
pub mod collation;
pub mod constant;
pub mod dict;
pub mod dtype;
pub mod error;
pub mod handler;
mod opts;
pub mod primitive;
pub mod record;
pub mod tuple;

pub use cmp::Comparator;
pub use opts::{Opts, StatsMethod};
