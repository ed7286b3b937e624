//! GPA and credit aggregation for student academic transcripts
//!
//! The [`core`](crate::core) module holds the transcript model, normalization,
//! grade valuation, aggregation, edit operations and roster import. The CLI in
//! `src/cli` is a thin layer over it.

pub mod core;
pub mod logger;

pub use crate::core::{config, get_version};
