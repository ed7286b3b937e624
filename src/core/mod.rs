//! Transcript model and the computations over it

pub mod aggregate;
pub mod config;
pub mod edit;
pub mod error;
pub mod grading;
pub mod import;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod rounding;

/// Returns the current version of the crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
