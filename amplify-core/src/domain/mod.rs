//! Core domain types
//!
//! These types mirror the records returned by the build API. They are never
//! mutated after being fetched.

pub mod job;
pub mod step;
pub mod time;

/// Replace path separators so a value can be used as a single path component
pub(crate) fn path_safe(value: &str) -> String {
    value.replace(['/', '\\'], "_")
}
