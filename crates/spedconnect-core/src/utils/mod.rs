//! Utility functions for formatting command output.

pub mod format;

pub use format::{format_optional, format_rating, page_count, truncate_string};
