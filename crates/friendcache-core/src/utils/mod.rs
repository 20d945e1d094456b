//! Utility functions for string formatting.

pub mod format;

pub use format::{fit_column, format_date, format_tags, truncate_string};
