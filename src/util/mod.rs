//! Utility functions shared across the crate.
//!
//! This module provides common utilities for:
//! - Color conversion and classification
//! - String formatting

use std::sync::OnceLock;

use regex::Regex;

pub mod color;
pub mod format;

pub use color::{hex_to_rgb, is_light_color, rgb_to_hex};
pub use format::{camel_to_kebab, obfuscate, slugify, to_upper_first, to_upper_first_with, to_upper_title, FormatInput};

/// Compile a hard-coded pattern once and keep it in `cell`
pub(crate) fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("hard-coded pattern is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_regex_compiles_once() {
        static CELL: OnceLock<Regex> = OnceLock::new();
        let first = cached_regex(&CELL, r"^\d+$");
        // The pattern of a later call is ignored once the cell is filled
        let second = cached_regex(&CELL, r"^[a-z]+$");
        assert!(std::ptr::eq(first, second));
        assert!(second.is_match("123"));
    }
}
