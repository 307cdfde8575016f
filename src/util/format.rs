//! String formatting helpers.
//!
//! Case conversion, slugs and email obfuscation. Every helper accepts any
//! [`FormatInput`], so loosely typed values (JSON, numbers) can be passed
//! straight through and are rejected with [`Error::NotAString`] unless they
//! actually hold text.

use std::sync::OnceLock;

use regex::Regex;

use super::cached_regex;
use crate::error::{Error, Result};

/// A value that may or may not carry text
pub trait FormatInput {
    /// The text, or None when the value is not a string
    fn as_text(&self) -> Option<&str>;
}

impl FormatInput for str {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl FormatInput for String {
    fn as_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: FormatInput + ?Sized> FormatInput for &T {
    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

impl FormatInput for serde_json::Value {
    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }
}

macro_rules! not_text {
    ($($t:ty),*) => {
        $(
            impl FormatInput for $t {
                fn as_text(&self) -> Option<&str> {
                    None
                }
            }
        )*
    };
}

not_text!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

fn word_separators() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"[\s_+]+")
}

fn camel_boundary() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"([a-z\d])([A-Z])")
}

fn email_shape() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
}

fn dash_runs() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"-{2,}")
}

fn text_of<T: FormatInput + ?Sized>(input: &T) -> Result<&str> {
    input.as_text().ok_or(Error::NotAString)
}

fn upper_first_char(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Dash-separated text with its first letter upper-cased.
///
/// # Examples
/// ```
/// use utilkit::util::format::to_upper_first;
/// assert_eq!(to_upper_first("hello world").unwrap(), "Hello-world");
/// ```
pub fn to_upper_first<T: FormatInput + ?Sized>(input: &T) -> Result<String> {
    to_upper_first_with(input, true)
}

/// Like [`to_upper_first`]; with `with_spacing == false` words stay
/// separated by single spaces instead of dashes.
pub fn to_upper_first_with<T: FormatInput + ?Sized>(input: &T, with_spacing: bool) -> Result<String> {
    let text = text_of(input)?;
    let separator = if with_spacing { "-" } else { " " };

    let normalized = word_separators()
        .replace_all(text, separator)
        .replace('/', "-")
        .replace('.', "");

    Ok(upper_first_char(&normalized))
}

/// camelCase to kebab-case; whitespace becomes `-`, underscores are kept
pub fn camel_to_kebab<T: FormatInput + ?Sized>(input: &T) -> Result<String> {
    let text = text_of(input)?;

    Ok(camel_boundary()
        .replace_all(text, "${1}-${2}")
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect())
}

/// Mask the local part of an email address.
///
/// The first two characters are kept; shorter local parts are masked entirely.
pub fn obfuscate<T: FormatInput + ?Sized>(input: &T) -> Result<String> {
    let email = text_of(input)?;
    if !email_shape().is_match(email) {
        return Err(Error::InvalidEmail);
    }

    let at = email.find('@').ok_or(Error::InvalidEmail)?;
    let (local, domain) = email.split_at(at);
    let local_len = local.chars().count();

    let visible = if local_len < 3 { 0 } else { 2 };
    let mut masked: String = local.chars().take(visible).collect();
    masked.push_str(&"*".repeat(local_len - visible));
    masked.push_str(domain);

    Ok(masked)
}

/// Title Case: non-letters are word breaks, each word capitalized
pub fn to_upper_title<T: FormatInput + ?Sized>(input: &T) -> Result<String> {
    let text = text_of(input)?;
    if text.trim().is_empty() {
        return Err(Error::NotAString);
    }

    let words: Vec<String> = text
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .map(|word| upper_first_char(&word.to_lowercase()))
        .collect();

    Ok(words.join(" "))
}

/// URL slug: punctuation to dashes, quotes and dots dropped, lower-cased
pub fn slugify<T: FormatInput + ?Sized>(input: &T) -> Result<String> {
    let text = text_of(input)?;

    let dashed: String = text
        .chars()
        .filter_map(|c| match c {
            '.' | '\'' | '"' => None,
            '%' | '#' | '?' | ',' | '/' | '\\' | '+' | '*' | '^' | '@' | ';' | ':' | '!' | '&'
            | '$' | '(' | ')' => Some('-'),
            c if c.is_whitespace() => Some('-'),
            c => Some(c),
        })
        .collect();

    Ok(dash_runs()
        .replace_all(&dashed, "-")
        .trim_matches('-')
        .to_lowercase())
}
