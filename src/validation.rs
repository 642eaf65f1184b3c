//! Validation of user input for new records and categories.

use std::sync::OnceLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::Error;

fn amount_pattern() -> &'static Regex {
    static AMOUNT_PATTERN: OnceLock<Regex> = OnceLock::new();

    AMOUNT_PATTERN.get_or_init(|| {
        Regex::new(r"^(0|[1-9]\d*)(\.\d{0,2})?$").expect("amount pattern is a valid regex")
    })
}

/// Parse an amount typed by the user.
///
/// Accepts non-negative numbers without leading zeros and with at most two
/// decimal places, e.g. "0", "12", "12." and "12.50".
///
/// # Errors
/// Returns [Error::InvalidAmount] for anything else.
pub fn validate_amount(text: &str) -> Result<f64, Error> {
    let text = text.trim();

    if !amount_pattern().is_match(text) {
        return Err(Error::InvalidAmount(text.to_owned()));
    }

    text.parse()
        .map_err(|_| Error::InvalidAmount(text.to_owned()))
}

/// Trim a category name and check that something is left.
///
/// # Errors
/// Returns [Error::EmptyCategoryName] if the name is empty or only whitespace.
pub fn validate_category_name(text: &str) -> Result<String, Error> {
    let name = text.trim();

    if name.is_empty() {
        return Err(Error::EmptyCategoryName);
    }

    Ok(name.to_owned())
}

/// Check that `text` is a single emoji, or more precisely a single grapheme
/// cluster, so that "👍🏽" and "🇳🇿" are accepted.
///
/// # Errors
/// Returns [Error::InvalidEmoji] if `text` is empty or holds more than one
/// grapheme.
pub fn validate_emoji(text: &str) -> Result<String, Error> {
    let emoji = text.trim();

    if emoji.graphemes(true).count() != 1 {
        return Err(Error::InvalidEmoji(emoji.to_owned()));
    }

    Ok(emoji.to_owned())
}
