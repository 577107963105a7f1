//! # Text Processing Module
//!
//! Canonicalizes recognized label text and allergen terms before they are
//! compared by the matcher.
//!
//! ## Features
//!
//! - Lowercasing and removal of `-` / `_` so "Soy-Bean" and "soy_bean" both become "soybean"
//! - Tokenization on any run of non-alphanumeric characters (whitespace, punctuation, symbols)
//! - Unicode aware: letters and digits from any script are kept

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

lazy_static! {
    // Any run of characters that is neither a letter nor a digit separates tokens
    static ref TOKEN_SEPARATOR: Regex =
        Regex::new(r"[^\p{Alphabetic}\p{N}]+").expect("Token separator regex should be valid");
}

/// Canonicalize text for comparison.
///
/// Lowercases every character and strips hyphens and underscores. All other
/// characters are left in place for [`tokenize`] to deal with. The function is
/// total and idempotent.
///
/// # Examples
///
/// ```rust
/// use allergen_scanner::text_processing::normalize;
///
/// assert_eq!(normalize("Soy-Bean"), "soybean");
/// assert_eq!(normalize("soy_bean"), "soybean");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect()
}

/// Split normalized text into alphanumeric tokens.
///
/// Every character that is not a letter or digit acts as a separator and empty
/// fragments are discarded. Tokens come back in left-to-right order.
///
/// Combining marks are separators too, so decomposed text such as
/// `"cre\u{300}me"` splits into `"cre"` and `"me"`. Producers should hand over
/// precomposed (NFC) text; most OCR engines already do.
///
/// # Examples
///
/// ```rust
/// use allergen_scanner::text_processing::{normalize, tokenize};
///
/// let tokens = tokenize(&normalize("Contains: DAIRY-FREE milk, eggs."));
/// assert_eq!(tokens, vec!["contains", "dairyfree", "milk", "eggs"]);
/// ```
pub fn tokenize(normalized_text: &str) -> Vec<String> {
    let tokens: Vec<String> = TOKEN_SEPARATOR
        .split(normalized_text)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect();

    trace!(token_count = tokens.len(), "Tokenized scan text");
    tokens
}
