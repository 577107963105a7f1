//! # Allergen Matcher
//!
//! Decides which of the user's allergens appear in a piece of recognized
//! label text.
//!
//! ## Algorithm Overview
//!
//! ```text
//! words = tokenize(normalize(scan_text))             (once per call)
//! for each allergen, in list order:
//!   terms = normalize(name) ∪ normalize(synonyms)
//!   exact  if some term/word pair satisfies
//!            term == word | singular(term) == singular(word)
//!            | word contains term | word contains singular(term)
//!   else fuzzy if some term/word pair has
//!            levenshtein(term, word) <= threshold
//!            | levenshtein(singular(term), singular(word)) <= threshold
//!   else no result
//! ```
//!
//! `threshold = max(min_threshold, len(term) / threshold_divisor)`. Words that
//! are shorter than `min_word_length`, or whose length differs from the term by
//! more than the threshold, are skipped before any distance is computed.
//!
//! The matcher holds no mutable state; callers pass a snapshot of the
//! allergen list and get back at most one [`MatchResult`] per allergen, in the
//! same order as the input.

use std::time::Instant;

use tracing::{debug, trace};

use crate::allergen::{AllergenTerm, MatchResult, MatchType};
use crate::edit_distance::{fuzzy_threshold, levenshtein_distance};
use crate::errors::{AppError, AppResult};
use crate::morphology::singularize;
use crate::observability::record_scan_metrics;
use crate::text_processing::{normalize, tokenize};

/// Configuration options for allergen matching
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Whether approximate matches are reported at all
    pub enable_fuzzy_matching: bool,
    /// Term length is divided by this to get the allowed edit distance
    pub threshold_divisor: usize,
    /// Lower bound of the allowed edit distance
    pub min_threshold: usize,
    /// Scanned words shorter than this never fuzzy-match
    pub min_word_length: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            enable_fuzzy_matching: true,
            threshold_divisor: 4,
            min_threshold: 1,
            min_word_length: 3,
        }
    }
}

impl MatcherConfig {
    /// The looser rule set: `len / 3` with a floor of 2
    pub fn lenient() -> Self {
        Self {
            threshold_divisor: 3,
            min_threshold: 2,
            ..Self::default()
        }
    }

    /// Validate matcher configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if self.threshold_divisor == 0 {
            return Err(AppError::Config(
                "threshold_divisor must be greater than 0".to_string(),
            ));
        }

        if self.min_threshold > 5 {
            return Err(AppError::Config(
                "min_threshold cannot be greater than 5".to_string(),
            ));
        }

        if self.min_word_length == 0 {
            return Err(AppError::Config(
                "min_word_length must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// A scanned word with its precomputed singular form
#[derive(Debug)]
struct ScannedWord {
    text: String,
    singular: String,
    length: usize,
}

impl ScannedWord {
    fn new(text: String) -> Self {
        let singular = singularize(&text);
        let length = text.chars().count();
        Self {
            text,
            singular,
            length,
        }
    }
}

/// A normalized allergen name or synonym
#[derive(Debug)]
struct SearchTerm {
    text: String,
    singular: String,
    length: usize,
}

impl SearchTerm {
    fn new(text: String) -> Self {
        let singular = singularize(&text);
        let length = text.chars().count();
        Self {
            text,
            singular,
            length,
        }
    }

    fn matches_exactly(&self, word: &ScannedWord) -> bool {
        self.text == word.text
            || self.singular == word.singular
            || word.text.contains(&self.text)
            || word.text.contains(&self.singular)
    }
}

/// Normalized name and synonyms of an allergen, name first, without duplicates
///
/// Terms without a single letter or digit are dropped: they can never equal a
/// token, and an empty term would be a substring of every word.
fn search_terms(allergen: &AllergenTerm) -> Vec<SearchTerm> {
    let mut seen: Vec<String> = Vec::with_capacity(allergen.synonyms.len() + 1);

    for raw in std::iter::once(&allergen.name).chain(allergen.synonyms.iter()) {
        let term = normalize(raw.trim());
        if !term.chars().any(char::is_alphanumeric) || seen.contains(&term) {
            continue;
        }
        seen.push(term);
    }

    seen.into_iter().map(SearchTerm::new).collect()
}

/// Allergen detection over recognized text
#[derive(Debug, Clone, Default)]
pub struct AllergenMatcher {
    config: MatcherConfig,
}

impl AllergenMatcher {
    /// Create a matcher with the default rule set (`len / 4`, floor 1)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with custom configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use allergen_scanner::matcher::{AllergenMatcher, MatcherConfig};
    ///
    /// let matcher = AllergenMatcher::with_config(MatcherConfig {
    ///     enable_fuzzy_matching: false,
    ///     ..Default::default()
    /// })?;
    /// assert!(!matcher.config().enable_fuzzy_matching);
    /// # Ok::<(), allergen_scanner::errors::AppError>(())
    /// ```
    pub fn with_config(config: MatcherConfig) -> AppResult<Self> {
        config.validate()?;
        debug!(
            fuzzy = config.enable_fuzzy_matching,
            divisor = config.threshold_divisor,
            min_threshold = config.min_threshold,
            "Creating AllergenMatcher with custom config"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Find the allergens present in `scan_text`
    ///
    /// Returns at most one result per allergen, in the order of `allergens`.
    /// An exact match always wins over a fuzzy one for the same allergen.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use allergen_scanner::allergen::{AllergenTerm, MatchType};
    /// use allergen_scanner::matcher::AllergenMatcher;
    ///
    /// let allergens = vec![
    ///     AllergenTerm::new("milk", false, ["dairy"]),
    ///     AllergenTerm::custom("almond"),
    /// ];
    /// let results = AllergenMatcher::new().find_allergens("DAIRY-FREE, almnd crumbs", &allergens);
    ///
    /// assert_eq!(results.len(), 2);
    /// assert_eq!(results[0].match_type, MatchType::Exact);
    /// assert_eq!(results[1].match_type, MatchType::Fuzzy);
    /// ```
    pub fn find_allergens(&self, scan_text: &str, allergens: &[AllergenTerm]) -> Vec<MatchResult> {
        let start_time = Instant::now();

        let words: Vec<ScannedWord> = tokenize(&normalize(scan_text))
            .into_iter()
            .map(ScannedWord::new)
            .collect();

        debug!(
            word_count = words.len(),
            allergen_count = allergens.len(),
            "Scanning text for allergens"
        );

        let results: Vec<MatchResult> = allergens
            .iter()
            .filter_map(|allergen| {
                self.match_allergen(allergen, &words)
                    .map(|match_type| MatchResult::new(allergen.name.clone(), match_type))
            })
            .collect();

        let duration = start_time.elapsed();
        record_scan_metrics(duration, &results);

        debug!(
            match_count = results.len(),
            duration_us = duration.as_micros() as u64,
            "Allergen scan completed"
        );
        results
    }

    /// Strongest evidence for one allergen, if any
    fn match_allergen(&self, allergen: &AllergenTerm, words: &[ScannedWord]) -> Option<MatchType> {
        let terms = search_terms(allergen);

        for term in &terms {
            if let Some(word) = words.iter().find(|word| term.matches_exactly(word)) {
                trace!(
                    allergen = %allergen.name,
                    term = %term.text,
                    word = %word.text,
                    "Exact allergen match"
                );
                return Some(MatchType::Exact);
            }
        }

        if !self.config.enable_fuzzy_matching {
            return None;
        }

        for term in &terms {
            if let Some(word) = self.find_fuzzy_word(term, words) {
                trace!(
                    allergen = %allergen.name,
                    term = %term.text,
                    word = %word.text,
                    "Fuzzy allergen match"
                );
                return Some(MatchType::Fuzzy);
            }
        }

        None
    }

    fn find_fuzzy_word<'w>(
        &self,
        term: &SearchTerm,
        words: &'w [ScannedWord],
    ) -> Option<&'w ScannedWord> {
        let threshold = fuzzy_threshold(
            term.length,
            self.config.threshold_divisor,
            self.config.min_threshold,
        );

        words.iter().find(|word| {
            // Cheap length checks before the quadratic distance computation
            if word.length < self.config.min_word_length
                || term.length.abs_diff(word.length) > threshold
            {
                return false;
            }

            levenshtein_distance(&term.text, &word.text) <= threshold
                || levenshtein_distance(&term.singular, &word.singular) <= threshold
        })
    }
}

/// Find allergens with the default matcher configuration
pub fn find_allergens(scan_text: &str, allergens: &[AllergenTerm]) -> Vec<MatchResult> {
    AllergenMatcher::new().find_allergens(scan_text, allergens)
}
