//! # Test Helper Library
//!
//! Common fixtures shared by the integration tests.

#![allow(dead_code)]

use allergen_scanner::allergen::{AllergenTerm, MatchResult, MatchType};
use allergen_scanner::registry::AllergenRegistry;

/// Build a catalog-style allergen with the given synonyms
pub fn allergen(name: &str, synonyms: &[&str]) -> AllergenTerm {
    AllergenTerm::new(name, false, synonyms.iter().copied())
}

/// Build a user-added allergen without synonyms
pub fn custom(name: &str) -> AllergenTerm {
    AllergenTerm::custom(name)
}

pub fn exact(name: &str) -> MatchResult {
    MatchResult::new(name, MatchType::Exact)
}

pub fn fuzzy(name: &str) -> MatchResult {
    MatchResult::new(name, MatchType::Fuzzy)
}

/// Registry pre-filled with a few builtin allergens and one custom one
pub fn sample_registry() -> AllergenRegistry {
    let mut registry = AllergenRegistry::new();
    registry.toggle_builtin("milk");
    registry.toggle_builtin("peanut");
    registry.toggle_builtin("sesame");
    registry.add_custom("Kiwi");
    registry
}

/// Display names of a registry, in order
pub fn names(registry: &AllergenRegistry) -> Vec<String> {
    registry
        .allergens()
        .iter()
        .map(|allergen| allergen.name.clone())
        .collect()
}
