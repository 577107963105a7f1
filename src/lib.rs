//! # Allergen Scanner
//!
//! Detects a user's allergens in text recognized from ingredient labels,
//! telling exact mentions apart from approximate (OCR-garbled) ones.

pub mod allergen;
pub mod catalog;
pub mod config;
pub mod edit_distance;
pub mod errors;
pub mod matcher;
pub mod morphology;
pub mod observability;
pub mod observability_config;
pub mod registry;
pub mod scan_session;
pub mod storage;
pub mod text_processing;

// Re-export types for easier access
pub use allergen::{AllergenTerm, MatchResult, MatchType};
pub use matcher::{find_allergens, AllergenMatcher, MatcherConfig};
pub use registry::{AllergenRegistry, SharedRegistry};
