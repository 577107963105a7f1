//! # Allergen Data Model
//!
//! Records shared by the registry, the matcher and the storage boundary.
//! The serialized form is the persisted shape:
//!
//! ```json
//! [{ "id": "8f0c…", "name": "Peanut", "isCustom": false, "synonyms": ["groundnut"] }]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// A user-tracked allergen: display name plus synonyms to watch for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergenTerm {
    /// Opaque unique identity
    pub id: Uuid,
    /// Display name as entered or selected by the user
    pub name: String,
    /// `true` for user-added terms, `false` for catalog terms
    pub is_custom: bool,
    /// Alternative spellings and ingredient names; order is irrelevant
    #[serde(default)]
    pub synonyms: BTreeSet<String>,
}

impl AllergenTerm {
    /// Create a term with a fresh identity
    pub fn new<I, S>(name: impl Into<String>, is_custom: bool, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_custom,
            synonyms: synonyms.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a user-added term without synonyms
    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(name, true, std::iter::empty::<String>())
    }

    /// Case-insensitive comparison of the display name
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// How an allergen was found in the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Direct, substring or plural-insensitive equality
    Exact,
    /// Within the edit-distance threshold
    Fuzzy,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected allergen for one scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Display name of the allergen that matched
    pub allergen_name: String,
    /// Kind of evidence found
    pub match_type: MatchType,
}

impl MatchResult {
    pub fn new(allergen_name: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            allergen_name: allergen_name.into(),
            match_type,
        }
    }
}
