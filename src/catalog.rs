//! # Builtin Allergen Catalog
//!
//! Fixed table of well-known allergens and the ingredient names that reveal
//! them on a label. Built once on first access and never mutated.

use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap};

// Keys must be lowercase and unique; the order here is the listing order.
// Synonyms are single words: the matcher compares terms against individual tokens.
const BUILTIN_ALLERGENS: &[(&str, &[&str])] = &[
    (
        "milk",
        &[
            "dairy", "lactose", "casein", "caseinate", "whey", "butter", "cream", "cheese",
            "ghee", "yogurt", "lactalbumin",
        ],
    ),
    ("egg", &["albumin", "ovalbumin", "lysozyme", "mayonnaise", "meringue", "yolk"]),
    ("peanut", &["groundnut", "arachis", "monkeynut"]),
    (
        "tree nuts",
        &[
            "almond", "hazelnut", "walnut", "cashew", "pecan", "pistachio", "macadamia",
            "praline", "marzipan", "gianduja",
        ],
    ),
    ("soy", &["soya", "soybean", "edamame", "tofu", "tempeh", "miso", "lecithin"]),
    (
        "wheat",
        &["flour", "semolina", "durum", "spelt", "farro", "bulgur", "couscous", "seitan"],
    ),
    ("gluten", &["wheat", "barley", "rye", "malt", "spelt", "triticale", "oats"]),
    ("fish", &["anchovy", "cod", "salmon", "tuna", "haddock", "pollock", "surimi"]),
    (
        "shellfish",
        &["shrimp", "prawn", "crab", "lobster", "crayfish", "langoustine", "krill"],
    ),
    ("molluscs", &["clam", "mussel", "oyster", "scallop", "squid", "octopus", "snail"]),
    ("sesame", &["tahini", "benne", "gingelly", "sesamol"]),
    ("mustard", &["moutarde", "senf"]),
    ("celery", &["celeriac", "celeri"]),
    ("lupin", &["lupine", "lupini"]),
    ("sulphites", &["sulfite", "metabisulphite", "metabisulfite", "e220", "e221", "e223"]),
];

lazy_static! {
    static ref CATALOG: HashMap<&'static str, &'static [&'static str]> =
        BUILTIN_ALLERGENS.iter().copied().collect();
}

/// Names of all builtin allergens, in catalog order
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_ALLERGENS.iter().map(|(name, _)| *name)
}

/// Synonyms registered for a builtin allergen (case-insensitive lookup)
///
/// Returns `None` when the name is not part of the catalog.
pub fn synonyms_for(name: &str) -> Option<BTreeSet<String>> {
    CATALOG
        .get(name.trim().to_lowercase().as_str())
        .map(|synonyms| synonyms.iter().map(|s| s.to_string()).collect())
}

/// The catalog key for a builtin allergen, whatever casing the caller used
pub fn canonical_name(name: &str) -> Option<&'static str> {
    CATALOG
        .get_key_value(name.trim().to_lowercase().as_str())
        .map(|(key, _)| *key)
}

/// Whether the name belongs to the builtin catalog
pub fn is_builtin(name: &str) -> bool {
    CATALOG.contains_key(name.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_name_uses_catalog_key() {
        assert_eq!(canonical_name("MILK"), Some("milk"));
        assert_eq!(canonical_name(" Tree Nuts "), Some("tree nuts"));
        assert_eq!(canonical_name("kiwi"), None);
    }

    #[test]
    fn test_keys_are_lowercase_and_unique() {
        let mut seen = HashSet::new();
        for name in builtin_names() {
            assert_eq!(name, name.to_lowercase(), "catalog key not lowercase: {}", name);
            assert!(seen.insert(name), "duplicate catalog key: {}", name);
        }
        assert_eq!(seen.len(), CATALOG.len());
    }

    #[test]
    fn test_synonym_lookup_is_case_insensitive() {
        let synonyms = synonyms_for("Milk").unwrap();
        assert!(synonyms.contains("dairy"));
        assert!(synonyms.contains("whey"));
        assert_eq!(synonyms_for(" PEANUT "), synonyms_for("peanut"));
    }

    #[test]
    fn test_unknown_name() {
        assert!(synonyms_for("kiwi").is_none());
        assert!(!is_builtin("kiwi"));
        assert!(is_builtin("Sesame"));
    }
}
