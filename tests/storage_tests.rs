//! # Allergen Storage Tests
//!
//! File-backed persistence of the selected allergen list.

mod test_helpers;

use std::fs;
use std::sync::Arc;

use allergen_scanner::errors::AppError;
use allergen_scanner::registry::AllergenRegistry;
use allergen_scanner::storage::{
    decode_allergens, encode_allergens, load_or_empty, persist_on_change, AllergenStore,
    JsonFileStore,
};
use tempfile::tempdir;
use test_helpers::{allergen, custom, sample_registry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_list() {
        let allergens = vec![
            allergen("milk", &["dairy", "whey", "casein"]),
            custom("Kiwi"),
            allergen("sesame", &[]),
        ];

        let decoded = decode_allergens(&encode_allergens(&allergens).unwrap()).unwrap();
        assert_eq!(decoded, allergens);
    }

    #[test]
    fn test_persisted_shape() {
        let allergens = vec![allergen("peanut", &["groundnut"])];
        let json: serde_json::Value =
            serde_json::from_str(&encode_allergens(&allergens).unwrap()).unwrap();

        let record = &json.as_array().unwrap()[0];
        let mut keys: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["id", "isCustom", "name", "synonyms"]);
        assert_eq!(record["id"], allergens[0].id.to_string());
    }

    #[test]
    fn test_decode_ignores_key_order() {
        let json = r#"[{"synonyms":["dairy"],"isCustom":false,"name":"milk","id":"0b6c1a52-0d8e-4f7c-9a3e-3d1f5c2b7e90"}]"#;
        let decoded = decode_allergens(json).unwrap();
        assert_eq!(decoded[0].name, "milk");
        assert!(decoded[0].synonyms.contains("dairy"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("allergens.json"));
        let allergens = sample_registry().snapshot();

        store.save(&allergens).unwrap();
        assert_eq!(store.load().unwrap(), allergens);
    }

    #[test]
    fn test_missing_file_is_empty_list() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nothing-here.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("allergens.json");
        fs::write(&path, "[{\"name\": ").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(AppError::Serialization(_))));
        assert!(load_or_empty(&store).is_empty());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("allergens.json");
        let store = JsonFileStore::new(&path);

        store.save(&[custom("Kiwi")]).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_registry_changes_survive_restart() {
        let dir = tempdir().unwrap();
        let store: Arc<dyn AllergenStore> =
            Arc::new(JsonFileStore::new(dir.path().join("allergens.json")));

        let mut registry = AllergenRegistry::from_allergens(load_or_empty(store.as_ref()));
        registry.subscribe(persist_on_change(Arc::clone(&store)));
        registry.toggle_builtin("milk");
        registry.add_custom("Kiwi");
        let expected = registry.snapshot();
        drop(registry);

        let restored = AllergenRegistry::from_allergens(load_or_empty(store.as_ref()));
        assert_eq!(restored.snapshot(), expected);
        assert!(restored.is_selected("kiwi"));
    }
}
