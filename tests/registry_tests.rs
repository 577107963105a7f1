//! # Allergen Registry Tests

mod test_helpers;

use std::sync::{Arc, Mutex};

use allergen_scanner::registry::{AllergenRegistry, SharedRegistry, ToggleOutcome};
use allergen_scanner::storage::{persist_on_change, AllergenStore, MemoryStore};
use test_helpers::{names, sample_registry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_custom_ignores_blank_names() {
        let mut registry = sample_registry();
        let before = registry.snapshot();

        assert!(!registry.add_custom(""));
        assert!(!registry.add_custom("   "));
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_add_custom_is_case_insensitive() {
        let mut registry = AllergenRegistry::new();
        assert!(registry.add_custom("Kiwi"));
        assert!(!registry.add_custom("kiwi"));

        assert_eq!(names(&registry), vec!["Kiwi"]);
        assert!(registry.allergens()[0].is_custom);
        assert!(registry.allergens()[0].synonyms.is_empty());
    }

    #[test]
    fn test_add_custom_trims_name() {
        let mut registry = AllergenRegistry::new();
        registry.add_custom("  Mango \n");
        assert_eq!(names(&registry), vec!["Mango"]);
        assert!(registry.is_selected("MANGO"));
    }

    #[test]
    fn test_custom_name_blocks_builtin_of_same_name() {
        let mut registry = AllergenRegistry::new();
        registry.add_custom("Milk");
        // Toggling a name already present removes it, whoever added it
        assert_eq!(registry.toggle_builtin("milk"), ToggleOutcome::Removed);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let registry = sample_registry();
        assert_eq!(names(&registry), vec!["milk", "peanut", "sesame", "Kiwi"]);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut registry = sample_registry();
        let peanut_id = registry.allergens()[1].id;

        assert!(registry.remove(peanut_id));
        assert!(!registry.remove(peanut_id));
        assert_eq!(names(&registry), vec!["milk", "sesame", "Kiwi"]);
        assert!(!registry.is_selected("peanut"));
    }

    #[test]
    fn test_independent_subscribers_see_every_change() {
        let store = Arc::new(MemoryStore::new());
        let seen_by_ui: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));

        let mut registry = AllergenRegistry::new();
        registry.subscribe(persist_on_change(store.clone()));
        let ui = Arc::clone(&seen_by_ui);
        registry.subscribe(move |allergens| ui.lock().unwrap().push(allergens.len()));

        registry.toggle_builtin("egg");
        registry.add_custom("Kiwi");
        registry.toggle_builtin("egg");

        assert_eq!(*seen_by_ui.lock().unwrap(), vec![1, 2, 1]);
        let stored = store.load().unwrap();
        assert_eq!(stored, registry.snapshot());
        assert_eq!(stored[0].name, "Kiwi");
    }

    #[test]
    fn test_shared_registry_across_threads() {
        let shared = SharedRegistry::new(AllergenRegistry::new());

        let handles: Vec<_> = ["Kiwi", "Mango", "kiwi", "Papaya"]
            .into_iter()
            .map(|name| {
                let shared = shared.clone();
                std::thread::spawn(move || shared.add_custom(name))
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|accepted| *accepted)
            .count();

        assert_eq!(accepted, 3);
        assert_eq!(shared.snapshot().len(), 3);
    }
}
