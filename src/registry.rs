//! # Allergen Registry
//!
//! Owns the user's selected allergens in insertion order. The registry is a
//! plain data owner: it knows nothing about storage or presentation. Anything
//! that needs to react to a change (persistence, a UI) registers a listener
//! with [`AllergenRegistry::subscribe`] and receives the full list after every
//! effective mutation.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::allergen::AllergenTerm;
use crate::catalog;

/// Callback invoked with the new allergen list after each change
pub type ChangeListener = Box<dyn Fn(&[AllergenTerm]) + Send + Sync>;

/// What [`AllergenRegistry::toggle_builtin`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The allergen was not selected and has been added
    Added,
    /// The allergen was selected and has been removed
    Removed,
    /// The name was blank; nothing changed
    Ignored,
}

/// The user's selected allergens
#[derive(Default)]
pub struct AllergenRegistry {
    allergens: Vec<AllergenTerm>,
    listeners: Vec<ChangeListener>,
}

impl fmt::Debug for AllergenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllergenRegistry")
            .field("allergens", &self.allergens)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl AllergenRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a registry from a previously persisted list
    ///
    /// Entries with a blank name, a name already seen (case-insensitive) or an
    /// id already seen are dropped so the registry invariants hold even for
    /// hand-edited data.
    pub fn from_allergens(allergens: Vec<AllergenTerm>) -> Self {
        let mut registry = Self::new();
        for allergen in allergens {
            if allergen.name.trim().is_empty()
                || registry.is_selected(&allergen.name)
                || registry.allergens.iter().any(|kept| kept.id == allergen.id)
            {
                debug!(
                    name = %allergen.name,
                    allergen_id = %allergen.id,
                    "Dropping invalid or duplicate stored allergen"
                );
                continue;
            }
            registry.allergens.push(allergen);
        }
        registry
    }

    /// Register a listener called after every effective mutation
    ///
    /// Listeners run synchronously on the mutating thread. When the registry
    /// sits behind a [`SharedRegistry`] the write lock is held during the
    /// call, so listeners must only use the slice they are given.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&[AllergenTerm]) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Selected allergens in insertion order
    pub fn allergens(&self) -> &[AllergenTerm] {
        &self.allergens
    }

    /// Owned copy of the current list, for handing to the matcher
    pub fn snapshot(&self) -> Vec<AllergenTerm> {
        self.allergens.clone()
    }

    pub fn len(&self) -> usize {
        self.allergens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allergens.is_empty()
    }

    /// Case-insensitive membership test on the display name
    pub fn is_selected(&self, name: &str) -> bool {
        self.allergens.iter().any(|allergen| allergen.has_name(name))
    }

    /// Select or deselect a builtin allergen
    ///
    /// Removes the allergen if one with that name (case-insensitive) is
    /// present, otherwise adds it under its catalog name with the catalog
    /// synonyms. A name outside the catalog is added as given, without synonyms.
    pub fn toggle_builtin(&mut self, name: &str) -> ToggleOutcome {
        let name = name.trim();
        if name.is_empty() {
            return ToggleOutcome::Ignored;
        }

        if self.is_selected(name) {
            self.allergens.retain(|allergen| !allergen.has_name(name));
            info!(name = %name, "Builtin allergen deselected");
            self.notify();
            return ToggleOutcome::Removed;
        }

        let name = catalog::canonical_name(name).unwrap_or(name);
        let synonyms = catalog::synonyms_for(name).unwrap_or_default();
        debug!(name = %name, synonym_count = synonyms.len(), "Builtin allergen selected");
        self.allergens.push(AllergenTerm::new(name, false, synonyms));
        self.notify();
        ToggleOutcome::Added
    }

    /// Add a user-defined allergen without synonyms
    ///
    /// The name is trimmed. Returns `false` and leaves the list untouched when
    /// the name is blank or already selected (case-insensitive).
    pub fn add_custom(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            debug!("Ignoring blank custom allergen");
            return false;
        }
        if self.is_selected(name) {
            debug!(name = %name, "Ignoring duplicate custom allergen");
            return false;
        }

        self.allergens.push(AllergenTerm::custom(name));
        info!(name = %name, "Custom allergen added");
        self.notify();
        true
    }

    /// Remove an allergen by identity; returns whether anything was removed
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.allergens.len();
        self.allergens.retain(|allergen| allergen.id != id);
        let removed = self.allergens.len() != before;

        if removed {
            info!(allergen_id = %id, "Allergen removed");
            self.notify();
        }
        removed
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.allergens);
        }
    }
}

/// Thread-safe handle on a registry shared between a mutating front end and
/// scanning workers
///
/// Scanners take a [`snapshot`](SharedRegistry::snapshot) per scan, so a
/// mutation never races with a running match.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<AllergenRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: AllergenRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Copy of the current allergen list
    pub fn snapshot(&self) -> Vec<AllergenTerm> {
        self.inner.read().snapshot()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.inner.read().is_selected(name)
    }

    pub fn toggle_builtin(&self, name: &str) -> ToggleOutcome {
        self.inner.write().toggle_builtin(name)
    }

    pub fn add_custom(&self, name: &str) -> bool {
        self.inner.write().add_custom(name)
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.inner.write().remove(id)
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&[AllergenTerm]) + Send + Sync + 'static,
    {
        self.inner.write().subscribe(listener);
    }
}
