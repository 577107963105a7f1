//! # Allergen List Storage
//!
//! Persistence boundary for the registry. The stored form is a flat JSON array
//! of allergen records; see [`crate::allergen`] for the field names.
//!
//! Loading is best effort: [`load_or_empty`] turns a missing or unreadable
//! list into an empty one and logs a warning, so a corrupt file never keeps
//! the scanner from starting.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::allergen::AllergenTerm;
use crate::errors::error_logging::log_storage_error;
use crate::errors::{AppError, AppResult};

/// Somewhere the selected allergen list can be kept between sessions
pub trait AllergenStore: Send + Sync {
    /// Read the stored list; an absent list is an empty one
    fn load(&self) -> AppResult<Vec<AllergenTerm>>;

    /// Replace the stored list
    fn save(&self, allergens: &[AllergenTerm]) -> AppResult<()>;

    /// Human readable location, for logs
    fn describe(&self) -> String;
}

/// Encode an allergen list in its persisted JSON shape
pub fn encode_allergens(allergens: &[AllergenTerm]) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(allergens)?)
}

/// Decode an allergen list from its persisted JSON shape
pub fn decode_allergens(json: &str) -> AppResult<Vec<AllergenTerm>> {
    Ok(serde_json::from_str(json)?)
}

/// Allergen list stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AllergenStore for JsonFileStore {
    fn load(&self) -> AppResult<Vec<AllergenTerm>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored allergen list yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let allergens = decode_allergens(&content)?;
        info!(
            path = %self.path.display(),
            allergen_count = allergens.len(),
            "Loaded allergen list"
        );
        Ok(allergens)
    }

    fn save(&self, allergens: &[AllergenTerm]) -> AppResult<()> {
        let json = encode_allergens(allergens)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        // Write next to the target and rename, so readers never see a partial file
        let mut file = tempfile::NamedTempFile::new_in(&dir)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| {
            AppError::Storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e.error
            ))
        })?;

        debug!(
            path = %self.path.display(),
            allergen_count = allergens.len(),
            "Saved allergen list"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store keeping the encoded JSON, useful for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-encoded content as-is, valid or not
    pub fn with_raw(content: impl Into<String>) -> Self {
        Self {
            data: Mutex::new(Some(content.into())),
        }
    }

    /// The currently stored JSON, if anything was saved
    pub fn raw(&self) -> Option<String> {
        self.data.lock().clone()
    }
}

impl AllergenStore for MemoryStore {
    fn load(&self) -> AppResult<Vec<AllergenTerm>> {
        match self.data.lock().as_deref() {
            Some(json) => decode_allergens(json),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, allergens: &[AllergenTerm]) -> AppResult<()> {
        let json = encode_allergens(allergens)?;
        *self.data.lock() = Some(json);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Load the stored list, falling back to an empty list on any failure
pub fn load_or_empty(store: &dyn AllergenStore) -> Vec<AllergenTerm> {
    match store.load() {
        Ok(allergens) => allergens,
        Err(e) => {
            warn!(
                error = %e,
                store = %store.describe(),
                "Stored allergen list unreadable, starting with an empty list"
            );
            Vec::new()
        }
    }
}

/// Build a registry listener that saves every change to `store`
///
/// Save failures are logged and otherwise ignored; the in-memory registry
/// stays authoritative.
pub fn persist_on_change(
    store: Arc<dyn AllergenStore>,
) -> impl Fn(&[AllergenTerm]) + Send + Sync + 'static {
    move |allergens: &[AllergenTerm]| {
        if let Err(e) = store.save(allergens) {
            log_storage_error(
                &e,
                "persist_on_change",
                Some(store.describe().as_str()),
                Some(allergens.len()),
            );
        }
    }
}
