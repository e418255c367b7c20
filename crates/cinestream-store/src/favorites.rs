//! Favorites list kept in key-value storage.
//!
//! All failures are logged and swallowed: a broken storage backend makes
//! the list read as empty and writes become no-ops, but never errors.

use cinestream_api::tmdb::MediaType;
use serde::{Deserialize, Serialize};

use super::kv::KeyValueStore;

/// Storage key holding the serialized favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// A persisted snapshot of a catalog item marked as favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct FavoriteEntry {
    /// TMDB ID.
    pub id: u64,
    /// Media type.
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Display title at the time it was added.
    pub title: String,
    /// Poster image path (relative).
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl FavoriteEntry {
    /// Returns `true` if this entry refers to `(id, media_type)`.
    #[must_use]
    pub fn matches(&self, id: u64, media_type: MediaType) -> bool {
        self.id == id && self.media_type == media_type
    }
}

/// Ordered favorites list, unique per `(id, media_type)`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FavoritesStore {
    storage: Box<dyn KeyValueStore>,
}

impl FavoritesStore {
    /// Creates a store over the given backend.
    #[must_use]
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Returns all entries in stored order.
    ///
    /// Absent, unreadable or corrupt storage yields an empty list.
    #[must_use]
    pub fn list(&self) -> Vec<FavoriteEntry> {
        let raw = match self.storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read favorites, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Corrupt favorites data, treating as empty");
                Vec::new()
            }
        }
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list().len()
    }

    /// Returns `true` if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// Returns `true` if an entry for `(id, media_type)` exists.
    #[must_use]
    pub fn contains(&self, id: u64, media_type: MediaType) -> bool {
        self.list().iter().any(|e| e.matches(id, media_type))
    }

    /// Appends an entry unless one with the same `(id, media_type)` exists.
    pub fn add(&mut self, entry: FavoriteEntry) {
        let mut entries = self.list();
        if entries.iter().any(|e| e.matches(entry.id, entry.media_type)) {
            tracing::debug!(id = entry.id, media_type = %entry.media_type, "Already a favorite");
            return;
        }
        tracing::debug!(id = entry.id, media_type = %entry.media_type, "Adding favorite");
        entries.push(entry);
        self.persist(&entries);
    }

    /// Removes the entry for `(id, media_type)` if present.
    pub fn remove(&mut self, id: u64, media_type: MediaType) {
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|e| !e.matches(id, media_type));
        if entries.len() == before {
            return;
        }
        tracing::debug!(id, media_type = %media_type, "Removing favorite");
        self.persist(&entries);
    }

    /// Writes the full list back to storage.
    fn persist(&mut self, entries: &[FavoriteEntry]) {
        let serialized = match serde_json::to_string(entries) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize favorites");
                return;
            }
        };
        if let Err(e) = self.storage.set(FAVORITES_KEY, &serialized) {
            tracing::warn!(error = %e, "Failed to save favorites");
        }
    }
}
