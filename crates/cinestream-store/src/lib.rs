//! Client-side persistence for cinestream.
//!
//! A small key-value store (file-backed or in-memory) and the
//! favorites list kept on top of it.

/// Favorites list operations.
pub mod favorites;
/// Key-value storage backends.
pub mod kv;
mod paths;

pub use favorites::{FAVORITES_KEY, FavoriteEntry, FavoritesStore};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use paths::resolve_data_dir;
